use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<LedgerConfig> = Item::new("config");
pub const PAUSED: Item<bool> = Item::new("paused");
/// Token ids are handed out sequentially from 0, so this is also the next id.
pub const NUM_TOKENS: Item<u64> = Item::new("num_tokens");
pub const OWNERS: Map<u64, Addr> = Map::new("owners");
pub const BALANCES: Map<&Addr, u64> = Map::new("balances");
/// Last unix second at which `claim_pass` is accepted; 0 until set.
pub const CLAIM_UNTIL: Item<u64> = Item::new("claim_until");
pub const CLAIMED: Map<&Addr, bool> = Map::new("claimed");

#[cw_serde]
pub enum LedgerKind {
    /// One URI per token: `base_uri + token_id`.
    Collectible,
    /// Every token shares `base_uri`.
    Pass,
    /// A pass ledger that also accepts one signed claim per address.
    ClaimablePass { signer_pubkey: Binary },
}

#[cw_serde]
pub struct LedgerConfig {
    /// Also the typed-data domain name for pass claims.
    pub name: String,
    pub kind: LedgerKind,
    pub owner: Addr,
    /// Contract allowed to mint besides the owner, typically the drop store.
    pub minter: Option<Addr>,
    pub base_uri: String,
    pub max_supply: Option<u64>,
}
