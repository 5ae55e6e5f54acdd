use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

pub const AUTHORIZATION: Item<Authorization> = Item::new("authorization");
pub const CONFIG: Item<Config> = Item::new("config");
pub const SALE_CLOCK: Item<SaleClock> = Item::new("sale_clock");
pub const INVENTORY: Item<InventoryState> = Item::new("inventory");
pub const TREASURY: Item<TreasuryState> = Item::new("treasury");
/// Written exactly once by `run_raffle`. Absent means the raffle has not been drawn.
pub const RAFFLE: Item<RaffleGeometry> = Item::new("raffle");
pub const TICKETS: Map<&Addr, TicketRecord> = Map::new("tickets");
pub const ALLOWLIST_MINTED: Map<&Addr, u64> = Map::new("allowlist_minted");
pub const RESULTS: Map<&Addr, ClaimResult> = Map::new("results");

#[cw_serde]
pub struct Authorization {
    pub owner: Addr,
}

#[cw_serde]
pub struct Config {
    /// Collectible ledger that receives mint calls.
    pub token_ledger: Addr,
    /// Pass ledger whose balances gate `mint_with_pass`.
    pub pass_ledger: Addr,
    /// Uncompressed secp256k1 key (65 bytes) that signs allowlist authorizations.
    pub signer_pubkey: Option<Binary>,
    /// Native payment denom
    pub denom: String,
    pub unit_price: Uint128,
    pub max_supply: u64,
    pub max_pre_mint: u64,
    /// Quota granted per held pass. Signed authorizations carry an absolute quota.
    pub max_per_allowlist_address: u64,
    pub max_mint_per_tx: u64,
}

#[cw_serde]
pub struct SaleClock {
    /// Unix seconds; 0 means not scheduled
    pub opening_time: u64,
    pub vip_window_seconds: u64,
    pub public_window_seconds: u64,
}

#[cw_serde]
#[derive(Default)]
pub struct InventoryState {
    /// Next ticket index to hand out; equals the sum of all ticket amounts.
    pub total_tickets: u64,
    pub pre_minted: u64,
    pub allowlist_minted: u64,
}

impl InventoryState {
    /// Units still available for the raffle once reservations and allowlist mints are taken.
    pub fn available_for_raffle(&self, max_supply: u64) -> u64 {
        max_supply
            .saturating_sub(self.pre_minted)
            .saturating_sub(self.allowlist_minted)
    }
}

#[cw_serde]
#[derive(Default)]
pub struct TicketRecord {
    pub start_index: u64,
    pub amount: u64,
}

#[cw_serde]
pub struct RaffleGeometry {
    pub seed: Uint128,
    pub slot_size: u64,
    pub slot_offset: u64,
    pub last_eligible_index: u64,
}

#[cw_serde]
#[derive(Default)]
pub struct ClaimResult {
    pub resolved: bool,
    pub winning_tickets_remaining: u64,
}

#[cw_serde]
#[derive(Default)]
pub struct TreasuryState {
    /// Total accepted (post-refund) payments
    pub collected: Uint128,
    /// Total refunded at resolution for losing tickets
    pub refunded: Uint128,
    pub withdrawn: bool,
    pub withdrawn_amount: Uint128,
}
