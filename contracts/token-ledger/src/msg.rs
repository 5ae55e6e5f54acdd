use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;
use drop_common::BalanceResponse;

use crate::state::LedgerConfig;

#[cw_serde]
pub enum LedgerKindMsg {
    Collectible,
    Pass,
    ClaimablePass {
        /// Hex-encoded uncompressed secp256k1 key that signs claims
        signer_pubkey_hex: String,
    },
}

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub kind: LedgerKindMsg,
    pub minter: Option<String>,
    pub base_uri: String,
    pub max_supply: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Mint the next token id to `recipient`. Owner or minter.
    Mint { recipient: String },
    Transfer { recipient: String, token_id: u64 },
    Pause {},
    Unpause {},
    SetMinter { minter: Option<String> },
    SetBaseUri { base_uri: String },
    SetClaimUntil { timestamp: u64 },
    /// Claim `amount` passes with an owner-signed `PassReq { receiver: sender, amount }`.
    ClaimPass {
        amount: u64,
        /// Hex-encoded 65-byte `r || s || v` signature
        signature_hex: String,
    },
    /// Mint passes nobody claimed to `recipient`. Owner only.
    RetrieveUnclaimedPass { recipient: String, amount: u64 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LedgerConfig)]
    Config {},
    #[returns(BalanceResponse)]
    Balance { owner: String },
    #[returns(Addr)]
    OwnerOf { token_id: u64 },
    #[returns(String)]
    TokenUri { token_id: u64 },
    #[returns(u64)]
    NumTokens {},
    #[returns(bool)]
    Paused {},
    #[returns(u64)]
    ClaimUntil {},
    #[returns(bool)]
    HasClaimed { address: String },
}
