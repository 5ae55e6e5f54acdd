use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use drop_common::Phase;

use crate::state::{
    ClaimResult, Config, InventoryState, RaffleGeometry, SaleClock, TicketRecord, TreasuryState,
};

#[cw_serde]
pub struct InstantiateMsg {
    /// Collectible ledger the store mints into. The store must be its minter.
    pub token_ledger: String,
    /// Pass ledger whose balances entitle VIP minting.
    pub pass_ledger: String,
    /// Hex-encoded uncompressed secp256k1 key that signs allowlist authorizations.
    pub signer_pubkey_hex: Option<String>,
    pub denom: String,
    pub unit_price: Uint128,
    pub max_supply: u64,
    pub max_pre_mint: u64,
    pub max_per_allowlist_address: u64,
    pub max_mint_per_tx: u64,
    pub vip_window_seconds: u64,
    pub public_window_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register for the raffle with `amount` tickets. Public phase only.
    /// Attach at least `amount * unit_price`; the excess is refunded.
    TakeTickets { amount: u64 },
    /// Mint directly during the VIP phase against held passes.
    MintWithPass { amount: u64 },
    /// Mint directly during the VIP phase against a signed authorization
    /// granting `quota` units to the sender.
    MintWithAuthorization {
        amount: u64,
        quota: u64,
        /// Hex-encoded 65-byte `r || s || v` signature
        signature_hex: String,
    },
    /// Fix the raffle geometry. Owner only, once.
    RunRaffle { seed: Uint128 },
    /// Compute the sender's winning tickets and refund the rest. Once per address.
    ResolveMyResult {},
    /// Mint up to `max_mint_per_tx` of the sender's remaining winning tickets.
    ClaimWinnings {},
    /// Mint one reserved unit to `receiver`. Owner only.
    PreMint { receiver: String },
    /// Send the non-refundable proceeds to `receiver`. Owner only, once, after close.
    Withdraw { receiver: String },
    SetOpeningTime { opening_time: u64 },
    SetPassLedger { address: String },
    SetTokenLedger { address: String },
    SetSignerPubkey { pubkey_hex: String },
    TransferOwnership { new_owner: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(Addr)]
    Owner {},
    #[returns(SaleClock)]
    SaleClock {},
    #[returns(Phase)]
    Phase {},
    #[returns(InventoryState)]
    Inventory {},
    #[returns(TicketRecord)]
    TicketsOf { address: String },
    #[returns(u64)]
    AllowlistMintedOf { address: String },
    #[returns(Option<RaffleGeometry>)]
    Raffle {},
    #[returns(ClaimResult)]
    ResultOf { address: String },
    /// Evaluate the winner count of an arbitrary ticket range against the drawn geometry.
    #[returns(u64)]
    CalculateValidTickets { start_index: u64, amount: u64 },
    #[returns(TreasuryResponse)]
    Treasury {},
}

#[cw_serde]
pub struct TreasuryResponse {
    pub state: TreasuryState,
    /// Non-refundable value backing allowlist mints and raffle winners; zero once withdrawn.
    pub withdrawable: Uint128,
}
