use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ── Authorization ──
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("signature is not from the owner")]
    SignatureNotFromOwner,

    #[error("no allowlist signer configured")]
    SignerNotConfigured,

    // ── Phase ──
    #[error("store is not opened")]
    StoreNotOpened,

    #[error("store is opened only for VIP")]
    StoreOpenForVipOnly,

    #[error("store is closed")]
    StoreClosed,

    #[error("store is not opened for VIP")]
    StoreNotOpenedForVip,

    #[error("store is closed for VIP")]
    StoreClosedForVip,

    #[error("not available after ticketing period")]
    PreMintPeriodOver,

    #[error("sale is not closed yet")]
    SaleNotClosed,

    // ── Capacity ──
    #[error("exceeds max supply: requested {requested}, remaining {remaining}")]
    ExceedsMaxSupply { requested: u64, remaining: u64 },

    #[error("exceeds max pre-mint ({max_pre_mint})")]
    ExceedsMaxPreMint { max_pre_mint: u64 },

    #[error("mint amount {amount} exceeds maximum per transaction {max_mint_per_tx}")]
    ExceedsMaxMintPerTx { amount: u64, max_mint_per_tx: u64 },

    #[error("not enough pass: requested {requested}, allowed {allowed}")]
    NotEnoughPass { requested: u64, allowed: u64 },

    #[error("exceeds authorized quota: requested {requested}, allowed {allowed}")]
    ExceedsAuthorizedQuota { requested: u64, allowed: u64 },

    #[error("no inventory left for the raffle")]
    NoInventoryForRaffle,

    // ── State ──
    #[error("already registered")]
    AlreadyRegistered,

    #[error("raffle number is already set")]
    RaffleAlreadyDrawn,

    #[error("raffle number is not set yet")]
    RaffleNotDrawn,

    #[error("no tickets have been issued")]
    NoTicketsIssued,

    #[error("no available ticket")]
    NoTickets,

    #[error("already checked")]
    AlreadyResolved,

    #[error("result is not calculated yet")]
    ResultNotCalculated,

    #[error("no valid tickets")]
    NoValidTickets,

    #[error("already withdrawn")]
    AlreadyWithdrawn,

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    // ── Payment ──
    #[error("not enough money: required {required}, sent {sent}")]
    InsufficientPayment { required: Uint128, sent: Uint128 },

    #[error("must send {expected} denom, got {denom}")]
    WrongDenom { expected: String, denom: String },

    // ── Input ──
    #[error("amount must be greater than 0")]
    ZeroAmount,

    #[error("receiver can not be empty address")]
    EmptyReceiver,

    #[error("raffle number must be non-zero")]
    ZeroSeed,

    #[error("invalid signer pubkey: {reason}")]
    InvalidPubkey { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}
