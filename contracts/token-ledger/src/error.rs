use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("token transfer while paused")]
    TransferWhilePaused,

    #[error("exceeds max supply: requested {requested}, remaining {remaining}")]
    ExceedsMaxSupply { requested: u64, remaining: u64 },

    #[error("token {token_id} does not exist")]
    TokenNotFound { token_id: u64 },

    #[error("amount must be greater than 0")]
    ZeroAmount,

    #[error("ledger does not support pass claims")]
    ClaimNotSupported,

    #[error("claim period has been ended")]
    ClaimPeriodOver,

    #[error("already received pass")]
    AlreadyReceivedPass,

    #[error("signature is not from the owner")]
    SignatureNotFromOwner,

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid signer pubkey: {reason}")]
    InvalidPubkey { reason: String },
}
