//! Capability interface of the companion token ledgers.
//!
//! The store only ever needs to mint one unit to an address and to read
//! how many tokens an address holds. These messages are a strict subset of
//! the token-ledger contract's own `ExecuteMsg` / `QueryMsg`, so they
//! serialize to the same JSON.

use cosmwasm_schema::cw_serde;

#[cw_serde]
pub enum LedgerExecuteMsg {
    /// Mint the next token id to `recipient`.
    Mint { recipient: String },
}

#[cw_serde]
pub enum LedgerQueryMsg {
    Balance { owner: String },
}

#[cw_serde]
pub struct BalanceResponse {
    pub count: u64,
}
