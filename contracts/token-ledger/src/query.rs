use cosmwasm_std::{to_json_binary, Binary, Deps, StdError, StdResult};
use drop_common::BalanceResponse;

use crate::state::{LedgerKind, BALANCES, CLAIMED, CLAIM_UNTIL, CONFIG, NUM_TOKENS, OWNERS, PAUSED};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_balance(deps: Deps, owner: String) -> StdResult<Binary> {
    let owner = deps.api.addr_validate(&owner)?;
    let count = BALANCES.may_load(deps.storage, &owner)?.unwrap_or(0);
    to_json_binary(&BalanceResponse { count })
}

pub fn query_owner_of(deps: Deps, token_id: u64) -> StdResult<Binary> {
    let owner = OWNERS.load(deps.storage, token_id)?;
    to_json_binary(&owner)
}

pub fn query_token_uri(deps: Deps, token_id: u64) -> StdResult<Binary> {
    if !OWNERS.has(deps.storage, token_id) {
        return Err(StdError::generic_err(format!(
            "token {} does not exist",
            token_id
        )));
    }
    let config = CONFIG.load(deps.storage)?;
    let uri = match config.kind {
        LedgerKind::Collectible => format!("{}{}", config.base_uri, token_id),
        LedgerKind::Pass | LedgerKind::ClaimablePass { .. } => config.base_uri,
    };
    to_json_binary(&uri)
}

pub fn query_num_tokens(deps: Deps) -> StdResult<Binary> {
    let count = NUM_TOKENS.load(deps.storage)?;
    to_json_binary(&count)
}

pub fn query_paused(deps: Deps) -> StdResult<Binary> {
    let paused = PAUSED.load(deps.storage)?;
    to_json_binary(&paused)
}

pub fn query_claim_until(deps: Deps) -> StdResult<Binary> {
    let claim_until = CLAIM_UNTIL.load(deps.storage)?;
    to_json_binary(&claim_until)
}

pub fn query_has_claimed(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let claimed = CLAIMED.may_load(deps.storage, &addr)?.unwrap_or(false);
    to_json_binary(&claimed)
}
