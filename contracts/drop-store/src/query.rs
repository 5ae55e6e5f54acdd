use cosmwasm_std::{to_json_binary, Binary, Deps, Env, StdError, StdResult, Uint128};

use crate::execute::withdrawable_amount;
use crate::msg::TreasuryResponse;
use crate::phase::current_phase;
use crate::raffle::count_winning_tickets;
use crate::state::{
    ALLOWLIST_MINTED, AUTHORIZATION, CONFIG, INVENTORY, RAFFLE, RESULTS, SALE_CLOCK, TICKETS,
    TREASURY,
};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_owner(deps: Deps) -> StdResult<Binary> {
    let auth = AUTHORIZATION.load(deps.storage)?;
    to_json_binary(&auth.owner)
}

pub fn query_sale_clock(deps: Deps) -> StdResult<Binary> {
    let clock = SALE_CLOCK.load(deps.storage)?;
    to_json_binary(&clock)
}

pub fn query_phase(deps: Deps, env: Env) -> StdResult<Binary> {
    let clock = SALE_CLOCK.load(deps.storage)?;
    to_json_binary(&current_phase(env.block.time.seconds(), &clock))
}

pub fn query_inventory(deps: Deps) -> StdResult<Binary> {
    let inventory = INVENTORY.load(deps.storage)?;
    to_json_binary(&inventory)
}

pub fn query_tickets_of(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let record = TICKETS.may_load(deps.storage, &addr)?.unwrap_or_default();
    to_json_binary(&record)
}

pub fn query_allowlist_minted_of(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let minted = ALLOWLIST_MINTED.may_load(deps.storage, &addr)?.unwrap_or(0);
    to_json_binary(&minted)
}

pub fn query_raffle(deps: Deps) -> StdResult<Binary> {
    let geometry = RAFFLE.may_load(deps.storage)?;
    to_json_binary(&geometry)
}

pub fn query_result_of(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let result = RESULTS.may_load(deps.storage, &addr)?.unwrap_or_default();
    to_json_binary(&result)
}

/// Zero before the draw.
pub fn query_calculate_valid_tickets(
    deps: Deps,
    start_index: u64,
    amount: u64,
) -> StdResult<Binary> {
    let valid = match RAFFLE.may_load(deps.storage)? {
        Some(geometry) => count_winning_tickets(start_index, amount, &geometry),
        None => 0,
    };
    to_json_binary(&valid)
}

pub fn query_treasury(deps: Deps) -> StdResult<Binary> {
    let state = TREASURY.load(deps.storage)?;
    let withdrawable = if state.withdrawn {
        Uint128::zero()
    } else {
        let config = CONFIG.load(deps.storage)?;
        let inventory = INVENTORY.load(deps.storage)?;
        withdrawable_amount(&config, &inventory)
            .map_err(|e| StdError::generic_err(e.to_string()))?
    };
    to_json_binary(&TreasuryResponse {
        state,
        withdrawable,
    })
}
