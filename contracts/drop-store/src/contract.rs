use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, Event, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;
use drop_common::decode_signer_pubkey;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::query;
use crate::state::{
    Authorization, Config, InventoryState, SaleClock, TreasuryState, AUTHORIZATION, CONFIG,
    INVENTORY, SALE_CLOCK, TREASURY,
};

const CONTRACT_NAME: &str = "crates.io:drop-store";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.max_supply == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "max_supply must be greater than 0".to_string(),
        });
    }
    if msg.max_pre_mint > msg.max_supply {
        return Err(ContractError::InvalidConfig {
            reason: "max_pre_mint exceeds max_supply".to_string(),
        });
    }
    if msg.max_mint_per_tx == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "max_mint_per_tx must be greater than 0".to_string(),
        });
    }
    if msg.denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom can not be empty".to_string(),
        });
    }

    let signer_pubkey = match msg.signer_pubkey_hex {
        Some(pubkey_hex) => Some(
            decode_signer_pubkey(&pubkey_hex)
                .map_err(|e| ContractError::InvalidPubkey {
                    reason: e.to_string(),
                })?
                .into(),
        ),
        None => None,
    };

    let config = Config {
        token_ledger: deps.api.addr_validate(&msg.token_ledger)?,
        pass_ledger: deps.api.addr_validate(&msg.pass_ledger)?,
        signer_pubkey,
        denom: msg.denom,
        unit_price: msg.unit_price,
        max_supply: msg.max_supply,
        max_pre_mint: msg.max_pre_mint,
        max_per_allowlist_address: msg.max_per_allowlist_address,
        max_mint_per_tx: msg.max_mint_per_tx,
    };
    CONFIG.save(deps.storage, &config)?;

    AUTHORIZATION.save(
        deps.storage,
        &Authorization {
            owner: info.sender.clone(),
        },
    )?;
    SALE_CLOCK.save(
        deps.storage,
        &SaleClock {
            opening_time: 0,
            vip_window_seconds: msg.vip_window_seconds,
            public_window_seconds: msg.public_window_seconds,
        },
    )?;
    INVENTORY.save(deps.storage, &InventoryState::default())?;
    TREASURY.save(deps.storage, &TreasuryState::default())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "drop-store")
        .add_attribute("owner", info.sender.to_string())
        .add_event(
            Event::new("drop_instantiate")
                .add_attribute("token_ledger", config.token_ledger.to_string())
                .add_attribute("pass_ledger", config.pass_ledger.to_string())
                .add_attribute("max_supply", config.max_supply.to_string())
                .add_attribute("unit_price", config.unit_price.to_string())
                .add_attribute("denom", config.denom),
        ))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::TakeTickets { amount } => execute::take_tickets(deps, env, info, amount),
        ExecuteMsg::MintWithPass { amount } => execute::mint_with_pass(deps, env, info, amount),
        ExecuteMsg::MintWithAuthorization {
            amount,
            quota,
            signature_hex,
        } => execute::mint_with_authorization(deps, env, info, amount, quota, signature_hex),
        ExecuteMsg::RunRaffle { seed } => execute::run_raffle(deps, env, info, seed),
        ExecuteMsg::ResolveMyResult {} => execute::resolve_my_result(deps, env, info),
        ExecuteMsg::ClaimWinnings {} => execute::claim_winnings(deps, env, info),
        ExecuteMsg::PreMint { receiver } => execute::pre_mint(deps, env, info, receiver),
        ExecuteMsg::Withdraw { receiver } => execute::withdraw(deps, env, info, receiver),
        ExecuteMsg::SetOpeningTime { opening_time } => {
            execute::set_opening_time(deps, env, info, opening_time)
        }
        ExecuteMsg::SetPassLedger { address } => execute::set_pass_ledger(deps, env, info, address),
        ExecuteMsg::SetTokenLedger { address } => {
            execute::set_token_ledger(deps, env, info, address)
        }
        ExecuteMsg::SetSignerPubkey { pubkey_hex } => {
            execute::set_signer_pubkey(deps, env, info, pubkey_hex)
        }
        ExecuteMsg::TransferOwnership { new_owner } => {
            execute::transfer_ownership(deps, env, info, new_owner)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Owner {} => query::query_owner(deps),
        QueryMsg::SaleClock {} => query::query_sale_clock(deps),
        QueryMsg::Phase {} => query::query_phase(deps, env),
        QueryMsg::Inventory {} => query::query_inventory(deps),
        QueryMsg::TicketsOf { address } => query::query_tickets_of(deps, address),
        QueryMsg::AllowlistMintedOf { address } => query::query_allowlist_minted_of(deps, address),
        QueryMsg::Raffle {} => query::query_raffle(deps),
        QueryMsg::ResultOf { address } => query::query_result_of(deps, address),
        QueryMsg::CalculateValidTickets {
            start_index,
            amount,
        } => query::query_calculate_valid_tickets(deps, start_index, amount),
        QueryMsg::Treasury {} => query::query_treasury(deps),
    }
}
