use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::set_contract_version;
use drop_common::decode_signer_pubkey;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, LedgerKindMsg, QueryMsg};
use crate::query;
use crate::state::{LedgerConfig, LedgerKind, CLAIM_UNTIL, CONFIG, NUM_TOKENS, PAUSED};

const CONTRACT_NAME: &str = "crates.io:drop-token-ledger";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let kind = match msg.kind {
        LedgerKindMsg::Collectible => LedgerKind::Collectible,
        LedgerKindMsg::Pass => LedgerKind::Pass,
        LedgerKindMsg::ClaimablePass { signer_pubkey_hex } => {
            let signer_pubkey = decode_signer_pubkey(&signer_pubkey_hex).map_err(|e| {
                ContractError::InvalidPubkey {
                    reason: e.to_string(),
                }
            })?;
            LedgerKind::ClaimablePass {
                signer_pubkey: signer_pubkey.into(),
            }
        }
    };

    // Pass ledgers start paused; collectibles trade freely.
    let paused = !matches!(kind, LedgerKind::Collectible);

    let config = LedgerConfig {
        name: msg.name,
        kind,
        owner: info.sender.clone(),
        minter: msg
            .minter
            .map(|m| deps.api.addr_validate(&m))
            .transpose()?,
        base_uri: msg.base_uri,
        max_supply: msg.max_supply,
    };

    CONFIG.save(deps.storage, &config)?;
    PAUSED.save(deps.storage, &paused)?;
    NUM_TOKENS.save(deps.storage, &0u64)?;
    CLAIM_UNTIL.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "token-ledger")
        .add_attribute("name", config.name)
        .add_attribute("owner", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Mint { recipient } => execute::mint(deps, env, info, recipient),
        ExecuteMsg::Transfer {
            recipient,
            token_id,
        } => execute::transfer(deps, env, info, recipient, token_id),
        ExecuteMsg::Pause {} => execute::set_paused(deps, env, info, true),
        ExecuteMsg::Unpause {} => execute::set_paused(deps, env, info, false),
        ExecuteMsg::SetMinter { minter } => execute::set_minter(deps, env, info, minter),
        ExecuteMsg::SetBaseUri { base_uri } => execute::set_base_uri(deps, env, info, base_uri),
        ExecuteMsg::SetClaimUntil { timestamp } => {
            execute::set_claim_until(deps, env, info, timestamp)
        }
        ExecuteMsg::ClaimPass {
            amount,
            signature_hex,
        } => execute::claim_pass(deps, env, info, amount, signature_hex),
        ExecuteMsg::RetrieveUnclaimedPass { recipient, amount } => {
            execute::retrieve_unclaimed_pass(deps, env, info, recipient, amount)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Balance { owner } => query::query_balance(deps, owner),
        QueryMsg::OwnerOf { token_id } => query::query_owner_of(deps, token_id),
        QueryMsg::TokenUri { token_id } => query::query_token_uri(deps, token_id),
        QueryMsg::NumTokens {} => query::query_num_tokens(deps),
        QueryMsg::Paused {} => query::query_paused(deps),
        QueryMsg::ClaimUntil {} => query::query_claim_until(deps),
        QueryMsg::HasClaimed { address } => query::query_has_claimed(deps, address),
    }
}
