use cosmwasm_std::{Addr, DepsMut, Env, Event, MessageInfo, Response, Storage, Uint64};
use drop_common::{verify_authorization, PassReq, TypedDataDomain};

use crate::error::ContractError;
use crate::state::{
    LedgerConfig, LedgerKind, BALANCES, CLAIMED, CLAIM_UNTIL, CONFIG, NUM_TOKENS, OWNERS, PAUSED,
};

fn ensure_owner(config: &LedgerConfig, sender: &Addr, action: &str) -> Result<(), ContractError> {
    if *sender != config.owner {
        return Err(ContractError::Unauthorized {
            reason: format!("only owner can {}", action),
        });
    }
    Ok(())
}

/// Hand out `amount` sequential token ids to `recipient`.
/// Returns the first id minted.
fn mint_tokens(
    storage: &mut dyn Storage,
    config: &LedgerConfig,
    recipient: &Addr,
    amount: u64,
) -> Result<u64, ContractError> {
    if amount == 0 {
        return Err(ContractError::ZeroAmount);
    }
    let first_id = NUM_TOKENS.load(storage)?;
    let total = Uint64::new(first_id).checked_add(Uint64::new(amount))?.u64();
    if let Some(max_supply) = config.max_supply {
        if total > max_supply {
            return Err(ContractError::ExceedsMaxSupply {
                requested: amount,
                remaining: max_supply.saturating_sub(first_id),
            });
        }
    }

    for token_id in first_id..total {
        OWNERS.save(storage, token_id, recipient)?;
    }
    let balance = BALANCES.may_load(storage, recipient)?.unwrap_or(0);
    BALANCES.save(storage, recipient, &(balance + amount))?;
    NUM_TOKENS.save(storage, &total)?;

    Ok(first_id)
}

pub fn mint(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    recipient: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let is_minter = config.minter.as_ref() == Some(&info.sender);
    if info.sender != config.owner && !is_minter {
        return Err(ContractError::Unauthorized {
            reason: "only owner or minter can mint".to_string(),
        });
    }

    let recipient = deps.api.addr_validate(&recipient)?;
    let token_id = mint_tokens(deps.storage, &config, &recipient, 1)?;

    Ok(Response::new()
        .add_attribute("action", "mint")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("token_id", token_id.to_string())
        .add_event(
            Event::new("drop_ledger_mint")
                .add_attribute("minter", info.sender.to_string())
                .add_attribute("recipient", recipient.to_string())
                .add_attribute("token_id", token_id.to_string()),
        ))
}

pub fn transfer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    recipient: String,
    token_id: u64,
) -> Result<Response, ContractError> {
    if PAUSED.load(deps.storage)? {
        return Err(ContractError::TransferWhilePaused);
    }

    let holder = OWNERS
        .may_load(deps.storage, token_id)?
        .ok_or(ContractError::TokenNotFound { token_id })?;
    if holder != info.sender {
        return Err(ContractError::Unauthorized {
            reason: "only the token holder can transfer".to_string(),
        });
    }

    let recipient = deps.api.addr_validate(&recipient)?;
    OWNERS.save(deps.storage, token_id, &recipient)?;

    let from_balance = BALANCES.may_load(deps.storage, &holder)?.unwrap_or(0);
    BALANCES.save(deps.storage, &holder, &from_balance.saturating_sub(1))?;
    let to_balance = BALANCES.may_load(deps.storage, &recipient)?.unwrap_or(0);
    BALANCES.save(deps.storage, &recipient, &(to_balance + 1))?;

    Ok(Response::new()
        .add_attribute("action", "transfer")
        .add_attribute("token_id", token_id.to_string())
        .add_event(
            Event::new("drop_ledger_transfer")
                .add_attribute("from", holder.to_string())
                .add_attribute("to", recipient.to_string())
                .add_attribute("token_id", token_id.to_string()),
        ))
}

pub fn set_paused(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    let action = if paused { "pause" } else { "unpause" };
    let config = CONFIG.load(deps.storage)?;
    ensure_owner(&config, &info.sender, action)?;
    PAUSED.save(deps.storage, &paused)?;

    Ok(Response::new()
        .add_attribute("action", action)
        .add_event(
            Event::new(if paused {
                "drop_ledger_paused"
            } else {
                "drop_ledger_unpaused"
            })
            .add_attribute("account", info.sender.to_string()),
        ))
}

pub fn set_minter(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    minter: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_owner(&config, &info.sender, "set the minter")?;

    config.minter = minter
        .map(|m| deps.api.addr_validate(&m))
        .transpose()?;
    CONFIG.save(deps.storage, &config)?;

    let minter = config
        .minter
        .map(|m| m.to_string())
        .unwrap_or_default();
    Ok(Response::new()
        .add_attribute("action", "set_minter")
        .add_event(Event::new("drop_ledger_set_minter").add_attribute("minter", minter)))
}

pub fn set_base_uri(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    base_uri: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_owner(&config, &info.sender, "set the base uri")?;

    config.base_uri = base_uri.clone();
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_base_uri")
        .add_event(Event::new("drop_ledger_set_base_uri").add_attribute("base_uri", base_uri)))
}

pub fn set_claim_until(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    timestamp: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_owner(&config, &info.sender, "set the claim period")?;
    CLAIM_UNTIL.save(deps.storage, &timestamp)?;

    Ok(Response::new()
        .add_attribute("action", "set_claim_until")
        .add_event(
            Event::new("drop_ledger_set_claim_until")
                .add_attribute("claim_until", timestamp.to_string()),
        ))
}

/// One-time signed pass claim. The signature must cover
/// `PassReq { receiver: sender, amount }` under this ledger's domain.
pub fn claim_pass(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let signer = match &config.kind {
        LedgerKind::ClaimablePass { signer_pubkey } => signer_pubkey.clone(),
        _ => return Err(ContractError::ClaimNotSupported),
    };

    let claim_until = CLAIM_UNTIL.load(deps.storage)?;
    if env.block.time.seconds() > claim_until {
        return Err(ContractError::ClaimPeriodOver);
    }
    if CLAIMED.may_load(deps.storage, &info.sender)?.unwrap_or(false) {
        return Err(ContractError::AlreadyReceivedPass);
    }

    let signature = hex::decode(signature_hex.trim_start_matches("0x")).map_err(|_| {
        ContractError::InvalidHex {
            field: "signature_hex".to_string(),
        }
    })?;
    let domain = TypedDataDomain::new(
        &config.name,
        &env.block.chain_id,
        env.contract.address.as_str(),
    );
    let request = PassReq {
        receiver: info.sender.to_string(),
        amount: u128::from(amount),
    };
    if !verify_authorization(deps.api, &domain, &request, &signature, signer.as_slice()) {
        return Err(ContractError::SignatureNotFromOwner);
    }

    let first_id = mint_tokens(deps.storage, &config, &info.sender, amount)?;
    CLAIMED.save(deps.storage, &info.sender, &true)?;

    Ok(Response::new()
        .add_attribute("action", "claim_pass")
        .add_attribute("receiver", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("drop_ledger_claim_pass")
                .add_attribute("receiver", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("first_token_id", first_id.to_string()),
        ))
}

pub fn retrieve_unclaimed_pass(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    recipient: String,
    amount: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_owner(&config, &info.sender, "retrieve unclaimed passes")?;

    let recipient = deps.api.addr_validate(&recipient)?;
    let first_id = mint_tokens(deps.storage, &config, &recipient, amount)?;

    Ok(Response::new()
        .add_attribute("action", "retrieve_unclaimed_pass")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("drop_ledger_retrieve_unclaimed_pass")
                .add_attribute("recipient", recipient.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("first_token_id", first_id.to_string()),
        ))
}
