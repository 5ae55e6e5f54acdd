use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response,
    Storage, Uint128, Uint64, WasmMsg,
};
use drop_common::typed_data::{decode_signer_pubkey, verify_authorization};
use drop_common::{
    BalanceResponse, LedgerExecuteMsg, LedgerQueryMsg, PassReq, Phase, TypedDataDomain,
};

use crate::error::ContractError;
use crate::phase::{current_phase, ensure_closed, ensure_pre_mint, ensure_ticketing, ensure_vip};
use crate::raffle::{count_winning_tickets, draw_geometry};
use crate::state::{
    Authorization, ClaimResult, Config, InventoryState, TicketRecord, ALLOWLIST_MINTED,
    AUTHORIZATION, CONFIG, INVENTORY, RAFFLE, RESULTS, SALE_CLOCK, TICKETS, TREASURY,
};

/// Name of the typed-data domain allowlist authorizations are signed under.
pub const STORE_DOMAIN_NAME: &str = "DropStore";

// ─── Guards and helpers ───

/// Reject anyone but the recorded owner.
fn ensure_owner(storage: &dyn Storage, sender: &Addr, action: &str) -> Result<Authorization, ContractError> {
    let auth = AUTHORIZATION.load(storage)?;
    if *sender != auth.owner {
        return Err(ContractError::Unauthorized {
            reason: format!("only owner can {}", action),
        });
    }
    Ok(auth)
}

fn ensure_not_drawn(storage: &dyn Storage) -> Result<(), ContractError> {
    if RAFFLE.may_load(storage)?.is_some() {
        return Err(ContractError::RaffleAlreadyDrawn);
    }
    Ok(())
}

fn checked_add_u64(a: u64, b: u64) -> Result<u64, ContractError> {
    Ok(Uint64::new(a).checked_add(Uint64::new(b))?.u64())
}

/// Sum of attached funds in the payment denom. Any other denom is rejected.
fn received_payment(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    let mut sent = Uint128::zero();
    for coin in &info.funds {
        if coin.denom != denom {
            return Err(ContractError::WrongDenom {
                expected: denom.to_string(),
                denom: coin.denom.clone(),
            });
        }
        sent = sent.checked_add(coin.amount)?;
    }
    Ok(sent)
}

/// Check payment for `units` and return `(price, change)`.
fn settle_payment(
    info: &MessageInfo,
    config: &Config,
    units: u64,
) -> Result<(Uint128, Uint128), ContractError> {
    let sent = received_payment(info, &config.denom)?;
    let required = config.unit_price.checked_mul(Uint128::from(units))?;
    if sent < required {
        return Err(ContractError::InsufficientPayment { required, sent });
    }
    Ok((required, sent - required))
}

fn refund_msg(to: &Addr, amount: Uint128, denom: &str) -> Option<BankMsg> {
    if amount.is_zero() {
        return None;
    }
    Some(BankMsg::Send {
        to_address: to.to_string(),
        amount: coins(amount.u128(), denom),
    })
}

/// One ledger mint per unit; the ledger assigns token ids.
fn mint_msgs(ledger: &Addr, recipient: &Addr, amount: u64) -> Result<Vec<CosmosMsg>, ContractError> {
    let msg = to_json_binary(&LedgerExecuteMsg::Mint {
        recipient: recipient.to_string(),
    })?;
    Ok((0..amount)
        .map(|_| {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: ledger.to_string(),
                msg: msg.clone(),
                funds: vec![],
            })
        })
        .collect())
}

fn validate_receiver(deps: &DepsMut, receiver: &str) -> Result<Addr, ContractError> {
    if receiver.trim().is_empty() {
        return Err(ContractError::EmptyReceiver);
    }
    Ok(deps.api.addr_validate(receiver)?)
}

/// Reserve `requested` units outside the raffle. Once tickets exist, one unit
/// stays back so the draw always has inventory.
fn ensure_supply(config: &Config, inventory: &InventoryState, requested: u64) -> Result<(), ContractError> {
    let mut remaining = inventory.available_for_raffle(config.max_supply);
    if inventory.total_tickets > 0 {
        remaining = remaining.saturating_sub(1);
    }
    if requested > remaining {
        return Err(ContractError::ExceedsMaxSupply {
            requested,
            remaining,
        });
    }
    Ok(())
}

fn validate_allowlist_amount(config: &Config, amount: u64) -> Result<(), ContractError> {
    if amount == 0 {
        return Err(ContractError::ZeroAmount);
    }
    if amount > config.max_mint_per_tx {
        return Err(ContractError::ExceedsMaxMintPerTx {
            amount,
            max_mint_per_tx: config.max_mint_per_tx,
        });
    }
    Ok(())
}

/// Value the owner may take out: every allowlist mint plus every raffle
/// winner is paid for and non-refundable. Raffle winners number
/// `min(total_tickets, available)` by construction of the geometry.
pub fn withdrawable_amount(config: &Config, inventory: &InventoryState) -> Result<Uint128, ContractError> {
    let winners = inventory
        .total_tickets
        .min(inventory.available_for_raffle(config.max_supply));
    let units = checked_add_u64(inventory.allowlist_minted, winners)?;
    Ok(config.unit_price.checked_mul(Uint128::from(units))?)
}

// ─── Allocation ledger ───

/// Register `amount` tickets at the next free indices. Public phase only.
pub fn take_tickets(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: u64,
) -> Result<Response, ContractError> {
    let clock = SALE_CLOCK.load(deps.storage)?;
    ensure_ticketing(current_phase(env.block.time.seconds(), &clock))?;

    if amount == 0 {
        return Err(ContractError::ZeroAmount);
    }
    ensure_not_drawn(deps.storage)?;
    if TICKETS.has(deps.storage, &info.sender) {
        return Err(ContractError::AlreadyRegistered);
    }

    let config = CONFIG.load(deps.storage)?;
    let mut inventory = INVENTORY.load(deps.storage)?;
    if inventory.available_for_raffle(config.max_supply) == 0 {
        return Err(ContractError::ExceedsMaxSupply {
            requested: amount,
            remaining: 0,
        });
    }

    let (price, change) = settle_payment(&info, &config, amount)?;

    let record = TicketRecord {
        start_index: inventory.total_tickets,
        amount,
    };
    inventory.total_tickets = checked_add_u64(inventory.total_tickets, amount)?;
    TICKETS.save(deps.storage, &info.sender, &record)?;
    INVENTORY.save(deps.storage, &inventory)?;

    let mut treasury = TREASURY.load(deps.storage)?;
    treasury.collected = treasury.collected.checked_add(price)?;
    TREASURY.save(deps.storage, &treasury)?;

    let mut response = Response::new();
    if let Some(msg) = refund_msg(&info.sender, change, &config.denom) {
        response = response.add_message(msg);
    }

    Ok(response
        .add_attribute("action", "take_tickets")
        .add_attribute("claimant", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("refund", change.to_string())
        .add_event(
            Event::new("drop_tickets_taken")
                .add_attribute("claimant", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("refund", change.to_string())
                .add_attribute("start_index", record.start_index.to_string())
                .add_attribute("total_tickets", inventory.total_tickets.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

// ─── Allowlist mint gate ───

/// Mint against held passes: quota is `passes * max_per_allowlist_address`.
pub fn mint_with_pass(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: u64,
) -> Result<Response, ContractError> {
    let clock = SALE_CLOCK.load(deps.storage)?;
    ensure_vip(current_phase(env.block.time.seconds(), &clock))?;

    let config = CONFIG.load(deps.storage)?;
    validate_allowlist_amount(&config, amount)?;
    ensure_not_drawn(deps.storage)?;

    let passes: BalanceResponse = deps.querier.query_wasm_smart(
        config.pass_ledger.to_string(),
        &LedgerQueryMsg::Balance {
            owner: info.sender.to_string(),
        },
    )?;
    let minted = ALLOWLIST_MINTED
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(0);
    let allowed = passes
        .count
        .saturating_mul(config.max_per_allowlist_address)
        .saturating_sub(minted);
    if amount > allowed {
        return Err(ContractError::NotEnoughPass {
            requested: amount,
            allowed,
        });
    }

    allowlist_mint(deps, env, info, config, amount, minted, "mint_with_pass")
}

/// Mint against an owner-signed `PassReq { receiver: sender, amount: quota }`.
/// The per-address mint counter caps every reuse of the same signature at `quota`.
pub fn mint_with_authorization(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: u64,
    quota: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let clock = SALE_CLOCK.load(deps.storage)?;
    ensure_vip(current_phase(env.block.time.seconds(), &clock))?;

    let config = CONFIG.load(deps.storage)?;
    validate_allowlist_amount(&config, amount)?;
    ensure_not_drawn(deps.storage)?;

    let signer = config
        .signer_pubkey
        .clone()
        .ok_or(ContractError::SignerNotConfigured)?;
    let signature = hex::decode(signature_hex.trim_start_matches("0x")).map_err(|_| {
        ContractError::InvalidHex {
            field: "signature_hex".to_string(),
        }
    })?;

    let domain = TypedDataDomain::new(
        STORE_DOMAIN_NAME,
        &env.block.chain_id,
        env.contract.address.as_str(),
    );
    let request = PassReq {
        receiver: info.sender.to_string(),
        amount: u128::from(quota),
    };
    if !verify_authorization(deps.api, &domain, &request, &signature, signer.as_slice()) {
        return Err(ContractError::SignatureNotFromOwner);
    }

    let minted = ALLOWLIST_MINTED
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(0);
    let allowed = quota.saturating_sub(minted);
    if amount > allowed {
        return Err(ContractError::ExceedsAuthorizedQuota {
            requested: amount,
            allowed,
        });
    }

    allowlist_mint(deps, env, info, config, amount, minted, "mint_with_authorization")
}

/// Shared tail of both allowlist paths, after eligibility is proven.
fn allowlist_mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    config: Config,
    amount: u64,
    already_minted: u64,
    action: &str,
) -> Result<Response, ContractError> {
    let mut inventory = INVENTORY.load(deps.storage)?;
    ensure_supply(&config, &inventory, amount)?;

    let (price, change) = settle_payment(&info, &config, amount)?;

    ALLOWLIST_MINTED.save(
        deps.storage,
        &info.sender,
        &checked_add_u64(already_minted, amount)?,
    )?;
    inventory.allowlist_minted = checked_add_u64(inventory.allowlist_minted, amount)?;
    INVENTORY.save(deps.storage, &inventory)?;

    let mut treasury = TREASURY.load(deps.storage)?;
    treasury.collected = treasury.collected.checked_add(price)?;
    TREASURY.save(deps.storage, &treasury)?;

    let mut response = Response::new().add_messages(mint_msgs(
        &config.token_ledger,
        &info.sender,
        amount,
    )?);
    if let Some(msg) = refund_msg(&info.sender, change, &config.denom) {
        response = response.add_message(msg);
    }

    Ok(response
        .add_attribute("action", action)
        .add_attribute("claimant", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("refund", change.to_string())
        .add_event(
            Event::new(format!("drop_{}", action))
                .add_attribute("claimant", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("refund", change.to_string())
                .add_attribute("allowlist_minted", inventory.allowlist_minted.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

// ─── Owner pre-mint ───

/// Mint one reserved unit outside the raffle. Owner only.
pub fn pre_mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    receiver: String,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender, "pre-mint")?;

    let clock = SALE_CLOCK.load(deps.storage)?;
    ensure_pre_mint(current_phase(env.block.time.seconds(), &clock))?;

    let receiver = validate_receiver(&deps, &receiver)?;
    ensure_not_drawn(deps.storage)?;

    let config = CONFIG.load(deps.storage)?;
    let mut inventory = INVENTORY.load(deps.storage)?;
    if inventory.pre_minted >= config.max_pre_mint {
        return Err(ContractError::ExceedsMaxPreMint {
            max_pre_mint: config.max_pre_mint,
        });
    }
    ensure_supply(&config, &inventory, 1)?;

    inventory.pre_minted += 1;
    INVENTORY.save(deps.storage, &inventory)?;

    Ok(Response::new()
        .add_messages(mint_msgs(&config.token_ledger, &receiver, 1)?)
        .add_attribute("action", "pre_mint")
        .add_attribute("receiver", receiver.to_string())
        .add_event(
            Event::new("drop_pre_mint")
                .add_attribute("receiver", receiver.to_string())
                .add_attribute("pre_minted", inventory.pre_minted.to_string()),
        ))
}

// ─── Raffle engine ───

/// Fix the slot geometry from `seed`. Owner only; the geometry is written once.
pub fn run_raffle(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    seed: Uint128,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender, "run the raffle")?;
    ensure_not_drawn(deps.storage)?;

    let config = CONFIG.load(deps.storage)?;
    let inventory = INVENTORY.load(deps.storage)?;
    let available = inventory.available_for_raffle(config.max_supply);

    let geometry = draw_geometry(seed, inventory.total_tickets, available)?;
    RAFFLE.save(deps.storage, &geometry)?;

    Ok(Response::new()
        .add_attribute("action", "run_raffle")
        .add_attribute("seed", seed.to_string())
        .add_event(
            Event::new("drop_raffle_run")
                .add_attribute("seed", seed.to_string())
                .add_attribute("slot_size", geometry.slot_size.to_string())
                .add_attribute("slot_offset", geometry.slot_offset.to_string())
                .add_attribute(
                    "last_eligible_index",
                    geometry.last_eligible_index.to_string(),
                )
                .add_attribute("total_tickets", inventory.total_tickets.to_string())
                .add_attribute("available", available.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

// ─── Claim resolver ───

/// Count the sender's winning tickets and refund the losing ones.
pub fn resolve_my_result(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let geometry = RAFFLE
        .may_load(deps.storage)?
        .ok_or(ContractError::RaffleNotDrawn)?;

    let tickets = TICKETS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if tickets.amount == 0 {
        return Err(ContractError::NoTickets);
    }

    let existing = RESULTS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if existing.resolved {
        return Err(ContractError::AlreadyResolved);
    }

    let config = CONFIG.load(deps.storage)?;
    let valid = count_winning_tickets(tickets.start_index, tickets.amount, &geometry);
    let losing = tickets.amount - valid;
    let refund = config.unit_price.checked_mul(Uint128::from(losing))?;

    RESULTS.save(
        deps.storage,
        &info.sender,
        &ClaimResult {
            resolved: true,
            winning_tickets_remaining: valid,
        },
    )?;

    let mut treasury = TREASURY.load(deps.storage)?;
    treasury.refunded = treasury.refunded.checked_add(refund)?;
    TREASURY.save(deps.storage, &treasury)?;

    let mut response = Response::new();
    if let Some(msg) = refund_msg(&info.sender, refund, &config.denom) {
        response = response.add_message(msg);
    }

    Ok(response
        .add_attribute("action", "resolve_my_result")
        .add_attribute("claimant", info.sender.to_string())
        .add_attribute("valid_ticket_amount", valid.to_string())
        .add_attribute("refund", refund.to_string())
        .add_event(
            Event::new("drop_result_set")
                .add_attribute("claimant", info.sender.to_string())
                .add_attribute("valid_ticket_amount", valid.to_string())
                .add_attribute("refund", refund.to_string()),
        ))
}

/// Mint up to `max_mint_per_tx` of the sender's remaining winning tickets.
pub fn claim_winnings(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut result = RESULTS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if !result.resolved {
        return Err(ContractError::ResultNotCalculated);
    }
    if result.winning_tickets_remaining == 0 {
        return Err(ContractError::NoValidTickets);
    }

    let config = CONFIG.load(deps.storage)?;
    let amount = result.winning_tickets_remaining.min(config.max_mint_per_tx);
    result.winning_tickets_remaining -= amount;
    RESULTS.save(deps.storage, &info.sender, &result)?;

    Ok(Response::new()
        .add_messages(mint_msgs(&config.token_ledger, &info.sender, amount)?)
        .add_attribute("action", "claim_winnings")
        .add_attribute("claimant", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("drop_winnings_claimed")
                .add_attribute("claimant", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("remaining", result.winning_tickets_remaining.to_string()),
        ))
}

// ─── Treasury ───

/// Send the non-refundable proceeds to `receiver`. Owner only, once, after close.
pub fn withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    receiver: String,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender, "withdraw")?;
    let receiver = validate_receiver(&deps, &receiver)?;

    let mut treasury = TREASURY.load(deps.storage)?;
    if treasury.withdrawn {
        return Err(ContractError::AlreadyWithdrawn);
    }

    let clock = SALE_CLOCK.load(deps.storage)?;
    ensure_closed(current_phase(env.block.time.seconds(), &clock))?;

    let config = CONFIG.load(deps.storage)?;
    let inventory = INVENTORY.load(deps.storage)?;
    // Refund liability is unknown until the geometry is fixed.
    if inventory.total_tickets > 0 && RAFFLE.may_load(deps.storage)?.is_none() {
        return Err(ContractError::RaffleNotDrawn);
    }

    let amount = withdrawable_amount(&config, &inventory)?;
    if amount.is_zero() {
        return Err(ContractError::NothingToWithdraw);
    }

    treasury.withdrawn = true;
    treasury.withdrawn_amount = amount;
    TREASURY.save(deps.storage, &treasury)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: receiver.to_string(),
            amount: coins(amount.u128(), &config.denom),
        })
        .add_attribute("action", "withdraw")
        .add_attribute("receiver", receiver.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("drop_withdraw")
                .add_attribute("receiver", receiver.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("denom", config.denom)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

// ─── Administration ───

/// Schedule (or unschedule with 0) the sale. Owner only, until the sale closes.
pub fn set_opening_time(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    opening_time: u64,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender, "set the opening time")?;
    ensure_not_drawn(deps.storage)?;
    if TREASURY.load(deps.storage)?.withdrawn {
        return Err(ContractError::AlreadyWithdrawn);
    }

    let now = env.block.time.seconds();
    let mut clock = SALE_CLOCK.load(deps.storage)?;
    if current_phase(now, &clock) == Phase::Closed {
        return Err(ContractError::StoreClosed);
    }
    clock.opening_time = opening_time;
    SALE_CLOCK.save(deps.storage, &clock)?;
    let phase = current_phase(now, &clock);

    Ok(Response::new()
        .add_attribute("action", "set_opening_time")
        .add_attribute("phase", phase.as_str())
        .add_event(
            Event::new("drop_set_opening_time")
                .add_attribute("opening_time", opening_time.to_string())
                .add_attribute("phase", phase.as_str()),
        ))
}

pub fn set_pass_ledger(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender, "set the pass ledger")?;

    let mut config = CONFIG.load(deps.storage)?;
    config.pass_ledger = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_pass_ledger")
        .add_event(Event::new("drop_set_pass_ledger").add_attribute("pass_ledger", address)))
}

pub fn set_token_ledger(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender, "set the token ledger")?;

    let mut config = CONFIG.load(deps.storage)?;
    config.token_ledger = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_token_ledger")
        .add_event(Event::new("drop_set_token_ledger").add_attribute("token_ledger", address)))
}

pub fn set_signer_pubkey(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pubkey_hex: String,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender, "set the signer")?;

    let pubkey = decode_signer_pubkey(&pubkey_hex).map_err(|e| ContractError::InvalidPubkey {
        reason: e.to_string(),
    })?;

    let mut config = CONFIG.load(deps.storage)?;
    config.signer_pubkey = Some(pubkey.into());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_signer_pubkey")
        .add_event(Event::new("drop_set_signer").add_attribute("pubkey", pubkey_hex)))
}

pub fn transfer_ownership(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    new_owner: String,
) -> Result<Response, ContractError> {
    let mut auth = ensure_owner(deps.storage, &info.sender, "transfer ownership")?;
    auth.owner = validate_receiver(&deps, &new_owner)?;
    AUTHORIZATION.save(deps.storage, &auth)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_ownership")
        .add_event(
            Event::new("drop_ownership_transferred")
                .add_attribute("previous_owner", info.sender.to_string())
                .add_attribute("new_owner", auth.owner.to_string()),
        ))
}
