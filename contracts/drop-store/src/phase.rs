use drop_common::Phase;

use crate::error::ContractError;
use crate::state::SaleClock;

/// Derive the sale phase at `now` (unix seconds).
///
/// Windows are half-open: `[opening, opening + vip)` is VIP,
/// `[opening + vip, opening + vip + public)` is public ticketing.
pub fn current_phase(now: u64, clock: &SaleClock) -> Phase {
    if clock.opening_time == 0 || now < clock.opening_time {
        return Phase::Unscheduled;
    }
    let vip_end = clock.opening_time.saturating_add(clock.vip_window_seconds);
    if now < vip_end {
        return Phase::Vip;
    }
    let public_end = vip_end.saturating_add(clock.public_window_seconds);
    if now < public_end {
        return Phase::Public;
    }
    Phase::Closed
}

pub fn ensure_ticketing(phase: Phase) -> Result<(), ContractError> {
    match phase {
        Phase::Public => Ok(()),
        Phase::Unscheduled => Err(ContractError::StoreNotOpened),
        Phase::Vip => Err(ContractError::StoreOpenForVipOnly),
        Phase::Closed => Err(ContractError::StoreClosed),
    }
}

pub fn ensure_vip(phase: Phase) -> Result<(), ContractError> {
    match phase {
        Phase::Vip => Ok(()),
        Phase::Unscheduled => Err(ContractError::StoreNotOpenedForVip),
        Phase::Public | Phase::Closed => Err(ContractError::StoreClosedForVip),
    }
}

/// Pre-minting runs alongside both sale windows.
pub fn ensure_pre_mint(phase: Phase) -> Result<(), ContractError> {
    match phase {
        Phase::Vip | Phase::Public => Ok(()),
        Phase::Unscheduled => Err(ContractError::StoreNotOpened),
        Phase::Closed => Err(ContractError::PreMintPeriodOver),
    }
}

pub fn ensure_closed(phase: Phase) -> Result<(), ContractError> {
    match phase {
        Phase::Closed => Ok(()),
        _ => Err(ContractError::SaleNotClosed),
    }
}
