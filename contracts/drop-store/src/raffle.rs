//! Stateless lottery over the ticket index space.
//!
//! The eligible prefix of the index space is cut into `available` slots of
//! `slot_size` indices each, and the index at `slot_offset` inside every
//! slot wins. Nothing is shuffled or stored per ticket: whether a range of
//! tickets wins is a closed-form function of four words of state.

use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::state::RaffleGeometry;

/// Fix the slot geometry for `total_tickets` issued tickets competing for
/// `available` units.
///
/// `slot_size = max(1, total_tickets / available)` and the eligible prefix
/// is `min(total_tickets, slot_size * available)` indices long, so exactly
/// `min(total_tickets, available)` indices win.
pub fn draw_geometry(
    seed: Uint128,
    total_tickets: u64,
    available: u64,
) -> Result<RaffleGeometry, ContractError> {
    if seed.is_zero() {
        return Err(ContractError::ZeroSeed);
    }
    if total_tickets == 0 {
        return Err(ContractError::NoTicketsIssued);
    }
    if available == 0 {
        return Err(ContractError::NoInventoryForRaffle);
    }

    let slot_size = (total_tickets / available).max(1);
    let eligible = total_tickets.min(slot_size.saturating_mul(available));
    let slot_offset = (seed.u128() % u128::from(slot_size)) as u64;

    Ok(RaffleGeometry {
        seed,
        slot_size,
        slot_offset,
        last_eligible_index: eligible - 1,
    })
}

/// Number of winning indices inside `[start_index, start_index + amount)`.
///
/// The range is clamped to `[0, last_eligible_index]`; for the clamped
/// `[lo, hi]` the count is
/// `floor((hi - offset) / slot) - ceil((lo - offset) / slot) + 1`,
/// floored at zero. Evaluated in i128 so negative intermediates are exact.
pub fn count_winning_tickets(start_index: u64, amount: u64, geometry: &RaffleGeometry) -> u64 {
    if amount == 0 || start_index > geometry.last_eligible_index {
        return 0;
    }

    let lo = i128::from(start_index);
    let hi = (i128::from(start_index) + i128::from(amount) - 1)
        .min(i128::from(geometry.last_eligible_index));
    let offset = i128::from(geometry.slot_offset);
    let slot = i128::from(geometry.slot_size);

    let last_slot = (hi - offset).div_euclid(slot);
    // ceil((lo - offset) / slot) == -floor((offset - lo) / slot)
    let first_slot = -((offset - lo).div_euclid(slot));
    let count = last_slot - first_slot + 1;

    if count <= 0 {
        0
    } else {
        count as u64
    }
}

/// Total number of winning indices the geometry produces.
pub fn total_winners(geometry: &RaffleGeometry) -> u64 {
    count_winning_tickets(0, geometry.last_eligible_index + 1, geometry)
}
