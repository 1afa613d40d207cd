#![allow(dead_code)]

use crate::types::{OfferingConfig, OfferingState, SalePhase};

/// INV-1: shares sold never exceed the fixed supply.
pub fn assert_shares_within_supply(config: &OfferingConfig, state: &OfferingState) {
    assert!(
        state.shares_sold <= config.total_shares,
        "INV-1 violated: offering {} sold {} of {} shares",
        config.id,
        state.shares_sold,
        config.total_shares
    );
}

/// INV-2: shares_sold equals the sum of all recorded investments.
pub fn assert_ledger_consistent(config: &OfferingConfig, state: &OfferingState) {
    let recorded: u64 = state.investments.iter().map(|inv| inv.shares).sum();
    assert_eq!(
        state.shares_sold, recorded,
        "INV-2 violated: offering {} shares_sold {} != investment sum {}",
        config.id, state.shares_sold, recorded
    );
}

/// INV-3: total payouts never exceed total deposits.
pub fn assert_claims_within_pool(config: &OfferingConfig, state: &OfferingState) {
    let claimed: i128 = state.claims.values().map(|c| c.cumulative_claimed).sum();
    assert!(
        claimed <= state.pool_total,
        "INV-3 violated: offering {} distributed {} of pool {}",
        config.id,
        claimed,
        state.pool_total
    );
    assert_eq!(
        claimed, state.distributed_total,
        "INV-3 violated: offering {} distributed_total {} != claim sum {}",
        config.id, state.distributed_total, claimed
    );
}

/// INV-4: the pool total equals the sum of all deposits.
pub fn assert_pool_consistent(config: &OfferingConfig, state: &OfferingState) {
    let deposited: i128 = state.deposits.iter().map(|d| d.amount).sum();
    assert_eq!(
        state.pool_total, deposited,
        "INV-4 violated: offering {} pool_total {} != deposit sum {}",
        config.id, state.pool_total, deposited
    );
}

/// INV-5: per-investor cumulative claims never decrease.
pub fn assert_claim_monotonic(claimed_before: i128, claimed_after: i128) {
    assert!(
        claimed_after >= claimed_before,
        "INV-5 violated: cumulative_claimed decreased from {} to {}",
        claimed_before,
        claimed_after
    );
}

/// INV-6: phase transitions only move forward. Terminal phases are absorbing.
pub fn assert_valid_phase_transition(from: SalePhase, to: SalePhase) {
    let valid = from == to
        || matches!(
            (from, to),
            (SalePhase::Upcoming, SalePhase::PreLive)
                | (SalePhase::Upcoming, SalePhase::Live)
                | (SalePhase::PreLive, SalePhase::Live)
                | (SalePhase::Open, SalePhase::Closed)
        );
    assert!(
        valid,
        "INV-6 violated: invalid phase transition from {:?} to {:?}",
        from, to
    );
}

/// Run every stateful invariant against an offering.
pub fn assert_all(config: &OfferingConfig, state: &OfferingState) {
    assert_shares_within_supply(config, state);
    assert_ledger_consistent(config, state);
    assert_claims_within_pool(config, state);
    assert_pool_consistent(config, state);
}
