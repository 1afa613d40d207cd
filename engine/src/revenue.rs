//! # RevenuePool
//!
//! Deposit accumulation and pro-rata claim settlement.
//!
//! An investor's entitlement is `floor(holding * pool_total / total_shares)`
//! computed against the pool total at claim time; what they can actually
//! withdraw is the entitlement minus what they have already claimed. Because
//! every holding is at most `total_shares`, the sum of all entitlements
//! never exceeds the pool total, so payouts can never overdraw deposits.
//!
//! A claim with nothing newly claimable fails with `NothingToClaim` so a
//! caller can tell "nothing to do" apart from a transient error.

use tracing::info;

use crate::errors::{EngineError, Result};
use crate::store::OfferingRecord;
use crate::types::{AccountId, Amount, ClaimRecord, RevenueDeposit, Timestamp};

/// Append a creator deposit to the pool. Returns the new pool total.
pub fn deposit_revenue(
    record: &OfferingRecord,
    depositor: &AccountId,
    amount: Amount,
    now: Timestamp,
) -> Result<Amount> {
    if amount <= 0 {
        return Err(EngineError::Validation(
            "deposit amount must be positive".into(),
        ));
    }

    let config = &record.config;
    if *depositor != config.creator {
        return Err(EngineError::Unauthorized {
            id: config.id.clone(),
            actor: depositor.clone(),
        });
    }

    let mut state = record.state.write().expect("offering lock poisoned");
    let new_total = state
        .pool_total
        .checked_add(amount)
        .ok_or(EngineError::Overflow("revenue pool total"))?;

    state.pool_total = new_total;
    state.last_distribution = now;
    state.deposits.push(RevenueDeposit {
        depositor: depositor.clone(),
        amount,
        timestamp: now,
    });
    drop(state);

    info!(
        offering = %config.id,
        amount = %amount,
        pool_total = %new_total,
        "revenue deposited"
    );

    Ok(new_total)
}

/// Settle the unclaimed portion of an investor's entitlement. Returns the
/// amount paid out by this claim.
pub fn claim_revenue(
    record: &OfferingRecord,
    investor: &AccountId,
    now: Timestamp,
) -> Result<Amount> {
    if investor.is_empty() {
        return Err(EngineError::Validation(
            "investor id must not be empty".into(),
        ));
    }

    let config = &record.config;
    let mut state = record.state.write().expect("offering lock poisoned");

    let holding = state.holding_of(investor);
    if holding == 0 {
        return Err(EngineError::NothingToClaim {
            id: config.id.clone(),
            investor: investor.clone(),
        });
    }

    let entitlement = state
        .pool_total
        .checked_mul(holding as Amount)
        .ok_or(EngineError::Overflow("claim entitlement"))?
        / config.total_shares as Amount;

    let already_claimed = state.cumulative_claimed_by(investor);
    let claimable = entitlement - already_claimed;
    if claimable <= 0 {
        return Err(EngineError::NothingToClaim {
            id: config.id.clone(),
            investor: investor.clone(),
        });
    }

    let cumulative = already_claimed + claimable;
    state.claims.insert(
        investor.clone(),
        ClaimRecord {
            investor: investor.clone(),
            cumulative_claimed: cumulative,
            last_claim: now,
        },
    );
    state.distributed_total += claimable;
    state.last_distribution = now;
    drop(state);

    info!(
        offering = %config.id,
        investor = %investor,
        amount = %claimable,
        "revenue claimed"
    );

    Ok(claimable)
}
