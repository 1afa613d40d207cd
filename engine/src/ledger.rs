//! # ShareLedger
//!
//! Purchase processing. A purchase is all-or-nothing: it either grants the
//! full requested share count at the quoted cost or changes nothing.
//!
//! The eligibility check and the cost computation both read a single
//! `(shares_sold, now)` snapshot taken under the offering's write lock, so
//! two purchases racing for the last shares serialize and exactly one of
//! them sees the remaining supply; the other fails with
//! `InsufficientShares` without overselling.

use tracing::info;

use crate::errors::{EngineError, Result};
use crate::phase::phase_of;
use crate::pricing;
use crate::store::OfferingRecord;
use crate::types::{AccountId, Investment, PurchaseReceipt, Timestamp};

pub fn buy_shares(
    record: &OfferingRecord,
    buyer: &AccountId,
    requested: u64,
    now: Timestamp,
) -> Result<PurchaseReceipt> {
    if requested == 0 {
        return Err(EngineError::Validation(
            "requested shares must be positive".into(),
        ));
    }
    if buyer.is_empty() {
        return Err(EngineError::Validation("buyer id must not be empty".into()));
    }

    let config = &record.config;
    let mut state = record.state.write().expect("offering lock poisoned");

    // Single snapshot for eligibility and pricing.
    let shares_sold = state.shares_sold;

    let phase = phase_of(config, shares_sold, now);
    if !phase.purchases_open() {
        return Err(EngineError::SaleClosed {
            id: config.id.clone(),
            phase,
        });
    }

    let remaining = config.total_shares - shares_sold;
    if requested > remaining {
        return Err(EngineError::InsufficientShares {
            id: config.id.clone(),
            requested,
            remaining,
        });
    }

    let total_cost = pricing::cost_for(config, shares_sold, requested, now)?;

    state.shares_sold += requested;
    state.investments.push(Investment {
        investor: buyer.clone(),
        shares: requested,
        amount_paid: total_cost,
        timestamp: now,
    });
    drop(state);

    info!(
        offering = %config.id,
        buyer = %buyer,
        shares = requested,
        cost = %total_cost,
        "shares purchased"
    );

    Ok(PurchaseReceipt {
        shares_granted: requested,
        total_cost,
    })
}
