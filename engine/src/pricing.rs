//! # PricingEngine
//!
//! Pure pricing functions over an [`OfferingConfig`] plus a snapshot of
//! `(shares_sold, now)`. Nothing here reads a clock or touches a lock; the
//! caller passes the single snapshot used for both eligibility and cost
//! (a late price read must never grant a stale price).
//!
//! All arithmetic is `i128` and checked; an overflow surfaces as
//! [`EngineError::Overflow`] instead of a panic. Monetary results are
//! truncated toward zero (floor for the non-negative values involved) —
//! the engine never rounds up.

use crate::errors::{EngineError, Result};
use crate::types::{Amount, OfferingConfig, PricingCurve, Timestamp};

/// Per-share price at the given snapshot.
///
/// - Supply curve: the price of the *next* share, i.e. share index
///   `shares_sold`, which is `base + increment * shares_sold`.
/// - Time curve: linear interpolation from `base` to `max` across the
///   pre-live window, clamped at both ends. After `stream_start` the quote
///   saturates at `max` even though purchases are no longer accepted.
pub fn current_price(config: &OfferingConfig, shares_sold: u64, now: Timestamp) -> Result<Amount> {
    match &config.curve {
        PricingCurve::Supply {
            price_increment, ..
        } => share_index_price(config.base_price, *price_increment, shares_sold),
        PricingCurve::Timed {
            max_price,
            stream_start,
            pre_live_duration,
        } => timed_price(
            config.base_price,
            *max_price,
            *stream_start,
            *pre_live_duration,
            now,
        ),
    }
}

/// Total cost of buying `shares` shares at the given snapshot.
///
/// All-or-nothing: the caller has already checked availability against the
/// same `shares_sold` snapshot.
pub fn cost_for(
    config: &OfferingConfig,
    shares_sold: u64,
    shares: u64,
    now: Timestamp,
) -> Result<Amount> {
    match &config.curve {
        PricingCurve::Supply {
            price_increment, ..
        } => supply_cost(config.base_price, *price_increment, shares_sold, shares),
        PricingCurve::Timed { .. } => {
            let unit = current_price(config, shares_sold, now)?;
            unit.checked_mul(shares as Amount)
                .ok_or(EngineError::Overflow("timed purchase cost"))
        }
    }
}

/// Price of share index `k` on the supply curve: `base + increment * k`.
fn share_index_price(base: Amount, increment: Amount, k: u64) -> Result<Amount> {
    increment
        .checked_mul(k as Amount)
        .and_then(|step| base.checked_add(step))
        .ok_or(EngineError::Overflow("supply curve price"))
}

/// Closed-form sum of the supply curve over `m` shares starting at index `n`:
///
/// `Σ_{k=n}^{n+m-1} (base + increment * k)
///   = m*base + increment * (m*n + m*(m-1)/2)`
///
/// `m*(m-1)` is always even, so the division is exact.
fn supply_cost(base: Amount, increment: Amount, n: u64, m: u64) -> Result<Amount> {
    let m = m as Amount;
    let n = n as Amount;

    let index_sum = m
        .checked_mul(n)
        .and_then(|linear| {
            m.checked_mul(m - 1)
                .map(|t| t / 2)
                .and_then(|tri| linear.checked_add(tri))
        })
        .ok_or(EngineError::Overflow("supply curve index sum"))?;

    m.checked_mul(base)
        .and_then(|flat| {
            increment
                .checked_mul(index_sum)
                .and_then(|rising| flat.checked_add(rising))
        })
        .ok_or(EngineError::Overflow("supply purchase cost"))
}

/// Linear pre-live interpolation, integer floor division.
fn timed_price(
    base: Amount,
    max: Amount,
    stream_start: Timestamp,
    pre_live_duration: u64,
    now: Timestamp,
) -> Result<Amount> {
    let sale_start = stream_start.saturating_sub(pre_live_duration);

    if now <= sale_start {
        return Ok(base);
    }
    if now >= stream_start {
        return Ok(max);
    }

    let elapsed = (now - sale_start) as Amount;
    let range = max - base;
    let rise = range
        .checked_mul(elapsed)
        .ok_or(EngineError::Overflow("timed curve interpolation"))?
        / pre_live_duration as Amount;

    base.checked_add(rise)
        .ok_or(EngineError::Overflow("timed curve price"))
}
