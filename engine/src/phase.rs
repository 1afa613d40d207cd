//! # Sale window state machine
//!
//! The phase of an offering is never stored; it is a pure projection of the
//! immutable config plus a `(shares_sold, now)` snapshot. Terminal phases
//! (`Live`, `Closed`) are absorbing because time only moves forward and
//! `shares_sold` never decreases.
//!
//! Boundary semantics, matching the original contracts:
//! - `now == stream_start` is already `Live` (purchases rejected exactly at
//!   stream start).
//! - `now == sale_deadline` is still `Open` (only `now > deadline` closes
//!   the supply-curve sale).

use crate::types::{OfferingConfig, PricingCurve, SalePhase, Timestamp};

/// Derive the current sale phase for an offering.
pub fn phase_of(config: &OfferingConfig, shares_sold: u64, now: Timestamp) -> SalePhase {
    match &config.curve {
        PricingCurve::Supply { sale_deadline, .. } => {
            if now > *sale_deadline || shares_sold >= config.total_shares {
                SalePhase::Closed
            } else {
                SalePhase::Open
            }
        }
        PricingCurve::Timed {
            stream_start,
            pre_live_duration,
            ..
        } => {
            let sale_start = stream_start.saturating_sub(*pre_live_duration);
            if now < sale_start {
                SalePhase::Upcoming
            } else if now < *stream_start {
                SalePhase::PreLive
            } else {
                SalePhase::Live
            }
        }
    }
}
