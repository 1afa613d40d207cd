//! # Types
//!
//! Shared data structures used across all modules of the engine.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! An offering is internally stored as two separate parts:
//!
//! - [`OfferingConfig`] — written once at creation; never mutated.
//! - [`OfferingState`] — written on every purchase, deposit and claim.
//!
//! The public API exposes the reconstructed [`OfferingSnapshot`] for
//! convenience. Keeping the immutable parameters out of the mutable record
//! means a reader holding only the config can price and phase an offering
//! without touching the state lock.
//!
//! ### Phase as a derived Finite-State Machine
//!
//! [`SalePhase`] is never stored. It is recomputed from the config plus a
//! `(shares_sold, now)` snapshot, so there is no stored state that could
//! drift out of sync with the timestamps:
//!
//! ```text
//! time curve:    Upcoming ──► PreLive ──► Live
//! supply curve:  Open ──► Closed
//! ```
//!
//! `Live` and `Closed` are absorbing; nothing transitions back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Content identifier an offering is keyed by (video id or stream id).
pub type OfferingId = String;

/// Externally-authenticated account identity. The engine never verifies
/// signatures; it receives an already-trusted identity string.
pub type AccountId = String;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Monetary amount in the smallest currency unit. All monetary results are
/// truncated (floor); the engine never rounds up.
pub type Amount = i128;

/// Pricing curve parameters, selected at offering creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingCurve {
    /// Supply-based bonding curve for on-demand content: the `k`-th share
    /// sold (0-indexed) costs `base_price + price_increment * k`. Purchases
    /// close when `sale_deadline` passes or the offering sells out.
    Supply {
        price_increment: Amount,
        sale_deadline: Timestamp,
    },
    /// Time-based curve for scheduled streams: the price rises linearly
    /// from `base_price` at the start of the pre-live window to `max_price`
    /// at `stream_start`, after which purchases close.
    Timed {
        max_price: Amount,
        stream_start: Timestamp,
        /// Length of the pre-live purchase window in seconds. The window
        /// opens at `stream_start - pre_live_duration`.
        pre_live_duration: u64,
    },
}

/// Immutable offering parameters, written once at creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OfferingConfig {
    pub id: OfferingId,
    /// Account that created the offering and may deposit revenue.
    pub creator: AccountId,
    /// Fixed share supply; never changes after creation.
    pub total_shares: u64,
    /// Price of the first share, in the smallest currency unit.
    pub base_price: Amount,
    pub curve: PricingCurve,
    pub created_at: Timestamp,
}

/// One purchase event. Immutable once recorded; an investor's holding is
/// the sum of their investments for the offering.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub investor: AccountId,
    pub shares: u64,
    pub amount_paid: Amount,
    pub timestamp: Timestamp,
}

/// One creator deposit into the revenue pool. Immutable, append-only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RevenueDeposit {
    pub depositor: AccountId,
    pub amount: Amount,
    pub timestamp: Timestamp,
}

/// Running claim total for one (offering, investor) pair. Updated in place
/// on each successful claim; `cumulative_claimed` is monotonic.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub investor: AccountId,
    pub cumulative_claimed: Amount,
    pub last_claim: Timestamp,
}

/// Mutable offering state, guarded by the per-offering lock.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct OfferingState {
    /// Monotonic non-decreasing; bounded by `total_shares`.
    pub shares_sold: u64,
    pub investments: Vec<Investment>,
    pub deposits: Vec<RevenueDeposit>,
    pub claims: HashMap<AccountId, ClaimRecord>,
    /// Sum of all deposit amounts.
    pub pool_total: Amount,
    /// Sum of all cumulative claims; never exceeds `pool_total`.
    pub distributed_total: Amount,
    /// Timestamp of the most recent deposit or claim.
    pub last_distribution: Timestamp,
}

impl OfferingState {
    /// Total shares held by `investor` across all their investments.
    pub fn holding_of(&self, investor: &str) -> u64 {
        self.investments
            .iter()
            .filter(|inv| inv.investor == investor)
            .map(|inv| inv.shares)
            .sum()
    }

    pub fn cumulative_claimed_by(&self, investor: &str) -> Amount {
        self.claims
            .get(investor)
            .map(|c| c.cumulative_claimed)
            .unwrap_or(0)
    }
}

/// Lifecycle phase of an offering's sale window, derived from config plus
/// a `(shares_sold, now)` snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalePhase {
    /// Time curve: before the pre-live window. Purchases rejected.
    Upcoming,
    /// Time curve: within the pre-live window. Purchases allowed,
    /// price rising.
    PreLive,
    /// Time curve: the stream has started. Purchases closed; terminal.
    Live,
    /// Supply curve: deadline not passed and shares remain.
    Open,
    /// Supply curve: deadline passed or sold out. Terminal.
    Closed,
}

impl SalePhase {
    /// Whether `buy_shares` is accepted in this phase.
    pub fn purchases_open(&self) -> bool {
        matches!(self, SalePhase::PreLive | SalePhase::Open)
    }
}

/// Result of a successful purchase.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub shares_granted: u64,
    pub total_cost: Amount,
}

/// Public read model of an offering, combining config and state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OfferingSnapshot {
    pub id: OfferingId,
    pub creator: AccountId,
    pub total_shares: u64,
    pub shares_sold: u64,
    pub remaining_shares: u64,
    pub base_price: Amount,
    pub curve: PricingCurve,
    pub created_at: Timestamp,
}

/// Aggregate view of an offering's revenue pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_amount: Amount,
    pub distributed_amount: Amount,
    pub last_distribution: Timestamp,
}
