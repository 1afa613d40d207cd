//! # viewshare-engine
//!
//! Core engine for selling fractional, non-refundable shares in the future
//! revenue of creator content (on-demand videos and scheduled live streams),
//! and for distributing deposited revenue to shareholders pro rata.
//!
//! | Phase        | Entry point(s)                                    |
//! |--------------|---------------------------------------------------|
//! | Creation     | [`Engine::create_offering`]                       |
//! | Sale         | [`Engine::buy_shares`]                            |
//! | Distribution | [`Engine::deposit_revenue`], [`Engine::claim_revenue`] |
//! | Queries      | `get_offering`, `get_current_price`, `get_stream_status`, `get_investments`, `get_revenue` |
//!
//! ## Architecture
//!
//! Pricing is fully delegated to `pricing`, phase derivation to `phase`,
//! purchase processing to `ledger`, pool settlement to `revenue` and record
//! storage to `store`. This file contains only the public entry points —
//! no business logic lives here directly.
//!
//! The engine performs no I/O, signing or network submission. Identities
//! are already-trusted strings supplied by an external authentication
//! collaborator, and accepted state changes are handed to an external
//! transaction gateway by the host; results are provisional until that
//! submission confirms.
//!
//! Time-dependent operations take an explicit `now` unix timestamp so the
//! host controls the clock and tests are deterministic.

mod errors;
mod ledger;
mod phase;
mod pricing;
mod revenue;
mod store;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_phase;
#[cfg(test)]
mod test_revenue;

pub use errors::{EngineError, Result};
pub use store::CreateOffering;
pub use types::{
    AccountId, Amount, ClaimRecord, Investment, OfferingConfig, OfferingId, OfferingSnapshot,
    PricingCurve, PurchaseReceipt, RevenueDeposit, RevenueSummary, SalePhase, Timestamp,
};

use store::Registry;

/// The offering / pricing / ledger / revenue-distribution engine.
///
/// Cheap to share behind an `Arc`; all methods take `&self`. Mutating
/// operations on the same offering are linearizable (they serialize on a
/// per-offering lock); different offerings proceed in parallel.
#[derive(Debug, Default)]
pub struct Engine {
    registry: Registry,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new offering. Validates parameters and id uniqueness.
    pub fn create_offering(&self, params: CreateOffering, now: Timestamp) -> Result<OfferingId> {
        self.registry.create(params, now)
    }

    /// Buy shares in an offering. All-or-nothing: fails without effect if
    /// the sale window is closed or fewer shares remain than requested.
    pub fn buy_shares(
        &self,
        offering_id: &str,
        buyer: &AccountId,
        shares: u64,
        now: Timestamp,
    ) -> Result<PurchaseReceipt> {
        let record = self.registry.get(offering_id)?;
        ledger::buy_shares(&record, buyer, shares, now)
    }

    /// Deposit earned revenue into an offering's pool. Creator only.
    /// Returns the new pool total.
    pub fn deposit_revenue(
        &self,
        offering_id: &str,
        depositor: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        let record = self.registry.get(offering_id)?;
        revenue::deposit_revenue(&record, depositor, amount, now)
    }

    /// Claim the caller's unclaimed share of the revenue pool. Returns the
    /// amount paid out.
    pub fn claim_revenue(
        &self,
        offering_id: &str,
        investor: &AccountId,
        now: Timestamp,
    ) -> Result<Amount> {
        let record = self.registry.get(offering_id)?;
        revenue::claim_revenue(&record, investor, now)
    }

    /// Snapshot of an offering's parameters and sale progress.
    pub fn get_offering(&self, offering_id: &str) -> Result<OfferingSnapshot> {
        let record = self.registry.get(offering_id)?;
        let config = &record.config;
        let state = record.state.read().expect("offering lock poisoned");
        Ok(OfferingSnapshot {
            id: config.id.clone(),
            creator: config.creator.clone(),
            total_shares: config.total_shares,
            shares_sold: state.shares_sold,
            remaining_shares: config.total_shares - state.shares_sold,
            base_price: config.base_price,
            curve: config.curve.clone(),
            created_at: config.created_at,
        })
    }

    /// Current per-share price.
    pub fn get_current_price(&self, offering_id: &str, now: Timestamp) -> Result<Amount> {
        let record = self.registry.get(offering_id)?;
        let shares_sold = record.state.read().expect("offering lock poisoned").shares_sold;
        pricing::current_price(&record.config, shares_sold, now)
    }

    /// Current sale-window phase.
    pub fn get_stream_status(&self, offering_id: &str, now: Timestamp) -> Result<SalePhase> {
        let record = self.registry.get(offering_id)?;
        let shares_sold = record.state.read().expect("offering lock poisoned").shares_sold;
        Ok(phase::phase_of(&record.config, shares_sold, now))
    }

    /// All recorded investments for an offering, in purchase order.
    pub fn get_investments(&self, offering_id: &str) -> Result<Vec<Investment>> {
        let record = self.registry.get(offering_id)?;
        let state = record.state.read().expect("offering lock poisoned");
        Ok(state.investments.clone())
    }

    /// Test hook: direct access to an offering record for invariant checks.
    #[cfg(test)]
    pub(crate) fn record(&self, offering_id: &str) -> std::sync::Arc<store::OfferingRecord> {
        self.registry.get(offering_id).expect("offering exists")
    }

    /// Aggregate view of an offering's revenue pool.
    pub fn get_revenue(&self, offering_id: &str) -> Result<RevenueSummary> {
        let record = self.registry.get(offering_id)?;
        let state = record.state.read().expect("offering lock poisoned");
        Ok(RevenueSummary {
            total_amount: state.pool_total,
            distributed_amount: state.distributed_total,
            last_distribution: state.last_distribution,
        })
    }
}
