//! # OfferingRegistry
//!
//! In-memory arena of offering records keyed by content id. The original
//! logic ran inside a ledger-execution environment with implicit global
//! sequential consistency; re-hosted as a library this becomes an explicit
//! per-offering lock discipline:
//!
//! - The registry map itself is behind a `RwLock`, taken briefly for
//!   insert/lookup.
//! - Each record holds the immutable [`OfferingConfig`] next to a
//!   `RwLock<OfferingState>`. Mutating operations on one offering serialize
//!   on that state lock; different offerings are fully independent.
//! - Readers take the shared lock only, so they may observe the pre- or
//!   post-state of an in-flight write but never a torn one.
//!
//! Offerings are never deleted. A closed offering simply stops accepting
//! purchases and remains readable forever.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::errors::{EngineError, Result};
use crate::types::{
    AccountId, Amount, OfferingConfig, OfferingId, OfferingState, PricingCurve, Timestamp,
};

/// One offering: write-once config plus lock-guarded mutable state.
#[derive(Debug)]
pub struct OfferingRecord {
    pub config: OfferingConfig,
    pub state: RwLock<OfferingState>,
}

/// Parameters for `create_offering`, prior to validation.
#[derive(Clone, Debug)]
pub struct CreateOffering {
    pub id: OfferingId,
    pub creator: AccountId,
    pub total_shares: u64,
    pub base_price: Amount,
    pub curve: PricingCurve,
}

#[derive(Debug, Default)]
pub struct Registry {
    offerings: RwLock<HashMap<OfferingId, Arc<OfferingRecord>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a new offering. Fails if the id is taken or any
    /// parameter is out of range.
    pub fn create(&self, params: CreateOffering, now: Timestamp) -> Result<OfferingId> {
        validate(&params, now)?;

        let config = OfferingConfig {
            id: params.id.clone(),
            creator: params.creator,
            total_shares: params.total_shares,
            base_price: params.base_price,
            curve: params.curve,
            created_at: now,
        };

        let record = Arc::new(OfferingRecord {
            config,
            state: RwLock::new(OfferingState {
                last_distribution: now,
                ..OfferingState::default()
            }),
        });

        let mut map = self.offerings.write().expect("registry lock poisoned");
        if map.contains_key(&params.id) {
            return Err(EngineError::Validation(format!(
                "offering {} already exists",
                params.id
            )));
        }
        map.insert(params.id.clone(), record);
        drop(map);

        info!(offering = %params.id, "offering created");
        Ok(params.id)
    }

    /// Look up an offering record by id.
    pub fn get(&self, id: &str) -> Result<Arc<OfferingRecord>> {
        self.offerings
            .read()
            .expect("registry lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }
}

fn validate(params: &CreateOffering, now: Timestamp) -> Result<()> {
    if params.id.is_empty() {
        return Err(EngineError::Validation("offering id must not be empty".into()));
    }
    if params.creator.is_empty() {
        return Err(EngineError::Validation("creator id must not be empty".into()));
    }
    if params.total_shares == 0 {
        return Err(EngineError::Validation("total_shares must be positive".into()));
    }
    if params.base_price <= 0 {
        return Err(EngineError::Validation("base_price must be positive".into()));
    }

    match &params.curve {
        PricingCurve::Supply {
            price_increment,
            sale_deadline,
        } => {
            if *price_increment < 0 {
                return Err(EngineError::Validation(
                    "price_increment must not be negative".into(),
                ));
            }
            if *sale_deadline <= now {
                return Err(EngineError::Validation(
                    "sale_deadline must be in the future".into(),
                ));
            }
        }
        PricingCurve::Timed {
            max_price,
            stream_start,
            pre_live_duration,
        } => {
            if *max_price < params.base_price {
                return Err(EngineError::Validation(
                    "max_price must be at least base_price".into(),
                ));
            }
            if *pre_live_duration == 0 {
                return Err(EngineError::Validation(
                    "pre_live_duration must be positive".into(),
                ));
            }
            // The pre-live window must still be ahead of us, as the
            // original stream contract required.
            if stream_start.saturating_sub(*pre_live_duration) <= now {
                return Err(EngineError::Validation(
                    "pre-live window must start in the future".into(),
                ));
            }
        }
    }

    Ok(())
}
