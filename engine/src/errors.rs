//! Engine-wide error types.
//!
//! Every variant is a deterministic domain rejection and carries the
//! structured detail a caller needs to render a specific message. Nothing
//! here is retryable: retrying a deterministic rejection changes nothing,
//! so no retry happens inside the engine.

use thiserror::Error;

use crate::types::{AccountId, OfferingId, SalePhase};

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid parameter: {0}")]
    Validation(String),

    #[error("offering not found: {0}")]
    NotFound(OfferingId),

    #[error("unauthorized: {actor} is not the creator of offering {id}")]
    Unauthorized { id: OfferingId, actor: AccountId },

    #[error("sale closed for offering {id} (phase {phase:?})")]
    SaleClosed { id: OfferingId, phase: SalePhase },

    #[error("insufficient shares in offering {id}: requested {requested}, remaining {remaining}")]
    InsufficientShares {
        id: OfferingId,
        requested: u64,
        remaining: u64,
    },

    #[error("nothing to claim for {investor} in offering {id}")]
    NothingToClaim {
        id: OfferingId,
        investor: AccountId,
    },

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

pub type Result<T> = std::result::Result<T, EngineError>;
