//! Canonical operation kinds recorded in the journal.
//!
//! Every accepted engine state change produces exactly one journal row; the
//! gateway later submits that row to the external ledger. Monetary amounts
//! are stored as decimal strings because they are `i128` in the engine.

use serde::{Deserialize, Serialize};

/// All state-changing operations the engine can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    OfferingCreated,
    SharesPurchased,
    RevenueDeposited,
    RevenueClaimed,
}

impl OperationKind {
    /// Short identifier string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OfferingCreated => "offering_created",
            Self::SharesPurchased => "shares_purchased",
            Self::RevenueDeposited => "revenue_deposited",
            Self::RevenueClaimed => "revenue_claimed",
        }
    }
}

/// Submission status of a journal row.
///
/// An engine result is provisional until the gateway marks its row
/// `submitted`; a `rejected` row hit a hard ledger error and will not be
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Submitted,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Rejected => "rejected",
        }
    }
}

/// A decoded operation ready to be journaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOperation {
    pub kind: OperationKind,
    pub offering_id: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub shares: Option<i64>,
    pub timestamp: i64,
}

/// A journal row as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OperationRecord {
    pub id: i64,
    pub kind: String,
    pub offering_id: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub shares: Option<i64>,
    pub timestamp: i64,
    pub status: String,
    pub created_at: i64,
}
