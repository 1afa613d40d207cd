//! Transaction gateway — drains pending journal rows and submits them to
//! the external ledger RPC.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried
//!   silently; a row stays `pending` across restarts until a submission
//!   succeeds.
//! * Hard RPC rejections (malformed request, unknown method) are
//!   deterministic: the row is marked `rejected` and never retried.
//!
//! The engine treats every accepted operation as provisional until its row
//! leaves `pending`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::Result;
use crate::events::{OperationRecord, SubmissionStatus};
use crate::journal;

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;
/// Give up on a row for this cycle after this many attempts; it stays
/// pending and is picked up again next drain.
const MAX_ATTEMPTS_PER_CYCLE: u32 = 5;

pub struct GatewayState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Outcome of trying to push one row to the ledger.
enum Submission {
    Accepted,
    /// Deterministic rejection; retrying changes nothing.
    Rejected(String),
    /// Transient failure; row stays pending.
    GaveUp,
}

/// Run the gateway loop until `shutdown` fires.
pub async fn run(state: Arc<GatewayState>, shutdown: CancellationToken) {
    info!(
        "Gateway starting — ledger RPC: {}",
        state.config.ledger_rpc_url
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Gateway shutting down");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.submit_interval_secs)) => {}
        }

        if let Err(e) = drain_once(&state, &shutdown).await {
            error!("Gateway drain error: {e}");
        }
    }
}

/// Submit one batch of pending rows.
async fn drain_once(state: &GatewayState, shutdown: &CancellationToken) -> Result<()> {
    let pending = journal::fetch_pending(&state.pool, state.config.submit_batch_size).await?;
    if pending.is_empty() {
        return Ok(());
    }
    debug!("Draining {} pending operation(s)", pending.len());

    for row in &pending {
        if shutdown.is_cancelled() {
            return Ok(());
        }
        match submit_row(state, row, shutdown).await {
            Submission::Accepted => {
                journal::set_status(&state.pool, row.id, SubmissionStatus::Submitted).await?;
                info!(row = row.id, kind = %row.kind, "operation submitted to ledger");
            }
            Submission::Rejected(reason) => {
                journal::set_status(&state.pool, row.id, SubmissionStatus::Rejected).await?;
                error!(row = row.id, kind = %row.kind, "ledger rejected operation: {reason}");
            }
            Submission::GaveUp => {
                // Stop the cycle; the RPC is unhealthy and later rows
                // would only burn the same backoff budget.
                break;
            }
        }
    }
    Ok(())
}

/// Try to submit a single row, backing off on transient failures.
async fn submit_row(
    state: &GatewayState,
    row: &OperationRecord,
    shutdown: &CancellationToken,
) -> Submission {
    let mut backoff = INITIAL_BACKOFF_SECS;

    for _ in 0..MAX_ATTEMPTS_PER_CYCLE {
        let response = state
            .client
            .post(&state.config.ledger_rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": row.id,
                "method": "submitOperation",
                "params": {
                    "kind": row.kind,
                    "offeringId": row.offering_id,
                    "actor": row.actor,
                    "amount": row.amount,
                    "shares": row.shares,
                    "timestamp": row.timestamp,
                },
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!(row = row.id, "ledger RPC request failed (retry in {backoff}s): {e}");
            }
            Ok(resp) if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                warn!(row = row.id, "rate-limited by ledger RPC (retry in {backoff}s)");
            }
            Ok(resp) => match resp.json::<RpcResponse>().await {
                Err(e) => {
                    warn!(row = row.id, "malformed RPC response (retry in {backoff}s): {e}");
                }
                Ok(body) => match body.error {
                    None => return Submission::Accepted,
                    // -32600 invalid request / -32601 unknown method are
                    // hard failures; everything else is retried.
                    Some(err) if err.code == -32600 || err.code == -32601 => {
                        return Submission::Rejected(format!("{}: {}", err.code, err.message));
                    }
                    Some(err) => {
                        warn!(
                            row = row.id,
                            "RPC soft error (retry in {backoff}s): {} {}", err.code, err.message
                        );
                    }
                },
            },
        }

        tokio::select! {
            _ = shutdown.cancelled() => return Submission::GaveUp,
            _ = tokio::time::sleep(Duration::from_secs(backoff)) => {}
        }
        backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
    }

    Submission::GaveUp
}
