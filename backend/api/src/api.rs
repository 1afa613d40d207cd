//! Axum REST handlers for the engine's operation surface.
//!
//! Identities (`creator_id`, `buyer_id`, `investor_id`) arrive as
//! already-trusted strings: signature verification happened in the wallet
//! collaborator before a request reaches this service. Every accepted state
//! change is appended to the journal, from which the gateway submits it to
//! the ledger; callers must treat mutating responses as provisional until
//! that submission confirms.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use viewshare_engine::{
    CreateOffering, Engine, Investment, OfferingSnapshot, PricingCurve, RevenueSummary, SalePhase,
};

use crate::auth::{Challenge, ChallengeStore};
use crate::errors::{ApiError, Result};
use crate::events::{NewOperation, OperationKind, OperationRecord};
use crate::journal;

const HOUR: u64 = 3_600;
const DAY: u64 = 24 * HOUR;

#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<Engine>,
    pub pool: SqlitePool,
    pub challenges: Arc<ChallengeStore>,
}

/// Wall-clock now as a unix timestamp; the engine itself never reads a clock.
fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveRequest {
    /// On-demand content: bonding curve over cumulative shares sold.
    Supply {
        price_increment: i128,
        sale_duration_days: u32,
    },
    /// Scheduled stream: price rises across the pre-live window.
    Timed {
        max_price: i128,
        pre_live_duration_hours: u32,
        stream_start: u64,
    },
}

#[derive(Deserialize)]
pub struct CreateOfferingRequest {
    pub content_id: String,
    pub creator_id: String,
    pub total_shares: u64,
    pub base_price: i128,
    pub curve: CurveRequest,
}

#[derive(Serialize)]
pub struct CreateOfferingResponse {
    pub offering_id: String,
}

#[derive(Deserialize)]
pub struct BuySharesRequest {
    pub buyer_id: String,
    pub shares: u64,
}

#[derive(Serialize)]
pub struct BuySharesResponse {
    pub shares_granted: u64,
    pub total_cost: i128,
}

#[derive(Deserialize)]
pub struct DepositRequest {
    pub depositor_id: String,
    pub amount: i128,
}

#[derive(Serialize)]
pub struct DepositResponse {
    pub new_pool_total: i128,
}

#[derive(Deserialize)]
pub struct ClaimRequest {
    pub investor_id: String,
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub claimed_amount: i128,
}

#[derive(Serialize)]
pub struct PriceResponse {
    pub price: i128,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: SalePhase,
}

#[derive(Serialize)]
pub struct InvestmentsResponse {
    pub offering_id: String,
    pub count: usize,
    pub investments: Vec<Investment>,
}

#[derive(Serialize)]
pub struct OperationsResponse {
    pub count: usize,
    pub operations: Vec<OperationRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Deserialize)]
pub struct ChallengeRequest {
    pub public_key: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub public_key: String,
    pub challenge: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub identity: String,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /offerings`
pub async fn create_offering(
    State(state): State<ApiState>,
    Json(req): Json<CreateOfferingRequest>,
) -> Result<impl IntoResponse> {
    let now = now();
    let curve = match req.curve {
        CurveRequest::Supply {
            price_increment,
            sale_duration_days,
        } => PricingCurve::Supply {
            price_increment,
            sale_deadline: now + sale_duration_days as u64 * DAY,
        },
        CurveRequest::Timed {
            max_price,
            pre_live_duration_hours,
            stream_start,
        } => PricingCurve::Timed {
            max_price,
            stream_start,
            pre_live_duration: pre_live_duration_hours as u64 * HOUR,
        },
    };

    let offering_id = state.engine.create_offering(
        CreateOffering {
            id: req.content_id,
            creator: req.creator_id.clone(),
            total_shares: req.total_shares,
            base_price: req.base_price,
            curve,
        },
        now,
    )?;

    journal::append_operation(
        &state.pool,
        &NewOperation {
            kind: OperationKind::OfferingCreated,
            offering_id: offering_id.clone(),
            actor: Some(req.creator_id),
            amount: None,
            shares: Some(req.total_shares as i64),
            timestamp: now as i64,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CreateOfferingResponse { offering_id })))
}

/// `POST /offerings/:id/purchase`
pub async fn buy_shares(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
    Json(req): Json<BuySharesRequest>,
) -> Result<impl IntoResponse> {
    let now = now();
    let receipt = state
        .engine
        .buy_shares(&offering_id, &req.buyer_id, req.shares, now)?;

    // The in-memory state has already advanced; a journal failure here
    // surfaces as a 500 so the caller knows the operation will not reach
    // the ledger.
    journal::append_operation(
        &state.pool,
        &NewOperation {
            kind: OperationKind::SharesPurchased,
            offering_id,
            actor: Some(req.buyer_id),
            amount: Some(receipt.total_cost.to_string()),
            shares: Some(receipt.shares_granted as i64),
            timestamp: now as i64,
        },
    )
    .await?;

    Ok(Json(BuySharesResponse {
        shares_granted: receipt.shares_granted,
        total_cost: receipt.total_cost,
    }))
}

/// `POST /offerings/:id/deposits`
pub async fn deposit_revenue(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
    Json(req): Json<DepositRequest>,
) -> Result<impl IntoResponse> {
    let now = now();
    let new_pool_total =
        state
            .engine
            .deposit_revenue(&offering_id, &req.depositor_id, req.amount, now)?;

    journal::append_operation(
        &state.pool,
        &NewOperation {
            kind: OperationKind::RevenueDeposited,
            offering_id,
            actor: Some(req.depositor_id),
            amount: Some(req.amount.to_string()),
            shares: None,
            timestamp: now as i64,
        },
    )
    .await?;

    Ok(Json(DepositResponse { new_pool_total }))
}

/// `POST /offerings/:id/claims`
pub async fn claim_revenue(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
    Json(req): Json<ClaimRequest>,
) -> Result<impl IntoResponse> {
    let now = now();
    let claimed_amount = state
        .engine
        .claim_revenue(&offering_id, &req.investor_id, now)?;

    journal::append_operation(
        &state.pool,
        &NewOperation {
            kind: OperationKind::RevenueClaimed,
            offering_id,
            actor: Some(req.investor_id),
            amount: Some(claimed_amount.to_string()),
            shares: None,
            timestamp: now as i64,
        },
    )
    .await?;

    Ok(Json(ClaimResponse { claimed_amount }))
}

/// `GET /offerings/:id`
pub async fn get_offering(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
) -> Result<Json<OfferingSnapshot>> {
    Ok(Json(state.engine.get_offering(&offering_id)?))
}

/// `GET /offerings/:id/price`
pub async fn get_current_price(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
) -> Result<Json<PriceResponse>> {
    let price = state.engine.get_current_price(&offering_id, now())?;
    Ok(Json(PriceResponse { price }))
}

/// `GET /offerings/:id/status`
pub async fn get_stream_status(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
) -> Result<Json<StatusResponse>> {
    let status = state.engine.get_stream_status(&offering_id, now())?;
    Ok(Json(StatusResponse { status }))
}

/// `GET /offerings/:id/investments`
pub async fn get_investments(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
) -> Result<Json<InvestmentsResponse>> {
    let investments = state.engine.get_investments(&offering_id)?;
    Ok(Json(InvestmentsResponse {
        offering_id,
        count: investments.len(),
        investments,
    }))
}

/// `GET /offerings/:id/revenue`
pub async fn get_revenue(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
) -> Result<Json<RevenueSummary>> {
    Ok(Json(state.engine.get_revenue(&offering_id)?))
}

/// `GET /offerings/:id/events`
///
/// Journal rows for one offering — the audit trail of accepted operations
/// and their ledger submission status.
pub async fn get_offering_operations(
    State(state): State<ApiState>,
    Path(offering_id): Path<String>,
) -> Result<Json<OperationsResponse>> {
    let operations = journal::get_operations_for_offering(&state.pool, &offering_id).await?;
    Ok(Json(OperationsResponse {
        count: operations.len(),
        operations,
    }))
}

/// `GET /events`
pub async fn get_all_operations(
    State(state): State<ApiState>,
) -> Result<Json<OperationsResponse>> {
    let operations = journal::get_all_operations(&state.pool).await?;
    Ok(Json(OperationsResponse {
        count: operations.len(),
        operations,
    }))
}

/// `POST /auth/challenge`
pub async fn issue_challenge(
    State(state): State<ApiState>,
    Json(req): Json<ChallengeRequest>,
) -> Result<Json<Challenge>> {
    if req.public_key.is_empty() {
        return Err(ApiError::BadRequest("public_key must not be empty".into()));
    }
    Ok(Json(state.challenges.issue(&req.public_key, now())))
}

/// `POST /auth/verify`
///
/// Consumes the outstanding challenge for a key. The signature itself was
/// checked by the wallet collaborator; this endpoint only enforces that the
/// challenge exists, has not expired and is used at most once.
pub async fn verify_challenge(
    State(state): State<ApiState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    if state.challenges.consume(&req.public_key, &req.challenge, now()) {
        Ok(Json(VerifyResponse {
            identity: req.public_key,
        }))
    } else {
        Err(ApiError::BadRequest(
            "unknown or expired challenge".to_string(),
        ))
    }
}
