//! Journal database layer — migrations, appends, reads and submission
//! bookkeeping.
//!
//! The journal is the audit trail: one append-only row per accepted engine
//! operation. The engine itself keeps no persistent state; replaying the
//! journal reconstructs it.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

use crate::errors::Result;
use crate::events::{NewOperation, OperationRecord, SubmissionStatus};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)
        .map_err(sqlx::Error::from)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Appends
// ─────────────────────────────────────────────────────────

/// Append one accepted operation. Returns the journal row id.
pub async fn append_operation(pool: &SqlitePool, op: &NewOperation) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO operations (kind, offering_id, actor, amount, shares, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(op.kind.as_str())
    .bind(&op.offering_id)
    .bind(&op.actor)
    .bind(&op.amount)
    .bind(op.shares)
    .bind(op.timestamp)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

// ─────────────────────────────────────────────────────────
// Submission bookkeeping (used by the gateway)
// ─────────────────────────────────────────────────────────

/// Fetch up to `limit` rows still awaiting ledger submission, oldest first.
pub async fn fetch_pending(pool: &SqlitePool, limit: u32) -> Result<Vec<OperationRecord>> {
    let rows = sqlx::query_as::<_, OperationRecord>(
        r#"
        SELECT id, kind, offering_id, actor, amount, shares, timestamp, status, created_at
        FROM   operations
        WHERE  status = 'pending'
        ORDER  BY id ASC
        LIMIT  ?1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Record the outcome of a ledger submission attempt.
pub async fn set_status(pool: &SqlitePool, row_id: i64, status: SubmissionStatus) -> Result<()> {
    sqlx::query("UPDATE operations SET status = ?1 WHERE id = ?2")
        .bind(status.as_str())
        .bind(row_id)
        .execute(pool)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

/// Fetch all journal rows for a given offering, oldest first.
pub async fn get_operations_for_offering(
    pool: &SqlitePool,
    offering_id: &str,
) -> Result<Vec<OperationRecord>> {
    let rows = sqlx::query_as::<_, OperationRecord>(
        r#"
        SELECT id, kind, offering_id, actor, amount, shares, timestamp, status, created_at
        FROM   operations
        WHERE  offering_id = ?1
        ORDER  BY id ASC
        "#,
    )
    .bind(offering_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all journal rows across all offerings, oldest first.
pub async fn get_all_operations(pool: &SqlitePool) -> Result<Vec<OperationRecord>> {
    let rows = sqlx::query_as::<_, OperationRecord>(
        r#"
        SELECT id, kind, offering_id, actor, amount, shares, timestamp, status, created_at
        FROM   operations
        ORDER  BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
