//! Relational schema for plans, options, responses, and response choices.
//!
//! There are no migrations. [`ensure_schema`] issues `IF NOT EXISTS` DDL and
//! is safe to run on every start.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

/// The four tables owned by this crate, parents before children.
pub const TABLES: [&str; 4] = ["plans", "options", "responses", "response_choices"];

/// DDL statements, applied in order.
///
/// `options` carries `UNIQUE (plan_id, option_time)` so a response key always
/// resolves to a single option.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS plans ( \
         id   TEXT PRIMARY KEY, \
         name TEXT NOT NULL CHECK (name <> '') \
     )",
    "CREATE TABLE IF NOT EXISTS options ( \
         id          BIGSERIAL PRIMARY KEY, \
         plan_id     TEXT NOT NULL REFERENCES plans (id), \
         option_time TEXT NOT NULL, \
         UNIQUE (plan_id, option_time) \
     )",
    "CREATE TABLE IF NOT EXISTS responses ( \
         id      BIGSERIAL PRIMARY KEY, \
         plan_id TEXT NOT NULL REFERENCES plans (id), \
         name    TEXT NOT NULL \
     )",
    "CREATE TABLE IF NOT EXISTS response_choices ( \
         response_id BIGINT NOT NULL REFERENCES responses (id), \
         option_id   BIGINT NOT NULL REFERENCES options (id), \
         choice      TEXT NOT NULL CHECK (choice IN ('yes', 'maybe', 'no')), \
         PRIMARY KEY (response_id, option_id) \
     )",
    "CREATE INDEX IF NOT EXISTS options_plan_id_idx ON options (plan_id, id)",
    "CREATE INDEX IF NOT EXISTS responses_plan_id_idx ON responses (plan_id, id)",
];

/// Advisory lock key held while the schema is applied.
const SCHEMA_LOCK_KEY: i64 = 0x6875_6464_6c65;

/// Create any missing tables and indexes.
///
/// Runs in one transaction so a failure leaves the schema untouched.
/// Concurrent callers are serialized on a transaction-scoped advisory lock;
/// `IF NOT EXISTS` alone races in the catalog on a fresh database.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("failed to begin schema transaction")?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .context("failed to acquire schema lock")?;

    for stmt in SCHEMA_STATEMENTS {
        sqlx::query(stmt)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to apply schema statement: {stmt}"))?;
    }

    tx.commit().await.context("failed to commit schema")?;

    info!("schema ready");
    Ok(())
}
