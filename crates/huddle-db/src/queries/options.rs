//! Database query functions for the `options` table.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::OptionRow;

/// Insert one option for a plan. Returns the generated id, which also fixes
/// the option's display position.
pub async fn insert_option<'e>(
    executor: impl PgExecutor<'e>,
    plan_id: &str,
    option_time: &str,
) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO options (plan_id, option_time) VALUES ($1, $2) RETURNING id",
    )
    .bind(plan_id)
    .bind(option_time)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to insert option {option_time:?} for plan {plan_id:?}"))?;

    Ok(id)
}

/// List every option of a plan in insertion order.
pub async fn list_options_for_plan<'e>(
    executor: impl PgExecutor<'e>,
    plan_id: &str,
) -> Result<Vec<OptionRow>> {
    let rows = sqlx::query_as::<_, OptionRow>(
        "SELECT id, plan_id, option_time FROM options WHERE plan_id = $1 ORDER BY id",
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await
    .context("failed to list options for plan")?;

    Ok(rows)
}

/// Resolve an option id by exact key.
///
/// Should two rows share a key (possible only in tables created before the
/// unique constraint), the lowest id wins.
pub async fn find_option_id<'e>(
    executor: impl PgExecutor<'e>,
    plan_id: &str,
    option_time: &str,
) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM options \
         WHERE plan_id = $1 AND option_time = $2 \
         ORDER BY id \
         LIMIT 1",
    )
    .bind(plan_id)
    .bind(option_time)
    .fetch_optional(executor)
    .await
    .with_context(|| format!("failed to look up option {option_time:?}"))?;

    Ok(id)
}
