//! Database query functions for the `plans` table.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::PlanRow;

/// Insert a new plan row. The id is chosen by the caller.
pub async fn insert_plan<'e>(executor: impl PgExecutor<'e>, id: &str, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO plans (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(executor)
        .await
        .with_context(|| format!("failed to insert plan {id:?}"))?;

    Ok(())
}

/// Fetch a plan by its ID.
pub async fn get_plan<'e>(executor: impl PgExecutor<'e>, id: &str) -> Result<Option<PlanRow>> {
    let plan = sqlx::query_as::<_, PlanRow>("SELECT id, name FROM plans WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch plan")?;

    Ok(plan)
}
