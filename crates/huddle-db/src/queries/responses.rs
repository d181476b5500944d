//! Database query functions for the `responses` and `response_choices`
//! tables.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::{Choice, ChoiceRow, ResponseRow};

/// Insert a response row and return its generated id.
pub async fn insert_response<'e>(
    executor: impl PgExecutor<'e>,
    plan_id: &str,
    name: &str,
) -> Result<i64> {
    let id: i64 =
        sqlx::query_scalar("INSERT INTO responses (plan_id, name) VALUES ($1, $2) RETURNING id")
            .bind(plan_id)
            .bind(name)
            .fetch_one(executor)
            .await
            .with_context(|| format!("failed to insert response for plan {plan_id:?}"))?;

    Ok(id)
}

/// Record one choice of a response.
pub async fn insert_choice<'e>(
    executor: impl PgExecutor<'e>,
    response_id: i64,
    option_id: i64,
    choice: Choice,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO response_choices (response_id, option_id, choice) VALUES ($1, $2, $3)",
    )
    .bind(response_id)
    .bind(option_id)
    .bind(choice)
    .execute(executor)
    .await
    .with_context(|| format!("failed to insert choice for response {response_id}"))?;

    Ok(())
}

/// List the responses of a plan in submission order.
pub async fn list_responses_for_plan<'e>(
    executor: impl PgExecutor<'e>,
    plan_id: &str,
) -> Result<Vec<ResponseRow>> {
    let rows = sqlx::query_as::<_, ResponseRow>(
        "SELECT id, plan_id, name FROM responses WHERE plan_id = $1 ORDER BY id",
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await
    .context("failed to list responses for plan")?;

    Ok(rows)
}

/// List one response's choices, keyed by the option's stored time key.
pub async fn list_choices_for_response<'e>(
    executor: impl PgExecutor<'e>,
    response_id: i64,
) -> Result<Vec<ChoiceRow>> {
    let rows = sqlx::query_as::<_, ChoiceRow>(
        "SELECT o.option_time, rc.choice \
         FROM response_choices rc \
         JOIN options o ON rc.option_id = o.id \
         WHERE rc.response_id = $1 \
         ORDER BY o.id",
    )
    .bind(response_id)
    .fetch_all(executor)
    .await
    .with_context(|| format!("failed to list choices for response {response_id}"))?;

    Ok(rows)
}
