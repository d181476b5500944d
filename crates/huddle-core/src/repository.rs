//! PostgreSQL-backed [`PlanStore`].
//!
//! Writes run inside a single transaction each: plan plus options, or
//! response plus choices. A transaction that is dropped without commit rolls
//! back, so every early return leaves the store untouched. Reads are plain
//! queries against the pool and degrade row by row.

use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use huddle_db::config::DbConfig;
use huddle_db::models::Choice;
use huddle_db::pool;
use huddle_db::queries::{options as option_db, plans as plan_db, responses as response_db};
use huddle_db::time_key;

use crate::error::RepoError;
use crate::plan::{NewPlan, ParticipantResponse, Plan, PlanOption};
use crate::report::{ReadReport, SkippedRow};
use crate::store::PlanStore;

/// Plan storage over a connection pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    /// Connect to the configured database and make sure the schema exists.
    pub async fn open(config: &DbConfig) -> Result<Self, RepoError> {
        let pool = pool::connect_and_prepare(config).await?;
        info!(max_connections = config.max_connections, "plan repository opened");
        Ok(Self { pool })
    }

    /// Wrap an existing pool. The schema is assumed to exist.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(self) {
        self.pool.close().await;
        debug!("plan repository closed");
    }

    async fn read_options(&self, plan_id: &str, skipped: &mut Vec<SkippedRow>) -> Vec<PlanOption> {
        let rows = match option_db::list_options_for_plan(&self.pool, plan_id).await {
            Ok(rows) => rows,
            Err(err) => {
                skip(
                    plan_id,
                    skipped,
                    SkippedRow::OptionList {
                        reason: format!("{err:#}"),
                    },
                );
                return Vec::new();
            }
        };

        let mut options = Vec::with_capacity(rows.len());
        for row in rows {
            match time_key::decode(&row.option_time) {
                Ok(time) => options.push(PlanOption {
                    key: row.option_time,
                    time,
                }),
                Err(err) => skip(
                    plan_id,
                    skipped,
                    SkippedRow::OptionKey {
                        option_id: row.id,
                        raw: row.option_time,
                        reason: err.to_string(),
                    },
                ),
            }
        }
        options
    }

    async fn read_responses(
        &self,
        plan_id: &str,
        skipped: &mut Vec<SkippedRow>,
    ) -> Vec<ParticipantResponse> {
        let rows = match response_db::list_responses_for_plan(&self.pool, plan_id).await {
            Ok(rows) => rows,
            Err(err) => {
                skip(
                    plan_id,
                    skipped,
                    SkippedRow::ResponseList {
                        reason: format!("{err:#}"),
                    },
                );
                return Vec::new();
            }
        };

        let mut responses = Vec::with_capacity(rows.len());
        for row in rows {
            // One query per response; plans collect few responses.
            let choice_rows = match response_db::list_choices_for_response(&self.pool, row.id).await
            {
                Ok(choice_rows) => choice_rows,
                Err(err) => {
                    skip(
                        plan_id,
                        skipped,
                        SkippedRow::ResponseChoices {
                            response_id: row.id,
                            reason: format!("{err:#}"),
                        },
                    );
                    continue;
                }
            };

            let mut choices = BTreeMap::new();
            for choice_row in choice_rows {
                match choice_row.choice.parse::<Choice>() {
                    Ok(choice) => {
                        choices.insert(choice_row.option_time, choice);
                    }
                    Err(_) => skip(
                        plan_id,
                        skipped,
                        SkippedRow::ChoiceValue {
                            response_id: row.id,
                            option_key: choice_row.option_time,
                            raw: choice_row.choice,
                        },
                    ),
                }
            }

            responses.push(ParticipantResponse {
                id: row.id,
                name: row.name,
                choices,
            });
        }
        responses
    }
}

/// Record a skipped row and log it.
fn skip(plan_id: &str, skipped: &mut Vec<SkippedRow>, row: SkippedRow) {
    warn!(plan_id = %plan_id, "{row}");
    skipped.push(row);
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}

#[async_trait]
impl PlanStore for PlanRepository {
    async fn create_plan(&self, plan: &NewPlan) -> Result<(), RepoError> {
        let keys = plan
            .options
            .iter()
            .map(time_key::encode)
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        plan_db::insert_plan(&mut *tx, &plan.id, &plan.name).await?;

        for key in &keys {
            if let Err(err) = option_db::insert_option(&mut *tx, &plan.id, key).await {
                if is_unique_violation(&err) {
                    return Err(RepoError::DuplicateOption {
                        plan_id: plan.id.clone(),
                        time_key: key.clone(),
                    });
                }
                return Err(err.into());
            }
        }

        tx.commit().await.context("failed to commit plan")?;

        info!(plan_id = %plan.id, options = keys.len(), "plan created");
        Ok(())
    }

    async fn get_plan(&self, id: &str) -> Result<Option<ReadReport<Plan>>, RepoError> {
        let Some(row) = plan_db::get_plan(&self.pool, id).await? else {
            debug!(plan_id = %id, "plan not found");
            return Ok(None);
        };

        let mut skipped = Vec::new();
        let options = self.read_options(id, &mut skipped).await;
        let responses = self.read_responses(id, &mut skipped).await;

        let plan = Plan {
            id: row.id,
            name: row.name,
            options,
            responses,
        };
        Ok(Some(ReadReport::new(plan, skipped)))
    }

    async fn get_plan_options(&self, id: &str) -> ReadReport<Vec<NaiveDateTime>> {
        let mut skipped = Vec::new();
        let times = self
            .read_options(id, &mut skipped)
            .await
            .into_iter()
            .map(|o| o.time)
            .collect();
        ReadReport::new(times, skipped)
    }

    async fn add_response(
        &self,
        plan_id: &str,
        name: &str,
        choices: &BTreeMap<String, Choice>,
    ) -> Result<i64, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        let response_id = response_db::insert_response(&mut *tx, plan_id, name).await?;

        for (key, choice) in choices {
            let Some(option_id) = option_db::find_option_id(&mut *tx, plan_id, key).await? else {
                warn!(plan_id = %plan_id, option = %key, "response names unknown option");
                return Err(RepoError::UnknownOption {
                    plan_id: plan_id.to_owned(),
                    time_key: key.clone(),
                });
            };
            response_db::insert_choice(&mut *tx, response_id, option_id, *choice).await?;
        }

        tx.commit().await.context("failed to commit response")?;

        info!(
            plan_id = %plan_id,
            response_id,
            choices = choices.len(),
            "response recorded"
        );
        Ok(response_id)
    }
}
