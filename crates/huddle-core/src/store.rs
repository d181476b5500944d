//! The storage contract used by request handlers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::RepoError;
use crate::plan::{NewPlan, Plan};
use crate::report::ReadReport;
use huddle_db::models::Choice;

/// Create and read plans, and record participant responses.
///
/// Implementations are append-only: nothing is updated or deleted once
/// written. Object safe, so handlers can hold an `Arc<dyn PlanStore>`.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Store a plan and all its options atomically.
    ///
    /// The id must be new; the store does not generate ids. Options keep the
    /// given order. Callers are expected to run [`NewPlan::validate`] first;
    /// an empty option list still commits the bare plan.
    async fn create_plan(&self, plan: &NewPlan) -> Result<(), RepoError>;

    /// Load a plan with its options and responses.
    ///
    /// `Ok(None)` means no such plan. Only a failure to read the plan row
    /// itself is an error; problems with options or responses are reported
    /// in [`ReadReport::skipped`].
    async fn get_plan(&self, id: &str) -> Result<Option<ReadReport<Plan>>, RepoError>;

    /// Option times of a plan in creation order. Empty when the plan does
    /// not exist.
    async fn get_plan_options(&self, id: &str) -> ReadReport<Vec<NaiveDateTime>>;

    /// Record one participant's choices atomically and return the new
    /// response id.
    ///
    /// Keys must be exact time keys of the plan's options. Any unknown key
    /// rejects the whole response with [`RepoError::UnknownOption`].
    async fn add_response(
        &self,
        plan_id: &str,
        name: &str,
        choices: &BTreeMap<String, Choice>,
    ) -> Result<i64, RepoError>;
}
