//! Plan persistence and availability aggregation.
//!
//! [`PlanRepository`] implements the [`PlanStore`] contract on top of
//! PostgreSQL. Reads return a [`ReadReport`] so rows skipped while loading
//! stay visible to the caller. [`aggregate`] turns a loaded [`Plan`] into the
//! participant-by-option availability table.

pub mod aggregate;
pub mod error;
pub mod plan;
pub mod report;
pub mod repository;
pub mod store;

pub use aggregate::{
    AvailabilityColumn, AvailabilityRow, AvailabilityTable, count_choice, count_yes,
};
pub use error::RepoError;
pub use huddle_db::models::Choice;
pub use plan::{NewPlan, ParticipantResponse, Plan, PlanOption, PlanValidationError};
pub use report::{ReadReport, SkippedRow};
pub use repository::PlanRepository;
pub use store::PlanStore;
