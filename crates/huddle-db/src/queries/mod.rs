//! Query functions, one module per table group.
//!
//! Every function takes an [`sqlx::PgExecutor`] so the same query can run
//! against the pool or inside an open transaction (`&mut *tx`).

pub mod options;
pub mod plans;
pub mod responses;
