//! Storage layer for huddle: schema, connection pool, row models, and the
//! SQL query functions for plans, options, and responses.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
pub mod schema;
pub mod time_key;
