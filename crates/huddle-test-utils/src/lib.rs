//! Shared test utilities for huddle integration tests.
//!
//! Provides a PostgreSQL instance shared across tests. Each test gets its
//! own database within the instance.
//!
//! Two modes:
//! - **`HUDDLE_TEST_PG_URL`** set: use that server directly, no container.
//! - **No env var** (`cargo test`): spin up a container via testcontainers,
//!   shared per binary through a `OnceCell`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use huddle_db::config::DbConfig;
use huddle_db::schema;

/// Shared server state: base URL and optional container handle (kept alive).
struct SharedPg {
    base_url: String,
    /// `None` when using an external URL.
    _container: Option<ContainerAsync<Postgres>>,
}

static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

async fn init_shared_pg() -> SharedPg {
    if let Ok(url) = std::env::var("HUDDLE_TEST_PG_URL") {
        return SharedPg {
            base_url: url.trim_end_matches('/').to_owned(),
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("17")
        .start()
        .await
        .expect("failed to start PostgreSQL container");

    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    SharedPg {
        base_url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

/// Base URL for the shared PostgreSQL (server root, no database name).
pub async fn pg_url() -> &'static str {
    let shared = SHARED_PG.get_or_init(init_shared_pg).await;
    &shared.base_url
}

async fn maintenance_pool() -> PgPool {
    let maint_url = format!("{}/postgres", pg_url().await);
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&maint_url)
        .await
        .expect("failed to connect to maintenance database")
}

/// Create an empty temporary database without applying the schema.
///
/// Returns a [`DbConfig`] pointing at it plus its name for [`drop_test_db`].
pub async fn create_empty_test_db() -> (DbConfig, String) {
    let maint_pool = maintenance_pool().await;

    let db_name = format!("huddle_test_{}", Uuid::new_v4().simple());
    let stmt = format!("CREATE DATABASE {db_name}");
    maint_pool
        .execute(stmt.as_str())
        .await
        .unwrap_or_else(|e| panic!("failed to create temp database {db_name}: {e}"));
    maint_pool.close().await;

    let config = DbConfig::new(format!("{}/{db_name}", pg_url().await));
    (config, db_name)
}

/// Create a temporary database with the schema applied.
///
/// Returns `(pool, db_name)`. Call [`drop_test_db`] with the returned
/// `db_name` when the test is done.
pub async fn create_test_db() -> (PgPool, String) {
    let (config, db_name) = create_empty_test_db().await;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database_url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to temp database {db_name}: {e}"));

    schema::ensure_schema(&pool)
        .await
        .expect("schema creation should succeed");

    (pool, db_name)
}

/// Drop a temporary database.
///
/// Terminates existing connections and drops the database. Safe to call
/// even if the database was already dropped.
pub async fn drop_test_db(db_name: &str) {
    let maint_pool = maintenance_pool().await;

    let terminate = format!(
        "SELECT pg_terminate_backend(pid) \
         FROM pg_stat_activity \
         WHERE datname = '{db_name}' AND pid <> pg_backend_pid()"
    );
    let _ = maint_pool.execute(terminate.as_str()).await;

    let stmt = format!("DROP DATABASE IF EXISTS {db_name}");
    let _ = maint_pool.execute(stmt.as_str()).await;
    maint_pool.close().await;
}
