//! Database configuration module.
//!
//! The dashboard keeps its data in an in-memory `SQLite` database driven by `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Nothing survives a restart: the store is
//! seeded with demo data by [`crate::core::seed`] every time the process starts.

use crate::entities::{
    Account, AuditLog, Budget, BudgetApproval, BudgetItem, BudgetTransfer, Report, Session,
    Setting, SystemUser,
};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default connection string: a private in-memory database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back to
/// [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Idle timeout and lifetime of the pooled connection: ten years.
pub const CONNECTION_KEEP_ALIVE: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Pool options for the store.
///
/// An in-memory database lives only as long as its connection, so the pool holds exactly
/// one connection and never retires it for being idle or old.
#[must_use]
pub fn connect_options(database_url: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(CONNECTION_KEEP_ALIVE)
        .max_lifetime(CONNECTION_KEEP_ALIVE);
    options
}

/// Connects to the configured database and creates every table.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {}", database_url);
    let db = Database::connect(connect_options(database_url)).await?;
    create_tables(&db).await?;
    info!("Database ready.");
    Ok(db)
}

/// Creates all tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children so foreign keys resolve
    let statements = [
        schema.create_table_from_entity(Budget),
        schema.create_table_from_entity(BudgetItem),
        schema.create_table_from_entity(BudgetApproval),
        schema.create_table_from_entity(BudgetTransfer),
        schema.create_table_from_entity(Account),
        schema.create_table_from_entity(Session),
        schema.create_table_from_entity(SystemUser),
        schema.create_table_from_entity(AuditLog),
        schema.create_table_from_entity(Setting),
        schema.create_table_from_entity(Report),
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }

    Ok(())
}
