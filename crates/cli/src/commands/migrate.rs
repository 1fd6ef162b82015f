//! Session store migration.
//!
//! # Usage
//!
//! ```bash
//! shopeasy-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for the
//!   session store (falls back to `DATABASE_URL`)
//!
//! The storefront never migrates on startup. Sessions are the only rows it
//! keeps, so this creates the `tower_sessions` schema and table.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Neither database variable is set.
    #[error("Missing environment variable: STOREFRONT_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

fn database_url() -> Result<SecretString, MigrationError> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(SecretString::from)
        .ok_or(MigrationError::MissingDatabaseUrl)
}

/// Create the session table if it does not exist.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the migration fails.
pub async fn sessions() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();
    let database_url = database_url()?;

    tracing::info!("Connecting to session database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Session table ready");
    Ok(())
}
