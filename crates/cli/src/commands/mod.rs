//! CLI command implementations.

pub mod dump;
pub mod init;
pub mod seed;

use sqlx::SqlitePool;

use order_desk_server::{config, db};

/// Connect to the configured database, creating the file if needed.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = config::get_database_url(&|key: &str| std::env::var(key).ok());
    tracing::info!(%database_url, "Connecting to database");

    let pool = db::create_pool(&database_url, 1).await?;
    Ok(pool)
}
