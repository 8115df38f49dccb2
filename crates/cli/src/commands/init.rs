//! Schema bootstrap command.

use order_desk_server::db;

/// Create the database file and every table that does not exist yet.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a statement fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    db::init_schema(&pool).await?;

    tracing::info!("Database initialized");
    Ok(())
}
