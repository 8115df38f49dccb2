//! Seed the database with historical orders.
//!
//! The input is a JSON array of orders, each naming its customer and items:
//!
//! ```json
//! [
//!   {
//!     "name": "Ada", "phone": "5550000001", "notes": "window seat",
//!     "timestamp": 1700000000,
//!     "items": [{"name": "Tea", "price": 2.0}]
//!   }
//! ]
//! ```

use std::path::Path;

use tracing::info;

use order_desk_server::db::{self, seed::SeedOrder};

/// Import orders from a JSON file in a single transaction.
///
/// The schema is created first if needed.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any database
/// operation fails (in which case nothing is written).
pub async fn run(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading orders from file");

    // Parse before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let records: Vec<SeedOrder> = serde_json::from_str(&content)?;

    info!(orders = records.len(), "Parsed seed file");

    let pool = super::connect().await?;
    db::init_schema(&pool).await?;

    let summary = db::seed::seed(&pool, &records).await?;

    info!("Seeding complete!");
    info!("  Customers inserted: {}", summary.customers);
    info!("  Items inserted: {}", summary.items);
    info!("  Orders inserted: {}", summary.orders);
    info!("  Order lines inserted: {}", summary.lines);

    Ok(())
}
