//! Table dump command.

use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use order_desk_server::db::{self, CustomerRepository, ItemRepository, orders};

/// Tables that can be dumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpTable {
    Customers,
    Items,
    Orders,
    OrderLines,
}

/// Log every row of a table as one JSON object per line.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the query fails.
pub async fn run(table: DumpTable) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    db::init_schema(&pool).await?;

    match table {
        DumpTable::Customers => log_rows(&CustomerRepository::new(&pool).list().await?)?,
        DumpTable::Items => log_rows(&ItemRepository::new(&pool).list().await?)?,
        DumpTable::Orders => log_rows(&orders::list_orders(&pool).await?)?,
        DumpTable::OrderLines => log_rows(&orders::list_lines(&pool).await?)?,
    }
    Ok(())
}

fn log_rows<T: Serialize>(rows: &[T]) -> Result<(), serde_json::Error> {
    for row in rows {
        info!("{}", serde_json::to_string(row)?);
    }
    info!(rows = rows.len(), "Dump complete");
    Ok(())
}
