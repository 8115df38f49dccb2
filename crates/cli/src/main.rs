//! Order desk CLI - database bootstrap and inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the database file and tables
//! order-desk init
//!
//! # Import historical orders from a JSON export
//! order-desk seed orders.json
//!
//! # Log every row of a table
//! order-desk dump customers
//! ```
//!
//! # Environment Variables
//!
//! - `ORDER_DESK_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, default: `sqlite://db.sqlite`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::dump::DumpTable;

#[derive(Parser)]
#[command(name = "order-desk")]
#[command(author, version, about = "Order desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database file and tables
    Init,
    /// Import historical orders from a JSON file
    Seed {
        /// Path to a JSON array of orders
        file: String,
    },
    /// Log every row of one table
    Dump {
        #[arg(value_enum)]
        table: DumpTable,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::Dump { table } => commands::dump::run(table).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dump_table() {
        let cli = Cli::try_parse_from(["order-desk", "dump", "order-lines"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Dump {
                table: DumpTable::OrderLines
            })
        ));
        assert!(Cli::try_parse_from(["order-desk", "dump", "users"]).is_err());
    }
}
