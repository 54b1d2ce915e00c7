//! Tradebook - Binary Entry Point
//!
//! Loads an optional book snapshot, runs one desk operation against it and
//! prints the outcome as JSON. Input files are only read, never written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use tradebook::logging::{init_logging, LogFormat};
use tradebook::{DeskConfig, OrderBook, OrderDesk, OrderTicket};

#[derive(Parser, Debug)]
#[command(name = "tradebook")]
#[command(about = "Price-time priority matching against a JSON order book")]
#[command(version)]
struct Cli {
    /// Book snapshot to start from (JSON array of orders)
    #[arg(long, env = "TRADEBOOK_BOOK")]
    book: Option<PathBuf>,

    /// Desk configuration (YAML)
    #[arg(long, env = "TRADEBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format: pretty, compact or json
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit an order and print it with the resulting book fingerprint
    Submit {
        #[arg(long)]
        symbol: String,

        /// buy or sell
        #[arg(long)]
        side: String,

        #[arg(long)]
        quantity: String,

        /// Limit price, at most two decimal places
        #[arg(long)]
        price: String,
    },

    /// Print every order in the book
    List,

    /// Print one order
    Get {
        id: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let config = match &cli.config {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };
    let book = match &cli.book {
        Some(path) => load_book(path)?,
        None => OrderBook::new(),
    };
    info!(orders = book.len(), fingerprint = %book.fingerprint(), "book loaded");

    let mut desk = OrderDesk::with_book(&config, book);

    let output = match cli.command {
        Commands::Submit {
            symbol,
            side,
            quantity,
            price,
        } => {
            let ticket = OrderTicket::new(symbol, side, quantity, price);
            let created = desk.submit_order(&ticket, Utc::now())?;
            json!({
                "order": created,
                "fingerprint": desk.book().fingerprint(),
            })
        }
        Commands::List => json!({
            "orders": desk.list_orders(),
            "fingerprint": desk.book().fingerprint(),
        }),
        Commands::Get { id } => json!({ "order": desk.get_order(id)? }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_book(path: &Path) -> Result<OrderBook> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read book {}", path.display()))?;
    OrderBook::from_json(&json).with_context(|| format!("invalid book {}", path.display()))
}
