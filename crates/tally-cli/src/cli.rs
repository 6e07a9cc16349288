//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track spending and forecast next month's expenses
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal expense tracker with monthly spending forecasts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Forecast tuning file (TOML)
    ///
    /// Defaults to the override in the data directory when present,
    /// otherwise the built-in settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record, list or delete expenses
    Expense {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Record, list or delete income
    Income {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Forecast total expenses for a month
    Forecast {
        /// User to forecast for
        #[arg(short, long)]
        user: String,

        /// Target month (YYYY-MM); defaults to the month after the latest data
        #[arg(short, long)]
        month: Option<String>,

        /// Print the full payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the forecast as a text report (forecast_<month>.txt)
    Report {
        /// User to forecast for
        #[arg(short, long)]
        user: String,

        /// Target month (YYYY-MM); defaults to the month after the latest data
        #[arg(short, long)]
        month: Option<String>,

        /// Directory to write the report into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Add a record
    Add {
        /// Owner of the record
        #[arg(short, long)]
        user: String,

        /// Amount
        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List recent records
    List {
        /// Owner of the records
        #[arg(short, long)]
        user: String,

        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Delete a record by id
    Delete {
        /// Record id (see `list`)
        id: i64,
    },
}
