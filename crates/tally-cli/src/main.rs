//! Tally CLI - Expense tracker and forecaster
//!
//! Usage:
//!   tally init                                  Initialize database
//!   tally expense add --user U --amount 12.5    Record an expense
//!   tally forecast --user U                     Forecast next month's spending
//!   tally report --user U --month 2024-06       Write a text report
//!   tally serve --port 3000                     Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tally_core::{RecordKind, SystemClock};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Expense { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            run_record_action(&db, RecordKind::Expense, action)
        }
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            run_record_action(&db, RecordKind::Income, action)
        }
        Commands::Forecast { user, month, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let config = commands::load_forecast_config(cli.config.as_deref())?;
            commands::cmd_forecast(&db, &SystemClock, &config, &user, month.as_deref(), json)
                .map(|_| ())
        }
        Commands::Report {
            user,
            month,
            output,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let config = commands::load_forecast_config(cli.config.as_deref())?;
            commands::cmd_report(&db, &SystemClock, &config, &user, month.as_deref(), &output)
                .map(|_| ())
        }
        Commands::Serve { port, host } => {
            let config = commands::load_forecast_config(cli.config.as_deref())?;
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt, config).await
        }
    }
}

fn run_record_action(
    db: &tally_core::Database,
    kind: RecordKind,
    action: RecordAction,
) -> Result<()> {
    match action {
        RecordAction::Add {
            user,
            amount,
            date,
            note,
        } => commands::cmd_record_add(db, kind, &user, amount, date.as_deref(), note.as_deref())
            .map(|_| ()),
        RecordAction::List { user, limit } => commands::cmd_record_list(db, kind, &user, limit),
        RecordAction::Delete { id } => commands::cmd_record_delete(db, kind, id),
    }
}
