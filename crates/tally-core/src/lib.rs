//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Database access and migrations for ledger records
//! - Ledger source abstraction (SQLite or in-memory)
//! - Monthly expense forecasting (heuristic and OLS regression)
//! - Forecast tuning configuration
//! - Injectable clock for reproducible forecasts

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod forecast;
pub mod models;
pub mod source;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ForecastConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{
    ForecastComponents, ForecastEngine, ForecastReport, ForecastResult, HistoryEntry, ModelUsed,
    MonthKey, RegressionModel,
};
pub use models::{DateRange, LedgerRecord, NewRecord, RecordKind};
pub use source::{InMemoryLedger, LedgerSource};
