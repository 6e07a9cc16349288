//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, config loading)
//! - `forecast` - Forecast summary and text report commands
//! - `records` - Expense/income entry and listing
//! - `serve` - Web server command

pub mod core;
pub mod forecast;
pub mod records;
pub mod serve;

// Re-export command functions for main.rs
pub use core::*;
pub use forecast::*;
pub use records::*;
pub use serve::*;
