//! Domain models for Tally

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the ledger a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Expense,
    Income,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" | "incomes" => Ok(Self::Income),
            _ => Err(format!("Unknown record kind: {}", s)),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dated expense or income amount belonging to one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: i64,
    pub user_id: String,
    pub kind: RecordKind,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub note: Option<String>,
}

/// A record to be inserted
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub user_id: String,
    pub kind: RecordKind,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub note: Option<String>,
}

impl NewRecord {
    pub fn expense(user_id: &str, date: DateTime<Utc>, amount: f64) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: RecordKind::Expense,
            date,
            amount,
            note: None,
        }
    }

    pub fn income(user_id: &str, date: DateTime<Utc>, amount: f64) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: RecordKind::Income,
            date,
            amount,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Inclusive range of UTC instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Both ends are inclusive
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.from && ts <= self.to
    }
}
