//! Ledger data sources
//!
//! The forecaster reads records through [`LedgerSource`] so it does not care
//! whether they come from SQLite or from memory.

use crate::error::Result;
use crate::models::{DateRange, LedgerRecord, NewRecord, RecordKind};

pub trait LedgerSource {
    /// All records of one kind for a user, optionally limited to an inclusive range
    fn records(
        &self,
        user_id: &str,
        kind: RecordKind,
        range: Option<DateRange>,
    ) -> Result<Vec<LedgerRecord>>;

    fn expense_records(&self, user_id: &str, range: Option<DateRange>) -> Result<Vec<LedgerRecord>> {
        self.records(user_id, RecordKind::Expense, range)
    }

    fn income_records(&self, user_id: &str, range: Option<DateRange>) -> Result<Vec<LedgerRecord>> {
        self.records(user_id, RecordKind::Income, range)
    }
}

impl<T: LedgerSource + ?Sized> LedgerSource for &T {
    fn records(
        &self,
        user_id: &str,
        kind: RecordKind,
        range: Option<DateRange>,
    ) -> Result<Vec<LedgerRecord>> {
        (**self).records(user_id, kind, range)
    }
}

/// Vec-backed source for tests and for callers that already hold their records
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    records: Vec<LedgerRecord>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, returning its assigned id
    pub fn push(&mut self, record: NewRecord) -> i64 {
        let id = self.records.len() as i64 + 1;
        self.records.push(LedgerRecord {
            id,
            user_id: record.user_id,
            kind: record.kind,
            date: record.date,
            amount: record.amount,
            note: record.note,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<NewRecord> for InMemoryLedger {
    fn from_iter<I: IntoIterator<Item = NewRecord>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for record in iter {
            ledger.push(record);
        }
        ledger
    }
}

impl LedgerSource for InMemoryLedger {
    fn records(
        &self,
        user_id: &str,
        kind: RecordKind,
        range: Option<DateRange>,
    ) -> Result<Vec<LedgerRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.user_id == user_id && r.kind == kind)
            .filter(|r| range.map_or(true, |range| range.contains(r.date)))
            .cloned()
            .collect())
    }
}
