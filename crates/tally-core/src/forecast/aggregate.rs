//! Calendar-month aggregation of ledger records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::month::MonthKey;
use crate::models::LedgerRecord;

/// Income and expense totals for one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub income: f64,
    pub expense: f64,
}

/// Month totals keyed (and therefore sorted) by month
pub type MonthlyTotals = BTreeMap<MonthKey, MonthlyTotal>;

/// Sum expense and income records into UTC calendar-month totals.
///
/// The two slices decide which field a record feeds; the record's own `kind`
/// is not consulted. Records are summed as given, duplicates included.
pub fn aggregate_monthly(expenses: &[LedgerRecord], incomes: &[LedgerRecord]) -> MonthlyTotals {
    let mut monthly = MonthlyTotals::new();

    for record in incomes {
        monthly
            .entry(MonthKey::from_datetime(record.date))
            .or_default()
            .income += record.amount;
    }
    for record in expenses {
        monthly
            .entry(MonthKey::from_datetime(record.date))
            .or_default()
            .expense += record.amount;
    }

    monthly
}

/// Plain sum of record amounts
pub fn sum_amounts(records: &[LedgerRecord]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}
