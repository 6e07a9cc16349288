//! Ledger record operations

use rusqlite::types::Type;
use rusqlite::{params, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{DateRange, LedgerRecord, NewRecord, RecordKind};
use crate::source::LedgerSource;

const RECORD_COLUMNS: &str = "id, user_id, kind, date, amount, note";

fn row_to_record(row: &Row) -> rusqlite::Result<LedgerRecord> {
    let kind: String = row.get(2)?;
    let kind = kind
        .parse::<RecordKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;
    let date: String = row.get(3)?;
    let date = parse_datetime(&date)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(LedgerRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind,
        date,
        amount: row.get(4)?,
        note: row.get(5)?,
    })
}

impl Database {
    /// Insert a ledger record, returning the new id
    pub fn insert_record(&self, record: &NewRecord) -> Result<i64> {
        if record.user_id.trim().is_empty() {
            return Err(Error::InvalidData("user id must not be empty".to_string()));
        }
        if !record.amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "amount must be a finite number, got {}",
                record.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO ledger_records (user_id, kind, date, amount, note) VALUES (?, ?, ?, ?, ?)",
            params![
                record.user_id,
                record.kind.as_str(),
                format_datetime(record.date),
                record.amount,
                record.note,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Most recent records of one kind for a user, newest first
    pub fn list_records(
        &self,
        user_id: &str,
        kind: RecordKind,
        limit: i64,
    ) -> Result<Vec<LedgerRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM ledger_records WHERE user_id = ? AND kind = ? ORDER BY date DESC, id DESC LIMIT ?",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![user_id, kind.as_str(), limit], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Delete a record of the given kind by id
    pub fn delete_record(&self, kind: RecordKind, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM ledger_records WHERE id = ? AND kind = ?",
            params![id, kind.as_str()],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("{} record {}", kind, id)));
        }
        Ok(())
    }

    /// Record counts for a user as (expenses, incomes)
    pub fn count_records(&self, user_id: &str) -> Result<(i64, i64)> {
        let conn = self.conn()?;
        let counts = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN kind = 'income' THEN 1 ELSE 0 END), 0)
            FROM ledger_records
            WHERE user_id = ?
            "#,
            params![user_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }
}

impl LedgerSource for Database {
    fn records(
        &self,
        user_id: &str,
        kind: RecordKind,
        range: Option<DateRange>,
    ) -> Result<Vec<LedgerRecord>> {
        let conn = self.conn()?;
        let (from, to) = match range {
            Some(range) => (
                Some(format_datetime(range.from)),
                Some(format_datetime(range.to)),
            ),
            None => (None, None),
        };

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM ledger_records
            WHERE user_id = ?1
              AND kind = ?2
              AND (?3 IS NULL OR date >= ?3)
              AND (?4 IS NULL OR date <= ?4)
            ORDER BY date, id
            "#,
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![user_id, kind.as_str(), from, to], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }
}
