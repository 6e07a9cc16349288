//! Expense and income record commands

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tally_core::{Database, NewRecord, RecordKind};

/// Parse a `YYYY-MM-DD` date as midnight UTC, or use the current time
pub fn parse_record_date(date: Option<&str>) -> Result<DateTime<Utc>> {
    match date {
        Some(s) => {
            let day = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))?;
            let midnight = day
                .and_hms_opt(0, 0, 0)
                .context("Invalid time of day")?;
            Ok(midnight.and_utc())
        }
        None => Ok(Utc::now()),
    }
}

pub fn cmd_record_add(
    db: &Database,
    kind: RecordKind,
    user: &str,
    amount: f64,
    date: Option<&str>,
    note: Option<&str>,
) -> Result<i64> {
    let date = parse_record_date(date)?;
    let record = NewRecord {
        user_id: user.to_string(),
        kind,
        date,
        amount,
        note: note.map(String::from),
    };

    let id = db
        .insert_record(&record)
        .with_context(|| format!("Failed to add {}", kind))?;

    println!(
        "✅ Added {} #{}: {:.2} on {} for {}",
        kind,
        id,
        amount,
        date.format("%Y-%m-%d"),
        user
    );

    Ok(id)
}

pub fn cmd_record_list(db: &Database, kind: RecordKind, user: &str, limit: i64) -> Result<()> {
    let records = db.list_records(user, kind, limit)?;

    if records.is_empty() {
        println!("No {} records for {}.", kind, user);
        return Ok(());
    }

    println!("📒 Recent {} records for {} ({})", kind, user, records.len());
    println!();
    println!("{:>6}  {:10}  {:>12}  Note", "ID", "Date", "Amount");
    println!("{}", "-".repeat(50));
    for record in &records {
        println!(
            "{:>6}  {:10}  {:>12.2}  {}",
            record.id,
            record.date.format("%Y-%m-%d"),
            record.amount,
            record.note.as_deref().unwrap_or("")
        );
    }

    let (expenses, incomes) = db.count_records(user)?;
    println!();
    println!("{} expense and {} income records on file", expenses, incomes);

    Ok(())
}

pub fn cmd_record_delete(db: &Database, kind: RecordKind, id: i64) -> Result<()> {
    db.delete_record(kind, id)
        .with_context(|| format!("Failed to delete {} #{}", kind, id))?;
    println!("🗑️  Deleted {} #{}", kind, id);
    Ok(())
}
