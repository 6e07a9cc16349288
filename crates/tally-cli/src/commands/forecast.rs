//! Forecast command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tally_core::{Clock, Database, ForecastConfig, ForecastEngine, ForecastResult};

pub fn cmd_forecast(
    db: &Database,
    clock: &dyn Clock,
    config: &ForecastConfig,
    user: &str,
    month: Option<&str>,
    json: bool,
) -> Result<ForecastResult> {
    let result = ForecastEngine::new(db, clock)
        .with_config(config.clone())
        .forecast(user, month)
        .context("Failed to compute forecast")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result);
    }

    let c = &result.components;
    println!("📈 Expense forecast for {} ({})", result.month, user);
    println!();
    println!("   Forecast:        {:.2}", result.forecast_expense);
    println!("   Model:           {}", result.model_used);
    if let Some(model) = &result.model_coefficients {
        println!(
            "   Coefficients:    β0={} β1={} β2={}",
            model.intercept, model.coef_income, model.coef_prev_expense
        );
    }
    match result.latest_data_month {
        Some(latest) => println!("   Latest data:     {}", latest),
        None => println!("   Latest data:     none"),
    }
    if result.defaulted_to_next_month {
        println!("   (month chosen automatically: the month after your latest data)");
    }
    println!();
    let window = config.recency_window;
    println!(
        "   {:<22}{:.2}",
        format!("Avg expense (last {}):", window),
        c.avg_expense_last3
    );
    println!(
        "   {:<22}{:.2}",
        format!("Avg income (last {}):", window),
        c.avg_income_last3
    );
    println!(
        "   {:<22}{:.2} spent, {:.2} earned ({} of {} days)",
        "Month to date:",
        c.expense_month_to_date,
        c.income_month_to_date,
        c.days_passed,
        c.total_days
    );

    Ok(result)
}

/// Write `forecast_<month>.txt` into `output_dir`
pub fn cmd_report(
    db: &Database,
    clock: &dyn Clock,
    config: &ForecastConfig,
    user: &str,
    month: Option<&str>,
    output_dir: &Path,
) -> Result<PathBuf> {
    let report = ForecastEngine::new(db, clock)
        .with_config(config.clone())
        .report(user, month)
        .context("Failed to compute forecast")?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let path = output_dir.join(&report.filename);
    std::fs::write(&path, &report.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("📄 Report written to {}", path.display());

    Ok(path)
}
