//! Forecast orchestration
//!
//! Picks the target month, computes month-to-date actuals and the heuristic
//! projection, fits the regression when there is enough history, and blends
//! the two. Both the JSON and the text report are produced from the single
//! [`compute_forecast`] result.

use chrono::Datelike;
use tracing::{debug, info};

use super::aggregate::{aggregate_monthly, sum_amounts, MonthlyTotal};
use super::month::MonthKey;
use super::regression::{build_samples, fit_ols};
use super::report::ForecastReport;
use super::round_to;
use super::types::{ForecastComponents, ForecastResult, HistoryEntry, ModelUsed};
use crate::clock::Clock;
use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::source::LedgerSource;

/// Forecaster bound to a data source and a clock
pub struct ForecastEngine<'a> {
    source: &'a dyn LedgerSource,
    clock: &'a dyn Clock,
    config: ForecastConfig,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(source: &'a dyn LedgerSource, clock: &'a dyn Clock) -> Self {
        Self {
            source,
            clock,
            config: ForecastConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ForecastConfig) -> Self {
        self.config = config;
        self
    }

    /// Forecast for `month` (`YYYY-MM`), or for the month after the latest data
    pub fn forecast(&self, user_id: &str, month: Option<&str>) -> Result<ForecastResult> {
        compute_forecast(self.source, self.clock, &self.config, user_id, month)
    }

    /// Same forecast rendered as a downloadable text report
    pub fn report(&self, user_id: &str, month: Option<&str>) -> Result<ForecastReport> {
        let result = self.forecast(user_id, month)?;
        let report = ForecastReport::from_result(&result, self.config.recency_window);
        info!(user = user_id, filename = %report.filename, "Rendered forecast report");
        Ok(report)
    }
}

/// Compute the forecast payload for one user.
///
/// An explicit `month` is validated before any record is read. Too little
/// history or a singular regression system is not an error: the heuristic
/// forecast is returned and `model_used` says so.
pub fn compute_forecast(
    source: &dyn LedgerSource,
    clock: &dyn Clock,
    config: &ForecastConfig,
    user_id: &str,
    month: Option<&str>,
) -> Result<ForecastResult> {
    let requested = month.map(MonthKey::parse).transpose()?;

    let expenses = source.expense_records(user_id, None)?;
    let incomes = source.income_records(user_id, None)?;
    let monthly = aggregate_monthly(&expenses, &incomes);
    let latest_data_month = monthly.keys().next_back().copied();

    let now = clock.now();
    let current_month = MonthKey::from_datetime(now);

    let (target, defaulted) = match (requested, latest_data_month) {
        (Some(month), _) => (month, false),
        (None, Some(latest)) => {
            let next = latest
                .next()
                .ok_or_else(|| Error::InvalidData(format!("No month follows {}", latest)))?;
            (next, true)
        }
        (None, None) => (current_month, false),
    };

    let range = target.range();
    let expense_to_date = sum_amounts(&source.expense_records(user_id, Some(range))?);
    let income_to_date = sum_amounts(&source.income_records(user_id, Some(range))?);

    let history: Vec<(MonthKey, MonthlyTotal)> = monthly
        .iter()
        .filter(|(key, _)| **key != target)
        .map(|(key, total)| (*key, *total))
        .collect();

    let recent = &history[history.len().saturating_sub(config.recency_window)..];
    let avg_expense = mean(recent.iter().map(|(_, t)| t.expense));
    let avg_income = mean(recent.iter().map(|(_, t)| t.income));

    let total_days = target.days_in_month();
    let days_passed = if target == current_month {
        now.day().clamp(1, total_days)
    } else {
        total_days
    };

    let income_adjustment = if avg_income > 0.0 {
        income_to_date / avg_income
    } else {
        1.0
    };

    // An auto-selected month has no activity yet, so the to-date projection
    // mirrors the baseline instead of extrapolating zero.
    let (preliminary, to_date_projection) = if defaulted {
        (avg_expense, avg_expense)
    } else {
        let preliminary = if avg_expense > 0.0 {
            avg_expense * income_adjustment
        } else {
            expense_to_date
        };
        let projection = (expense_to_date / f64::from(days_passed)) * f64::from(total_days);
        (preliminary, projection)
    };

    let model = fit_ols(&build_samples(&history));

    let (model_used, forecast) = match model {
        Some(model) => {
            let prev_expense = history.last().map_or(avg_expense, |(_, t)| t.expense);
            let y_hat = model.predict(income_to_date, prev_expense);
            let alpha = if defaulted { 1.0 } else { config.blend_alpha };
            let blended = alpha * y_hat + (1.0 - alpha) * to_date_projection;
            debug!(?model, y_hat, alpha, blended, "Regression forecast");
            (ModelUsed::OlsRegression, blended)
        }
        None => (
            ModelUsed::Heuristic,
            (preliminary + to_date_projection) / 2.0,
        ),
    };

    let result = ForecastResult {
        month: target,
        forecast_expense: round_to(non_negative(forecast), 2),
        model_used,
        model_coefficients: model.map(|m| m.rounded()),
        defaulted_to_next_month: defaulted,
        latest_data_month,
        components: ForecastComponents {
            avg_expense_last3: round_to(avg_expense, 2),
            avg_income_last3: round_to(avg_income, 2),
            income_month_to_date: round_to(income_to_date, 2),
            expense_month_to_date: round_to(expense_to_date, 2),
            income_adjustment: round_to(income_adjustment, 4),
            to_date_projection: round_to(to_date_projection, 2),
            preliminary: round_to(preliminary, 2),
            total_days,
            days_passed,
        },
        history: history
            .iter()
            .map(|(key, total)| HistoryEntry {
                month: *key,
                income: round_to(total.income, 2),
                expense: round_to(total.expense, 2),
            })
            .collect(),
    };

    debug!(
        user = user_id,
        month = %result.month,
        model = %result.model_used,
        forecast = result.forecast_expense,
        history_months = result.history.len(),
        "Computed expense forecast"
    );

    Ok(result)
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

/// Clamp to zero; NaN also maps to zero
fn non_negative(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        0.0
    }
}
