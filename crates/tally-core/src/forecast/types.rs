//! Forecast output payload

use serde::{Deserialize, Serialize};
use std::fmt;

use super::month::MonthKey;
use super::regression::RegressionModel;

/// Which branch produced the final number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelUsed {
    /// Average of the income-adjusted baseline and the month-to-date projection
    Heuristic,
    /// Regression estimate blended with the month-to-date projection
    OlsRegression,
}

impl ModelUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelUsed::Heuristic => "heuristic",
            ModelUsed::OlsRegression => "ols_regression",
        }
    }
}

impl fmt::Display for ModelUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intermediate values behind a forecast, already rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastComponents {
    pub avg_expense_last3: f64,
    pub avg_income_last3: f64,
    pub income_month_to_date: f64,
    pub expense_month_to_date: f64,
    /// Rounded to 4 decimals
    pub income_adjustment: f64,
    pub to_date_projection: f64,
    pub preliminary: f64,
    pub total_days: u32,
    pub days_passed: u32,
}

/// One history month in the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
}

/// Expense forecast for one user and one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub month: MonthKey,
    /// Never negative, rounded to 2 decimals
    pub forecast_expense: f64,
    pub model_used: ModelUsed,
    /// Present only when `model_used` is `ols_regression`, rounded to 6 decimals
    pub model_coefficients: Option<RegressionModel>,
    pub defaulted_to_next_month: bool,
    pub latest_data_month: Option<MonthKey>,
    pub components: ForecastComponents,
    /// Every month with data except the target, ascending
    pub history: Vec<HistoryEntry>,
}

impl ForecastResult {
    /// Filename for the downloadable text report
    pub fn report_filename(&self) -> String {
        format!("forecast_{}.txt", self.month)
    }
}
