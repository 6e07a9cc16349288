//! Plain-text forecast report

use super::types::ForecastResult;

/// A rendered report ready to be delivered as a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastReport {
    /// `forecast_<month>.txt`
    pub filename: String,
    pub content: String,
}

impl ForecastReport {
    pub fn from_result(result: &ForecastResult, recency_window: usize) -> Self {
        Self {
            filename: result.report_filename(),
            content: render_report(result, recency_window),
        }
    }
}

/// Render the forecast as labeled lines.
///
/// Numbers are printed from the already-rounded payload, so every value in
/// the text matches the JSON form exactly. `recency_window` only labels the
/// averages.
pub fn render_report(result: &ForecastResult, recency_window: usize) -> String {
    let c = &result.components;
    let mut out = String::from("Expense Forecast Report\n");

    out.push_str(&format!("Month: {}\n", result.month));
    out.push_str(&format!("Model Used: {}\n", result.model_used));
    if let Some(m) = &result.model_coefficients {
        out.push_str(&format!(
            "Coefficients: β0={}, β1(income)={}, β2(prevExpense)={}\n",
            m.intercept, m.coef_income, m.coef_prev_expense
        ));
    }
    let latest = result
        .latest_data_month
        .map(|m| m.to_string())
        .unwrap_or_else(|| "none".to_string());
    out.push_str(&format!("Latest Data Month: {}\n", latest));
    let defaulted = if result.defaulted_to_next_month {
        "yes"
    } else {
        "no"
    };
    out.push_str(&format!("Defaulted To Next Month: {}\n\n", defaulted));

    out.push_str("Components:\n");
    out.push_str(&format!(
        "  Avg Expense (last {}): {}\n",
        recency_window, c.avg_expense_last3
    ));
    out.push_str(&format!(
        "  Avg Income (last {}): {}\n",
        recency_window, c.avg_income_last3
    ));
    out.push_str(&format!(
        "  Income Month-To-Date: {}\n",
        c.income_month_to_date
    ));
    out.push_str(&format!(
        "  Expense Month-To-Date: {}\n",
        c.expense_month_to_date
    ));
    out.push_str(&format!("  Income Adjustment: {}\n", c.income_adjustment));
    out.push_str(&format!("  Preliminary: {}\n", c.preliminary));
    out.push_str(&format!("  To-Date Projection: {}\n", c.to_date_projection));
    out.push_str(&format!(
        "  Days Passed / Total: {} / {}\n\n",
        c.days_passed, c.total_days
    ));

    out.push_str("History (month, income, expense):\n");
    for entry in &result.history {
        out.push_str(&format!(
            "  {}, {}, {}\n",
            entry.month, entry.income, entry.expense
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "Final Forecasted Expense: {}",
        result.forecast_expense
    ));

    out
}
