//! Expense Forecasting
//!
//! Predicts a user's total spending for a calendar month from their expense
//! and income history.
//!
//! ## Pipeline
//!
//! - **Aggregation** - records are summed into UTC month totals
//! - **Regression** - `expense ~ income + previous month's expense`, fitted by
//!   ordinary least squares once there are at least four month pairs
//! - **Engine** - month selection, month-to-date projection, and blending of
//!   the heuristic and regression estimates
//! - **Report** - the same result as plain text for download
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::forecast::ForecastEngine;
//! use tally_core::SystemClock;
//!
//! let engine = ForecastEngine::new(&db, &SystemClock);
//! let result = engine.forecast("alice", Some("2024-06"))?;
//! println!("{}", result.forecast_expense);
//! ```

pub mod aggregate;
pub mod engine;
pub mod month;
pub mod regression;
pub mod report;
pub mod types;

pub use aggregate::{aggregate_monthly, sum_amounts, MonthlyTotal, MonthlyTotals};
pub use engine::{compute_forecast, ForecastEngine};
pub use month::MonthKey;
pub use regression::{build_samples, fit_ols, RegressionModel, TrainingSample};
pub use report::{render_report, ForecastReport};
pub use types::{ForecastComponents, ForecastResult, HistoryEntry, ModelUsed};

/// Round to `digits` decimals the way a decimal printer would.
///
/// The exact decimal expansion of the double is rounded, so `1.045` (stored
/// as 1.04499999...) becomes `1.04`. Exact halfway values such as `0.125`
/// round away from zero. Never returns negative zero.
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let digits = digits.max(0);

    let rounded = if is_exact_tie(value, digits) {
        let factor = 10_f64.powi(digits);
        // Exact: the scaled tie is n + 0.5 and representable
        let magnitude = (value.abs() * factor).floor() + 1.0;
        (magnitude / factor).copysign(value)
    } else {
        let formatted = format!("{:.*}", digits as usize, value);
        formatted.parse::<f64>().unwrap_or(value)
    };

    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Whether `value` sits exactly halfway between two `digits`-decimal numbers.
///
/// With `value = m * 2^e` that means `value * 2 * 10^digits` is an odd
/// integer, which holds iff `m` has exactly `-(e + 1 + digits)` trailing zero
/// bits.
fn is_exact_tie(value: f64, digits: i32) -> bool {
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1_u64 << 52) - 1);
    let (mantissa, exp) = if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1_u64 << 52), exponent - 1075)
    };
    if mantissa == 0 {
        return false;
    }
    let shift = -(exp + 1 + digits);
    shift >= 0 && mantissa.trailing_zeros() as i32 == shift
}
