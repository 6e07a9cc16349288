//! Ordinary least squares with intercept over two predictors
//!
//! Model: `expense = b0 + b1 * income + b2 * prev_expense`
//!
//! The normal equations `(XᵀX) b = XᵀY` are accumulated by direct summation
//! and solved with an explicit adjugate/determinant inverse of the 3x3
//! matrix. A near-zero determinant means "no fit", which callers treat as a
//! normal outcome and fall back to the heuristic forecast.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregate::MonthlyTotal;
use super::month::MonthKey;
use super::round_to;

/// Fewer samples than this and no model is fitted
pub const MIN_SAMPLES: usize = 4;

/// Determinants with a smaller magnitude are treated as singular
pub const SINGULARITY_THRESHOLD: f64 = 1e-9;

type Matrix3 = [[f64; 3]; 3];

/// One month paired with the expense of the month before it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSample {
    pub income: f64,
    pub prev_expense: f64,
    pub expense: f64,
}

/// Fitted coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionModel {
    pub intercept: f64,
    pub coef_income: f64,
    pub coef_prev_expense: f64,
}

impl RegressionModel {
    pub fn predict(&self, income: f64, prev_expense: f64) -> f64 {
        self.intercept + self.coef_income * income + self.coef_prev_expense * prev_expense
    }

    /// Coefficients rounded to 6 decimals for display
    pub fn rounded(&self) -> Self {
        Self {
            intercept: round_to(self.intercept, 6),
            coef_income: round_to(self.coef_income, 6),
            coef_prev_expense: round_to(self.coef_prev_expense, 6),
        }
    }
}

/// Pair each history month with its predecessor by list position.
///
/// `history` must be sorted and must not contain the target month. Gaps in
/// the calendar are not filled: two months a year apart are still neighbours.
pub fn build_samples(history: &[(MonthKey, MonthlyTotal)]) -> Vec<TrainingSample> {
    history
        .windows(2)
        .map(|pair| TrainingSample {
            income: pair[1].1.income,
            prev_expense: pair[0].1.expense,
            expense: pair[1].1.expense,
        })
        .collect()
}

/// Fit the model, or `None` with too few samples or a degenerate system
pub fn fit_ols(samples: &[TrainingSample]) -> Option<RegressionModel> {
    if samples.len() < MIN_SAMPLES {
        debug!(samples = samples.len(), "Too few samples for regression");
        return None;
    }

    let (mut s00, mut s01, mut s02) = (0.0, 0.0, 0.0);
    let (mut s11, mut s12, mut s22) = (0.0, 0.0, 0.0);
    let (mut t0, mut t1, mut t2) = (0.0, 0.0, 0.0);

    for sample in samples {
        let x0 = 1.0;
        let x1 = sample.income;
        let x2 = sample.prev_expense;
        let y = sample.expense;

        s00 += x0 * x0;
        s01 += x0 * x1;
        s02 += x0 * x2;
        s11 += x1 * x1;
        s12 += x1 * x2;
        s22 += x2 * x2;
        t0 += x0 * y;
        t1 += x1 * y;
        t2 += x2 * y;
    }

    let xtx = [[s00, s01, s02], [s01, s11, s12], [s02, s12, s22]];
    let xty = [t0, t1, t2];

    let inverse = invert3(&xtx)?;
    let beta = multiply(&inverse, &xty);

    if !beta.iter().all(|b| b.is_finite()) {
        debug!(?beta, "Regression produced non-finite coefficients");
        return None;
    }

    Some(RegressionModel {
        intercept: beta[0],
        coef_income: beta[1],
        coef_prev_expense: beta[2],
    })
}

/// Inverse via cofactors: `adj(m) / det(m)`
fn invert3(m: &Matrix3) -> Option<Matrix3> {
    let [[a, b, c], [d, e, f], [g, h, i]] = *m;

    let ca = e * i - f * h;
    let cb = -(d * i - f * g);
    let cc = d * h - e * g;
    let cd = -(b * i - c * h);
    let ce = a * i - c * g;
    let cf = -(a * h - b * g);
    let cg = b * f - c * e;
    let ch = -(a * f - c * d);
    let ci = a * e - b * d;

    let det = a * ca + b * cb + c * cc;
    if !det.is_finite() || det.abs() < SINGULARITY_THRESHOLD {
        debug!(det, "Normal equations matrix is singular");
        return None;
    }

    let inv_det = 1.0 / det;
    Some([
        [ca * inv_det, cd * inv_det, cg * inv_det],
        [cb * inv_det, ce * inv_det, ch * inv_det],
        [cc * inv_det, cf * inv_det, ci * inv_det],
    ])
}

fn multiply(m: &Matrix3, v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
