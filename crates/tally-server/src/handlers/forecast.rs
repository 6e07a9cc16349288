//! Expense forecast handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{get_user_id, AppError, AppState};
use tally_core::{ForecastEngine, ForecastReport, ForecastResult};

/// Query parameters for forecast endpoints
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Target month (YYYY-MM); omitted or empty means "month after latest data"
    pub month: Option<String>,
}

impl ForecastQuery {
    fn month(&self) -> Option<String> {
        self.month
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/forecast/expense - Forecast payload as JSON
pub async fn get_expense_forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastQuery>,
    headers: HeaderMap,
) -> Result<Json<ForecastResult>, AppError> {
    let user_id = get_user_id(&headers)?;
    let month = params.month();

    let result = tokio::task::spawn_blocking(move || {
        ForecastEngine::new(&state.db, state.clock.as_ref())
            .with_config(state.forecast_config.clone())
            .forecast(&user_id, month.as_deref())
    })
    .await?
    .map_err(AppError::from_core)?;

    info!(
        month = %result.month,
        model = %result.model_used,
        forecast = result.forecast_expense,
        "Served expense forecast"
    );

    Ok(Json(result))
}

/// GET /api/forecast/expense/report - Forecast as a downloadable text file
pub async fn get_expense_forecast_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user_id = get_user_id(&headers)?;
    let month = params.month();

    let report: ForecastReport = tokio::task::spawn_blocking(move || {
        ForecastEngine::new(&state.db, state.clock.as_ref())
            .with_config(state.forecast_config.clone())
            .report(&user_id, month.as_deref())
    })
    .await?
    .map_err(AppError::from_core)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.filename),
        )
        .body(Body::from(report.content))
        .map_err(AppError::from)
}
