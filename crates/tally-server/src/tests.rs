//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tally_core::{FixedClock, NewRecord};
use tower::ServiceExt;

const USER: &str = "alice";

fn seeded_db() -> Database {
    let db = Database::in_memory().unwrap();
    for (month, expense) in [(1, 1000.0), (2, 1200.0), (3, 1350.5)] {
        let date = Utc.with_ymd_and_hms(2024, month, 10, 12, 0, 0).unwrap();
        db.insert_record(&NewRecord::income(USER, date, 3000.0))
            .unwrap();
        db.insert_record(&NewRecord::expense(USER, date, expense))
            .unwrap();
    }
    db
}

fn setup_test_app() -> Router {
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap());
    create_router_with_clock(seeded_db(), ServerConfig::default(), Arc::new(clock))
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    builder.body(Body::empty()).unwrap()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health", None)).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}

// ========== Forecast JSON ==========

#[tokio::test]
async fn test_forecast_defaults_to_next_month() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense", Some(USER)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month"], "2024-04");
    assert_eq!(json["forecastExpense"], 1183.5);
    assert_eq!(json["modelUsed"], "heuristic");
    assert_eq!(json["defaultedToNextMonth"], true);
    assert_eq!(json["latestDataMonth"], "2024-03");
    assert!(json["modelCoefficients"].is_null());
    assert_eq!(json["components"]["avgExpenseLast3"], 1183.5);
    assert_eq!(json["components"]["totalDays"], 30);
    assert_eq!(json["history"].as_array().unwrap().len(), 3);
    assert_eq!(json["history"][0]["month"], "2024-01");
}

#[tokio::test]
async fn test_forecast_empty_month_param_is_ignored() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense?month=", Some(USER)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month"], "2024-04");
}

#[tokio::test]
async fn test_forecast_explicit_month() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense?month=2024-03", Some(USER)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month"], "2024-03");
    assert_eq!(json["defaultedToNextMonth"], false);
    assert_eq!(json["components"]["daysPassed"], 15);
    assert_eq!(json["components"]["expenseMonthToDate"], 1350.5);
    assert_eq!(json["history"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_forecast_invalid_month() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense?month=2024-13", Some(USER)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid month. Use YYYY-MM.");
}

#[tokio::test]
async fn test_forecast_requires_user() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains(USER_HEADER));
}

#[tokio::test]
async fn test_forecast_unknown_user_uses_current_month() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense", Some("bob")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month"], "2024-03");
    assert_eq!(json["forecastExpense"], 0.0);
    assert!(json["latestDataMonth"].is_null());
}

// ========== Forecast report ==========

#[tokio::test]
async fn test_forecast_report_download() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense/report", Some(USER)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"forecast_2024-04.txt\""
    );

    let text = get_body_text(response).await;
    assert!(text.starts_with("Expense Forecast Report\nMonth: 2024-04\n"));
    assert!(text.ends_with("Final Forecasted Expense: 1183.5"));
}

#[tokio::test]
async fn test_forecast_report_invalid_month() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/expense/report?month=24-1", Some(USER)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Error mapping ==========

#[tokio::test]
async fn test_core_errors_are_sanitized() {
    let response =
        AppError::from_core(tally_core::Error::InvalidData("secret detail".to_string()))
            .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");

    let response = AppError::from_core(tally_core::Error::InvalidMonth("2024-00".to_string()))
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid month. Use YYYY-MM.");
}

#[tokio::test]
async fn test_response_build_errors_are_sanitized() {
    let build_err = axum::http::Response::builder()
        .header("bad header", "value")
        .body(Body::empty())
        .unwrap_err();
    let detail = build_err.to_string();

    let response = AppError::from(build_err).into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = get_body_text(response).await;
    assert_eq!(text, r#"{"error":"An internal error occurred"}"#);
    assert!(!text.contains(&detail));
}

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins(" https://a.example , ,https://b.example"),
        vec!["https://a.example", "https://b.example"]
    );
    assert!(parse_origins("").is_empty());
}
