//! Integration tests for tally-core
//!
//! These tests exercise the full record → store → forecast → report workflow
//! against a real SQLite database.

use chrono::{DateTime, TimeZone, Utc};
use tally_core::{
    Database, FixedClock, ForecastConfig, ForecastEngine, ModelUsed, MonthKey, NewRecord,
};

const USER: &str = "alice";

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// Six months where expense = 100 + 0.5 * income + 0.25 * previous expense
fn seed_linear_history(db: &Database) {
    let incomes = [2000.0, 2500.0, 1800.0, 3000.0, 2200.0, 2700.0];
    let mut expense = 900.0;
    for (i, income) in incomes.iter().enumerate() {
        let month = i as u32 + 1;
        if i > 0 {
            expense = 100.0 + 0.5 * income + 0.25 * expense;
        }
        db.insert_record(&NewRecord::income(USER, at(2024, month, 1), *income))
            .expect("Failed to insert income");
        // Split the month's spending across two records
        db.insert_record(&NewRecord::expense(USER, at(2024, month, 3), expense / 2.0))
            .expect("Failed to insert expense");
        db.insert_record(&NewRecord::expense(USER, at(2024, month, 20), expense / 2.0))
            .expect("Failed to insert expense");
    }
}

// =============================================================================
// Forecast Integration Tests
// =============================================================================

#[test]
fn test_heuristic_forecast_from_database() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    for (month, expense) in [(1, 1000.0), (2, 1200.0), (3, 1350.5)] {
        db.insert_record(&NewRecord::income(USER, at(2024, month, 1), 3000.0))
            .unwrap();
        db.insert_record(&NewRecord::expense(USER, at(2024, month, 10), expense))
            .unwrap();
    }

    let clock = FixedClock::at(at(2024, 3, 15));
    let result = ForecastEngine::new(&db, &clock).forecast(USER, None).unwrap();

    assert_eq!(result.month, MonthKey::new(2024, 4).unwrap());
    assert!(result.defaulted_to_next_month);
    assert_eq!(result.latest_data_month, MonthKey::new(2024, 3));
    assert_eq!(result.model_used, ModelUsed::Heuristic);
    assert_eq!(result.forecast_expense, 1183.5);
    assert_eq!(result.history.len(), 3);
}

#[test]
fn test_regression_forecast_from_database() {
    let db = Database::in_memory().unwrap();
    seed_linear_history(&db);

    let clock = FixedClock::at(at(2024, 9, 1));
    let result = ForecastEngine::new(&db, &clock).forecast(USER, None).unwrap();

    assert_eq!(result.month.to_string(), "2024-07");
    assert_eq!(result.model_used, ModelUsed::OlsRegression);

    let model = result.model_coefficients.expect("coefficients present");
    assert!((model.intercept - 100.0).abs() < 1e-4);
    assert!((model.coef_income - 0.5).abs() < 1e-4);
    assert!((model.coef_prev_expense - 0.25).abs() < 1e-4);

    // Nothing recorded for July yet: 100 + 0.5 * 0 + 0.25 * June's expense
    let june = result.history.last().unwrap().expense;
    let expected = ((100.0 + 0.25 * june) * 100.0_f64).round() / 100.0;
    assert!((result.forecast_expense - expected).abs() <= 0.01);
}

#[test]
fn test_explicit_month_blends_with_month_to_date() {
    let db = Database::in_memory().unwrap();
    seed_linear_history(&db);
    db.insert_record(&NewRecord::income(USER, at(2024, 7, 1), 2400.0))
        .unwrap();
    db.insert_record(&NewRecord::expense(USER, at(2024, 7, 5), 300.0))
        .unwrap();

    let clock = FixedClock::at(at(2024, 7, 10));
    let config = ForecastConfig {
        recency_window: 3,
        blend_alpha: 0.0,
    };
    let result = ForecastEngine::new(&db, &clock)
        .with_config(config)
        .forecast(USER, Some("2024-07"))
        .unwrap();

    assert!(!result.defaulted_to_next_month);
    assert_eq!(result.latest_data_month.unwrap().to_string(), "2024-07");
    assert_eq!(result.components.days_passed, 10);
    assert_eq!(result.components.total_days, 31);
    assert_eq!(result.components.expense_month_to_date, 300.0);
    assert_eq!(result.components.income_month_to_date, 2400.0);
    // Target month never appears in its own history
    assert!(result.history.iter().all(|h| h.month.to_string() != "2024-07"));
    // alpha = 0 leaves only the pace projection: 300 / 10 * 31
    assert_eq!(result.forecast_expense, 930.0);
}

#[test]
fn test_report_matches_json_payload() {
    let db = Database::in_memory().unwrap();
    seed_linear_history(&db);

    let clock = FixedClock::at(at(2024, 9, 1));
    let engine = ForecastEngine::new(&db, &clock);
    let result = engine.forecast(USER, Some("2024-07")).unwrap();
    let report = engine.report(USER, Some("2024-07")).unwrap();

    assert_eq!(report.filename, "forecast_2024-07.txt");
    assert!(report.content.starts_with("Expense Forecast Report\n"));
    assert!(report
        .content
        .ends_with(&format!("Final Forecasted Expense: {}", result.forecast_expense)));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["month"], "2024-07");
    assert_eq!(json["modelUsed"], "ols_regression");
    assert_eq!(json["forecastExpense"], result.forecast_expense);

    let components = &json["components"];
    for (label, key) in [
        ("Avg Expense (last 3)", "avgExpenseLast3"),
        ("Avg Income (last 3)", "avgIncomeLast3"),
        ("Income Month-To-Date", "incomeMonthToDate"),
        ("Expense Month-To-Date", "expenseMonthToDate"),
        ("Income Adjustment", "incomeAdjustment"),
        ("Preliminary", "preliminary"),
        ("To-Date Projection", "toDateProjection"),
    ] {
        let printed = report_number(&report.content, label);
        assert_eq!(Some(printed), components[key].as_f64(), "{}", label);
    }
    assert_eq!(
        report_value(&report.content, "Days Passed / Total"),
        format!("{} / {}", components["daysPassed"], components["totalDays"])
    );

    let coefficients = &json["modelCoefficients"];
    let line = report_value(&report.content, "Coefficients");
    let printed: Vec<f64> = line
        .split(", ")
        .map(|part| part.split_once('=').unwrap().1.parse().unwrap())
        .collect();
    assert_eq!(
        printed,
        vec![
            coefficients["intercept"].as_f64().unwrap(),
            coefficients["coefIncome"].as_f64().unwrap(),
            coefficients["coefPrevExpense"].as_f64().unwrap(),
        ]
    );
    assert!(line.starts_with("β0="));
    assert!(line.contains(", β1(income)="));
    assert!(line.contains(", β2(prevExpense)="));
}

/// Text after `label: ` on the first line carrying that label
fn report_value(content: &str, label: &str) -> String {
    let prefix = format!("{}: ", label);
    content
        .lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix(&prefix))
        .unwrap_or_else(|| panic!("missing report line {}", label))
        .to_string()
}

fn report_number(content: &str, label: &str) -> f64 {
    report_value(content, label).parse().unwrap()
}

#[test]
fn test_invalid_month_is_rejected() {
    let db = Database::in_memory().unwrap();
    let clock = FixedClock::at(at(2024, 9, 1));
    let err = ForecastEngine::new(&db, &clock)
        .forecast(USER, Some("2024-13"))
        .unwrap_err();
    assert!(matches!(err, tally_core::Error::InvalidMonth(_)));
}

#[test]
fn test_users_are_isolated() {
    let db = Database::in_memory().unwrap();
    seed_linear_history(&db);

    let clock = FixedClock::at(at(2025, 2, 17));
    let result = ForecastEngine::new(&db, &clock).forecast("bob", None).unwrap();

    assert_eq!(result.month.to_string(), "2025-02");
    assert_eq!(result.forecast_expense, 0.0);
    assert!(result.history.is_empty());
    assert_eq!(result.latest_data_month, None);
}
