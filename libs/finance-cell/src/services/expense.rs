// libs/finance-cell/src/services/expense.rs
use chrono::{Local, NaiveDate, NaiveDateTime};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{CreateExpenseRequest, DateRangeQuery, Expense, FinanceError};

pub struct ExpenseService {
    db: PostgrestClient,
}

impl ExpenseService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    pub async fn list(&self, query: DateRangeQuery) -> Result<Vec<Expense>, FinanceError> {
        let mut path = "/expenses?order=date.desc".to_string();
        path.push_str(&range_filter("date", &query)?);

        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| FinanceError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Expense>, _>>()
            .map_err(|e| FinanceError::Database(format!("Failed to parse expenses: {}", e)))
    }

    pub async fn create(&self, request: CreateExpenseRequest) -> Result<Expense, FinanceError> {
        if request.amount <= 0.0 {
            return Err(FinanceError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if request.reason.trim().is_empty() {
            return Err(FinanceError::Validation("Reason is required".to_string()));
        }

        let date = match request.date {
            Some(raw) => parse_day(&raw)?.and_hms_opt(0, 0, 0).unwrap(),
            None => Local::now().naive_local(),
        };

        let payload = json!({
            "amount": request.amount,
            "reason": request.reason,
            "date": format_timestamp(date),
            "specialist_id": request.specialist_id,
        });

        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::POST,
                "/expenses",
                Some(payload),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| FinanceError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(FinanceError::Database(
                "Failed to create expense".to_string(),
            ));
        }

        let expense: Expense = serde_json::from_value(result[0].clone())
            .map_err(|e| FinanceError::Database(format!("Failed to parse expense: {}", e)))?;

        info!("Expense {} recorded ({})", expense.id, expense.amount);
        Ok(expense)
    }

    pub async fn delete(&self, id: i32) -> Result<(), FinanceError> {
        let path = format!("/expenses?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(Method::DELETE, &path, None, Some(representation_headers()))
            .await
            .map_err(|e| FinanceError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(FinanceError::NotFound);
        }

        info!("Expense {} deleted", id);
        Ok(())
    }
}

pub(crate) fn parse_day(raw: &str) -> Result<NaiveDate, FinanceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| FinanceError::Validation(format!("Invalid date: {}", raw)))
}

/// `&{column}=gte.…&{column}=lte.…` for whichever bounds the query carries.
/// Bounds cover their whole day.
pub(crate) fn range_filter(column: &str, query: &DateRangeQuery) -> Result<String, FinanceError> {
    let mut filter = String::new();
    if let Some(from) = &query.from {
        let start = parse_day(from)?.and_hms_opt(0, 0, 0).unwrap();
        filter.push_str(&format!("&{}=gte.{}", column, encode_timestamp(start)));
    }
    if let Some(to) = &query.to {
        let end = parse_day(to)?.and_hms_milli_opt(23, 59, 59, 999).unwrap();
        filter.push_str(&format!("&{}=lte.{}", column, encode_timestamp(end)));
    }
    Ok(filter)
}

pub(crate) fn format_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

pub(crate) fn encode_timestamp(value: NaiveDateTime) -> String {
    urlencoding::encode(&format_timestamp(value)).into_owned()
}

pub(crate) fn representation_headers() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "Prefer",
        reqwest::header::HeaderValue::from_static("return=representation"),
    );
    headers
}
