// libs/finance-cell/src/services/report.rs
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{BalanceReport, DateRangeQuery, Expense, FinanceError, IncomeReport, PaidBooking};
use crate::services::expense::range_filter;

/// Income and balance are computed by fetching the matching rows and summing
/// here rather than pushing aggregates into the store.
pub struct ReportService {
    db: PostgrestClient,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    pub async fn income(&self, query: &DateRangeQuery) -> Result<IncomeReport, FinanceError> {
        let appointments_income = self.paid_total("appointments", query).await?;
        let consultations_income = self.paid_total("consultations", query).await?;

        debug!(
            appointments_income,
            consultations_income, "Income report computed"
        );

        Ok(IncomeReport {
            appointments_income,
            consultations_income,
            total: appointments_income + consultations_income,
        })
    }

    pub async fn balance(&self, query: &DateRangeQuery) -> Result<BalanceReport, FinanceError> {
        let income = self.income(query).await?;
        let expenses = self.expenses_total(query).await?;

        Ok(BalanceReport {
            net: income.total - expenses,
            income,
            expenses,
        })
    }

    async fn paid_total(
        &self,
        table: &str,
        query: &DateRangeQuery,
    ) -> Result<f64, FinanceError> {
        let mut path = format!("/{}?paid=eq.true&status=neq.cancelled", table);
        path.push_str(&range_filter("start_time", query)?);

        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| FinanceError::Database(e.to_string()))?;

        let rows = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<PaidBooking>, _>>()
            .map_err(|e| FinanceError::Database(format!("Failed to parse {}: {}", table, e)))?;

        Ok(rows.iter().map(|r| r.amount_paid).sum())
    }

    async fn expenses_total(&self, query: &DateRangeQuery) -> Result<f64, FinanceError> {
        let mut path = "/expenses?select=*".to_string();
        path.push_str(&range_filter("date", query)?);

        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| FinanceError::Database(e.to_string()))?;

        let rows = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Expense>, _>>()
            .map_err(|e| FinanceError::Database(format!("Failed to parse expenses: {}", e)))?;

        Ok(rows.iter().map(|r| r.amount).sum())
    }
}
