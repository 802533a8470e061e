// libs/treatment-cell/src/services/treatment.rs
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::postgrest::is_foreign_key_violation;
use shared_database::PostgrestClient;

use crate::models::{CreateTreatmentRequest, Treatment, TreatmentError, UpdateTreatmentRequest};

pub struct TreatmentService {
    db: PostgrestClient,
}

impl TreatmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    pub async fn list(&self) -> Result<Vec<Treatment>, TreatmentError> {
        self.fetch_list("/treatments?order=name.asc").await
    }

    pub async fn get(&self, id: i32) -> Result<Treatment, TreatmentError> {
        let path = format!("/treatments?id=eq.{}", id);
        let mut result = self.fetch_list(&path).await?;

        if result.is_empty() {
            return Err(TreatmentError::NotFound);
        }
        Ok(result.remove(0))
    }

    pub async fn create(
        &self,
        request: CreateTreatmentRequest,
    ) -> Result<Treatment, TreatmentError> {
        debug!("Creating treatment '{}'", request.name);

        let payload = json!({
            "name": request.name,
            "description": blank_to_null(request.description),
            "base_price": request.base_price,
        });

        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::POST,
                "/treatments",
                Some(payload),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| TreatmentError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(TreatmentError::Database(
                "Failed to create treatment".to_string(),
            ));
        }

        let treatment: Treatment = serde_json::from_value(result[0].clone())
            .map_err(|e| TreatmentError::Database(format!("Failed to parse treatment: {}", e)))?;

        info!("Treatment {} created", treatment.id);
        Ok(treatment)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateTreatmentRequest,
    ) -> Result<Treatment, TreatmentError> {
        let mut update_data = Map::new();
        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(description) = request.description {
            update_data.insert(
                "description".to_string(),
                json!(blank_to_null(Some(description))),
            );
        }
        if let Some(base_price) = request.base_price {
            update_data.insert("base_price".to_string(), json!(base_price));
        }

        let path = format!("/treatments?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| TreatmentError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(TreatmentError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| TreatmentError::Database(format!("Failed to parse treatment: {}", e)))
    }

    /// Deleting a treatment that bookings still reference trips the foreign
    /// key constraint, which surfaces as a conflict rather than a 500.
    pub async fn delete(&self, id: i32) -> Result<(), TreatmentError> {
        let path = format!("/treatments?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(Method::DELETE, &path, None, Some(representation_headers()))
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    TreatmentError::InUse
                } else {
                    TreatmentError::Database(e.to_string())
                }
            })?;

        if result.is_empty() {
            return Err(TreatmentError::NotFound);
        }

        info!("Treatment {} deleted", id);
        Ok(())
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Treatment>, TreatmentError> {
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| TreatmentError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Treatment>, _>>()
            .map_err(|e| TreatmentError::Database(format!("Failed to parse treatments: {}", e)))
    }
}

fn blank_to_null(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn representation_headers() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "Prefer",
        reqwest::header::HeaderValue::from_static("return=representation"),
    );
    headers
}
