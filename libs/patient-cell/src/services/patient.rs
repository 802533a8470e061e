// libs/patient-cell/src/services/patient.rs
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest};

pub struct PatientService {
    db: PostgrestClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    pub async fn list(&self) -> Result<Vec<Patient>, PatientError> {
        self.fetch_list("/patients?order=last_names.asc").await
    }

    pub async fn get(&self, id: i32) -> Result<Patient, PatientError> {
        let path = format!("/patients?id=eq.{}", id);
        let mut result = self.fetch_list(&path).await?;

        if result.is_empty() {
            return Err(PatientError::NotFound);
        }
        Ok(result.remove(0))
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Creating patient with national id {}", request.national_id);

        let existing_path = format!("/patients?national_id=eq.{}", request.national_id);
        let existing = self.fetch_list(&existing_path).await?;
        if !existing.is_empty() {
            return Err(PatientError::DuplicateNationalId(request.national_id));
        }

        let payload = json!({
            "first_names": request.first_names,
            "last_names": request.last_names,
            "national_id": request.national_id,
            "gender": request.gender,
            "phone": blank_to_null(request.phone),
            "address": blank_to_null(request.address),
            "email": blank_to_null(request.email),
            "birth_date": request.birth_date,
        });

        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::POST,
                "/patients",
                Some(payload),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(PatientError::Database("Failed to create patient".to_string()));
        }

        let patient: Patient = serde_json::from_value(result[0].clone())
            .map_err(|e| PatientError::Database(format!("Failed to parse patient: {}", e)))?;

        info!("Patient {} created", patient.id);
        Ok(patient)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        if let Some(national_id) = &request.national_id {
            let existing_path = format!("/patients?national_id=eq.{}", national_id);
            let existing = self.fetch_list(&existing_path).await?;
            if existing.iter().any(|p| p.id != id) {
                return Err(PatientError::DuplicateNationalId(national_id.clone()));
            }
        }

        let mut update_data = Map::new();
        if let Some(first_names) = request.first_names {
            update_data.insert("first_names".to_string(), json!(first_names));
        }
        if let Some(last_names) = request.last_names {
            update_data.insert("last_names".to_string(), json!(last_names));
        }
        if let Some(national_id) = request.national_id {
            update_data.insert("national_id".to_string(), json!(national_id));
        }
        if let Some(gender) = request.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(blank_to_null(Some(phone))));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(blank_to_null(Some(address))));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(blank_to_null(Some(email))));
        }
        if let Some(birth_date) = request.birth_date {
            update_data.insert("birth_date".to_string(), json!(birth_date));
        }

        let path = format!("/patients?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(PatientError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| PatientError::Database(format!("Failed to parse patient: {}", e)))
    }

    pub async fn delete(&self, id: i32) -> Result<(), PatientError> {
        let path = format!("/patients?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(Method::DELETE, &path, None, Some(representation_headers()))
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} deleted", id);
        Ok(())
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Patient>, PatientError> {
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Patient>, _>>()
            .map_err(|e| PatientError::Database(format!("Failed to parse patients: {}", e)))
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
