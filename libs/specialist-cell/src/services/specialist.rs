// libs/specialist-cell/src/services/specialist.rs
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{
    CreateSpecialistRequest, Specialist, SpecialistError, UpdateSpecialistRequest,
};

pub struct SpecialistService {
    db: PostgrestClient,
}

impl SpecialistService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    pub async fn list(&self) -> Result<Vec<Specialist>, SpecialistError> {
        self.fetch_list("/specialists?order=last_names.asc").await
    }

    pub async fn get(&self, id: i32) -> Result<Specialist, SpecialistError> {
        let path = format!("/specialists?id=eq.{}", id);
        let mut result = self.fetch_list(&path).await?;

        if result.is_empty() {
            return Err(SpecialistError::NotFound);
        }
        Ok(result.remove(0))
    }

    pub async fn create(
        &self,
        request: CreateSpecialistRequest,
    ) -> Result<Specialist, SpecialistError> {
        debug!("Creating specialist with national id {}", request.national_id);

        if self.find_by_national_id(&request.national_id).await?.is_some() {
            return Err(SpecialistError::DuplicateNationalId(request.national_id));
        }

        let email = blank_to_null(request.email);
        if let Some(email) = &email {
            if self.find_by_email(email).await?.is_some() {
                return Err(SpecialistError::DuplicateEmail(email.clone()));
            }
        }

        let payload = json!({
            "first_names": request.first_names,
            "last_names": request.last_names,
            "national_id": request.national_id,
            "gender": request.gender,
            "phone": blank_to_null(request.phone),
            "address": blank_to_null(request.address),
            "email": email,
            "birth_date": request.birth_date,
        });

        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::POST,
                "/specialists",
                Some(payload),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| SpecialistError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SpecialistError::Database(
                "Failed to create specialist".to_string(),
            ));
        }

        let specialist: Specialist = serde_json::from_value(result[0].clone())
            .map_err(|e| SpecialistError::Database(format!("Failed to parse specialist: {}", e)))?;

        info!("Specialist {} created", specialist.id);
        Ok(specialist)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateSpecialistRequest,
    ) -> Result<Specialist, SpecialistError> {
        // Uniqueness re-checked against every record but the one being edited
        if let Some(national_id) = &request.national_id {
            if let Some(existing) = self.find_by_national_id(national_id).await? {
                if existing.id != id {
                    return Err(SpecialistError::DuplicateNationalId(national_id.clone()));
                }
            }
        }
        if let Some(email) = &request.email {
            if !email.is_empty() {
                if let Some(existing) = self.find_by_email(email).await? {
                    if existing.id != id {
                        return Err(SpecialistError::DuplicateEmail(email.clone()));
                    }
                }
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

        let path = format!("/specialists?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| SpecialistError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SpecialistError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| SpecialistError::Database(format!("Failed to parse specialist: {}", e)))
    }

    pub async fn delete(&self, id: i32) -> Result<(), SpecialistError> {
        let path = format!("/specialists?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(Method::DELETE, &path, None, Some(representation_headers()))
            .await
            .map_err(|e| SpecialistError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SpecialistError::NotFound);
        }

        info!("Specialist {} deleted", id);
        Ok(())
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Specialist>, SpecialistError> {
        let path = format!("/specialists?national_id=eq.{}", national_id);
        let mut result = self.fetch_list(&path).await?;
        Ok(if result.is_empty() {
            None
        } else {
            Some(result.remove(0))
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Specialist>, SpecialistError> {
        let path = format!("/specialists?email=eq.{}", email);
        let mut result = self.fetch_list(&path).await?;
        Ok(if result.is_empty() {
            None
        } else {
            Some(result.remove(0))
        })
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Specialist>, SpecialistError> {
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| SpecialistError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Specialist>, _>>()
            .map_err(|e| SpecialistError::Database(format!("Failed to parse specialists: {}", e)))
    }
}

/// Empty strings from HTML forms become NULL so they do not trip unique
/// indexes on optional columns.
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
