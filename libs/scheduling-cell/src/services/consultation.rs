// libs/scheduling-cell/src/services/consultation.rs
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{
    BookingRef, BookingStatus, Consultation, ConsultationSearchQuery, CreateConsultationRequest,
    SchedulingError, UpdateConsultationRequest,
};
use crate::services::appointment::{
    combine_interval, day_range, encode_timestamp, representation_headers,
};
use crate::services::availability::AvailabilityService;

pub struct ConsultationService {
    db: Arc<PostgrestClient>,
    availability: AvailabilityService,
}

impl ConsultationService {
    pub fn new(config: &AppConfig) -> Self {
        let db = Arc::new(PostgrestClient::new(config));
        let availability = AvailabilityService::new(Arc::clone(&db));
        Self { db, availability }
    }

    pub async fn search(
        &self,
        query: ConsultationSearchQuery,
    ) -> Result<Vec<Consultation>, SchedulingError> {
        debug!("Searching consultations with filters: {:?}", query);

        let mut query_parts = Vec::new();
        if let Some(date) = &query.date {
            let (from, to) = day_range(date)?;
            query_parts.push(format!("start_time=gte.{}", encode_timestamp(from)));
            query_parts.push(format!("start_time=lte.{}", encode_timestamp(to)));
        }

        query_parts.push("order=start_time.asc".to_string());
        let path = format!("/consultations?{}", query_parts.join("&"));
        self.fetch_list(&path).await
    }

    pub async fn get(&self, id: i32) -> Result<Consultation, SchedulingError> {
        let path = format!("/consultations?id=eq.{}", id);
        let mut result = self.fetch_list(&path).await?;

        if result.is_empty() {
            return Err(SchedulingError::NotFound);
        }
        Ok(result.remove(0))
    }

    pub async fn create(
        &self,
        request: CreateConsultationRequest,
    ) -> Result<Consultation, SchedulingError> {
        let (start, end) = combine_interval(&request.date, &request.start_time, &request.end_time)?;

        if let Some(specialist_id) = request.specialist_id {
            let available = self
                .availability
                .is_specialist_available(Some(specialist_id), start, end, None)
                .await?;
            if !available {
                return Err(SchedulingError::Conflict(
                    "The specialist already has an activity in that time slot".to_string(),
                ));
            }
        }

        let status = request.status.unwrap_or(BookingStatus::Pending);
        let payload = json!({
            "patient_id": request.patient_id,
            "specialist_id": request.specialist_id,
            "reason": request.reason,
            "diagnosis": request.diagnosis,
            "recommended_treatment_id": request.recommended_treatment_id,
            "start_time": start,
            "end_time": end,
            "suggested_price": request.suggested_price.unwrap_or(0.0),
            "paid": request.paid.unwrap_or(false),
            "amount_paid": request.amount_paid.unwrap_or(0.0),
            "notes": request.notes,
            "status": status.to_string(),
        });

        let consultation = self.insert(payload).await?;
        info!(
            "Consultation {} created for patient {} at {}",
            consultation.id, consultation.patient_id, consultation.start_time
        );
        Ok(consultation)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateConsultationRequest,
    ) -> Result<Consultation, SchedulingError> {
        debug!("Updating consultation: {}", id);

        let interval = match (&request.date, &request.start_time, &request.end_time) {
            (Some(date), Some(start), Some(end)) => Some(combine_interval(date, start, end)?),
            _ => None,
        };

        if let (Some(Some(specialist_id)), Some((start, end))) = (request.specialist_id, interval) {
            let available = self
                .availability
                .is_specialist_available(
                    Some(specialist_id),
                    start,
                    end,
                    Some(BookingRef::Consultation(id)),
                )
                .await?;
            if !available {
                return Err(SchedulingError::Conflict(
                    "Time slot conflicts with another activity".to_string(),
                ));
            }
        }

        let mut update_data = Map::new();

        if let Some((start, end)) = interval {
            update_data.insert("start_time".to_string(), json!(start));
            update_data.insert("end_time".to_string(), json!(end));
        }
        if let Some(specialist_id) = request.specialist_id {
            update_data.insert("specialist_id".to_string(), json!(specialist_id));
        }
        if let Some(reason) = request.reason {
            update_data.insert("reason".to_string(), json!(reason));
        }
        if let Some(diagnosis) = request.diagnosis {
            update_data.insert("diagnosis".to_string(), json!(diagnosis));
        }
        if let Some(recommended) = request.recommended_treatment_id {
            update_data.insert("recommended_treatment_id".to_string(), json!(recommended));
        }
        if let Some(suggested_price) = request.suggested_price {
            update_data.insert("suggested_price".to_string(), json!(suggested_price));
        }
        if let Some(paid) = request.paid {
            update_data.insert("paid".to_string(), json!(paid));
        }
        if let Some(amount_paid) = request.amount_paid {
            update_data.insert("amount_paid".to_string(), json!(amount_paid));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status.to_string()));
        }

        let path = format!("/consultations?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::NotFound);
        }

        let consultation: Consultation = serde_json::from_value(result[0].clone())
            .map_err(|e| SchedulingError::Database(format!("Failed to parse consultation: {}", e)))?;

        info!("Consultation {} updated", id);
        Ok(consultation)
    }

    pub async fn delete(&self, id: i32) -> Result<(), SchedulingError> {
        let path = format!("/consultations?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(Method::DELETE, &path, None, Some(representation_headers()))
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::NotFound);
        }

        info!("Consultation {} deleted", id);
        Ok(())
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Consultation>, SchedulingError> {
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Consultation>, _>>()
            .map_err(|e| SchedulingError::Database(format!("Failed to parse consultations: {}", e)))
    }

    async fn insert(&self, payload: Value) -> Result<Consultation, SchedulingError> {
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::POST,
                "/consultations",
                Some(payload),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::Database(
                "Failed to create consultation".to_string(),
            ));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| SchedulingError::Database(format!("Failed to parse consultation: {}", e)))
    }
}
