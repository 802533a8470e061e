// libs/scheduling-cell/src/services/appointment.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{
    Appointment, AppointmentSearchQuery, BookingRef, BookingStatus, CreateAppointmentRequest,
    SchedulingError, UpdateAppointmentRequest,
};
use crate::services::availability::{combine_date_time, AvailabilityService};

pub struct AppointmentService {
    db: Arc<PostgrestClient>,
    availability: AvailabilityService,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        let db = Arc::new(PostgrestClient::new(config));
        let availability = AvailabilityService::new(Arc::clone(&db));
        Self { db, availability }
    }

    pub fn availability(&self) -> &AvailabilityService {
        &self.availability
    }

    /// List appointments filtered by exact day, whole month, patient or
    /// specialist; cancelled ones are kept so the agenda can show them
    /// struck through.
    pub async fn search(
        &self,
        query: AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        debug!("Searching appointments with filters: {:?}", query);

        let mut query_parts = Vec::new();

        if let Some(date) = &query.date {
            let (from, to) = day_range(date)?;
            query_parts.push(format!("start_time=gte.{}", encode_timestamp(from)));
            query_parts.push(format!("start_time=lte.{}", encode_timestamp(to)));
        } else if let Some(month) = &query.month {
            let (from, to) = month_range(month)?;
            query_parts.push(format!("start_time=gte.{}", encode_timestamp(from)));
            query_parts.push(format!("start_time=lte.{}", encode_timestamp(to)));
        }

        if let Some(patient_id) = query.patient_id {
            query_parts.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(specialist_id) = query.specialist_id {
            query_parts.push(format!("specialist_id=eq.{}", specialist_id));
        }

        query_parts.push("order=start_time.asc".to_string());
        let path = format!("/appointments?{}", query_parts.join("&"));
        self.fetch_list(&path).await
    }

    pub async fn get(&self, id: i32) -> Result<Appointment, SchedulingError> {
        let path = format!("/appointments?id=eq.{}", id);
        let mut result = self.fetch_list(&path).await?;

        if result.is_empty() {
            return Err(SchedulingError::NotFound);
        }
        Ok(result.remove(0))
    }

    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
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

        let payload = json!({
            "patient_id": request.patient_id,
            "specialist_id": request.specialist_id,
            "treatment_id": request.treatment_id,
            "origin_consultation_id": request.origin_consultation_id,
            "start_time": start,
            "end_time": end,
            "agreed_price": request.agreed_price,
            "paid": request.paid.unwrap_or(false),
            "amount_paid": request.amount_paid.unwrap_or(0.0),
            "notes": request.notes.unwrap_or_default(),
            "status": BookingStatus::Pending.to_string(),
        });

        let appointment = self.insert(payload).await?;
        info!(
            "Appointment {} created for patient {} at {}",
            appointment.id, appointment.patient_id, appointment.start_time
        );
        Ok(appointment)
    }

    /// Partial update. The interval is only recomputed when date and both
    /// times arrive together; the availability check re-runs only when a
    /// specialist is being assigned along with that recomputed interval.
    pub async fn update(
        &self,
        id: i32,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Updating appointment: {}", id);

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
                    Some(BookingRef::Appointment(id)),
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
            // Some(None) clears the assignment back to unassigned
            update_data.insert("specialist_id".to_string(), json!(specialist_id));
        }
        if let Some(agreed_price) = request.agreed_price {
            update_data.insert("agreed_price".to_string(), json!(agreed_price));
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

        let path = format!("/appointments?id=eq.{}", id);
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

        let appointment: Appointment = serde_json::from_value(result[0].clone())
            .map_err(|e| SchedulingError::Database(format!("Failed to parse appointment: {}", e)))?;

        info!("Appointment {} updated", id);
        Ok(appointment)
    }

    pub async fn delete(&self, id: i32) -> Result<(), SchedulingError> {
        let path = format!("/appointments?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(Method::DELETE, &path, None, Some(representation_headers()))
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::NotFound);
        }

        info!("Appointment {} deleted", id);
        Ok(())
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Appointment>, SchedulingError> {
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| SchedulingError::Database(format!("Failed to parse appointments: {}", e)))
    }

    async fn insert(&self, payload: Value) -> Result<Appointment, SchedulingError> {
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::POST,
                "/appointments",
                Some(payload),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::Database(
                "Failed to create appointment".to_string(),
            ));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| SchedulingError::Database(format!("Failed to parse appointment: {}", e)))
    }
}

/// Combine and validate a date plus start/end times of day into an interval.
pub(crate) fn combine_interval(
    date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), SchedulingError> {
    let start = combine_date_time(date, start_time)
        .ok_or_else(|| SchedulingError::Validation("Invalid date or start time".to_string()))?;
    let end = combine_date_time(date, end_time)
        .ok_or_else(|| SchedulingError::Validation("Invalid date or end time".to_string()))?;

    if end <= start {
        return Err(SchedulingError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    Ok((start, end))
}

pub(crate) fn day_range(date: &str) -> Result<(NaiveDateTime, NaiveDateTime), SchedulingError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| SchedulingError::Validation(format!("Invalid date filter: {}", date)))?;
    Ok((
        day.and_hms_opt(0, 0, 0).unwrap(),
        day.and_hms_opt(23, 59, 59).unwrap(),
    ))
}

/// `YYYY-MM` to the closed range covering that whole month.
pub(crate) fn month_range(month: &str) -> Result<(NaiveDateTime, NaiveDateTime), SchedulingError> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| SchedulingError::Validation(format!("Invalid month filter: {}", month)))?;

    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| SchedulingError::Validation(format!("Invalid month filter: {}", month)))?;

    Ok((
        first.and_hms_opt(0, 0, 0).unwrap(),
        last.and_hms_opt(23, 59, 59).unwrap(),
    ))
}

pub(crate) fn representation_headers() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "Prefer",
        reqwest::header::HeaderValue::from_static("return=representation"),
    );
    headers
}

pub(crate) fn encode_timestamp(ts: NaiveDateTime) -> String {
    urlencoding::encode(&ts.format("%Y-%m-%dT%H:%M:%S").to_string()).into_owned()
}
