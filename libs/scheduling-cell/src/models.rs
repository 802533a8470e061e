// libs/scheduling-cell/src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::AppError;

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

/// An appointment: a scheduled treatment block for a patient, optionally
/// assigned to a specialist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i32,
    pub patient_id: i32,
    pub specialist_id: Option<i32>,
    pub treatment_id: i32,
    pub origin_consultation_id: Option<i32>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub agreed_price: f64,
    pub paid: bool,
    pub amount_paid: f64,
    pub notes: Option<String>,
    pub status: BookingStatus,
}

/// A consultation: an assessment block with a free-text reason instead of a
/// treatment reference, optionally recommending a treatment afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: i32,
    pub patient_id: i32,
    pub specialist_id: Option<i32>,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub recommended_treatment_id: Option<i32>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub suggested_price: f64,
    pub paid: bool,
    pub amount_paid: f64,
    pub notes: Option<String>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// Identifies the booking being updated so the availability check does not
/// report a booking as conflicting with itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BookingRef {
    Appointment(i32),
    Consultation(i32),
}

/// Minimal projection of a stored booking used by the availability check.
#[derive(Debug, Clone, Deserialize)]
pub struct BookedSlot {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: i32,
    pub specialist_id: Option<i32>,
    pub treatment_id: i32,
    pub origin_consultation_id: Option<i32>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM`.
    pub start_time: String,
    pub end_time: String,
    pub agreed_price: f64,
    pub paid: Option<bool>,
    pub amount_paid: Option<f64>,
    pub notes: Option<String>,
}

/// Partial update. Absent fields are left unchanged; `specialist_id: null`
/// explicitly clears the assignment (double-`Option`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub specialist_id: Option<Option<i32>>,
    pub agreed_price: Option<f64>,
    pub paid: Option<bool>,
    pub amount_paid: Option<f64>,
    pub notes: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConsultationRequest {
    pub patient_id: i32,
    pub specialist_id: Option<i32>,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub recommended_treatment_id: Option<i32>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub suggested_price: Option<f64>,
    pub paid: Option<bool>,
    pub amount_paid: Option<f64>,
    pub notes: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConsultationRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub specialist_id: Option<Option<i32>>,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub recommended_treatment_id: Option<Option<i32>>,
    pub suggested_price: Option<f64>,
    pub paid: Option<bool>,
    pub amount_paid: Option<f64>,
    pub notes: Option<String>,
    pub status: Option<BookingStatus>,
}

/// Distinguishes "field absent" (no change) from "field null" (clear it).
fn deserialize_clearable<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentSearchQuery {
    /// Exact day filter, `YYYY-MM-DD`. Takes precedence over `month`.
    pub date: Option<String>,
    /// Whole-month filter, `YYYY-MM`, used by the calendar view.
    pub month: Option<String>,
    pub patient_id: Option<i32>,
    pub specialist_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsultationSearchQuery {
    pub date: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Booking not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound => AppError::NotFound("Booking not found".to_string()),
            SchedulingError::Validation(msg) => AppError::ValidationError(msg),
            SchedulingError::Conflict(msg) => AppError::Conflict(msg),
            SchedulingError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_absent_from_null_specialist() {
        let absent: UpdateAppointmentRequest = serde_json::from_str(r#"{"notes":"x"}"#).unwrap();
        assert_eq!(absent.specialist_id, None);

        let cleared: UpdateAppointmentRequest =
            serde_json::from_str(r#"{"specialist_id":null}"#).unwrap();
        assert_eq!(cleared.specialist_id, Some(None));

        let set: UpdateAppointmentRequest =
            serde_json::from_str(r#"{"specialist_id":7}"#).unwrap();
        assert_eq!(set.specialist_id, Some(Some(7)));
    }

    #[test]
    fn booking_status_round_trips_as_snake_case() {
        let json = serde_json::to_string(&BookingStatus::NoShow).unwrap();
        assert_eq!(json, r#""no_show""#);
        assert_eq!(BookingStatus::NoShow.to_string(), "no_show");
    }
}
