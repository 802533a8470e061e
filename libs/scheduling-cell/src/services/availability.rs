// libs/scheduling-cell/src/services/availability.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use std::sync::Arc;

use shared_database::PostgrestClient;

use crate::models::{BookedSlot, BookingRef, SchedulingError};

/// Decides whether a candidate interval for a specialist conflicts with any
/// existing, non-cancelled booking on the same calendar day. Appointments and
/// consultations block each other; an unassigned booking never conflicts.
pub struct AvailabilityService {
    db: Arc<PostgrestClient>,
}

impl AvailabilityService {
    pub fn new(db: Arc<PostgrestClient>) -> Self {
        Self { db }
    }

    /// Read-only check; returns true when the slot is free.
    pub async fn is_specialist_available(
        &self,
        specialist_id: Option<i32>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<BookingRef>,
    ) -> Result<bool, SchedulingError> {
        let Some(specialist_id) = specialist_id else {
            return Ok(true);
        };

        debug!(
            "Checking availability for specialist {} from {} to {}",
            specialist_id, start, end
        );

        let (day_start, day_end) = day_bounds(start);

        let exclude_appointment = match exclude {
            Some(BookingRef::Appointment(id)) => Some(id),
            _ => None,
        };
        let exclude_consultation = match exclude {
            Some(BookingRef::Consultation(id)) => Some(id),
            _ => None,
        };

        let appointments = self
            .booked_slots(
                "appointments",
                specialist_id,
                day_start,
                day_end,
                exclude_appointment,
            )
            .await?;
        let consultations = self
            .booked_slots(
                "consultations",
                specialist_id,
                day_start,
                day_end,
                exclude_consultation,
            )
            .await?;

        for slot in appointments.iter().chain(consultations.iter()) {
            let slot_end = resolve_end_time(slot);
            if intervals_overlap(start, end, slot.start_time, slot_end) {
                warn!(
                    "Conflict for specialist {}: candidate {}..{} overlaps booking {}..{}",
                    specialist_id, start, end, slot.start_time, slot_end
                );
                return Ok(false);
            }
        }

        Ok(true)
    }

    async fn booked_slots(
        &self,
        table: &str,
        specialist_id: i32,
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
        exclude_id: Option<i32>,
    ) -> Result<Vec<BookedSlot>, SchedulingError> {
        let mut query_parts = vec![
            format!("specialist_id=eq.{}", specialist_id),
            "status=neq.cancelled".to_string(),
            format!("start_time=gte.{}", encode_timestamp(day_start)),
            format!("start_time=lte.{}", encode_timestamp(day_end)),
        ];

        if let Some(id) = exclude_id {
            query_parts.push(format!("id=neq.{}", id));
        }

        let path = format!("/{}?{}&order=start_time.asc", table, query_parts.join("&"));

        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<BookedSlot>, _>>()
            .map_err(|e| SchedulingError::Database(format!("Failed to parse bookings: {}", e)))
    }
}

/// Combine a `YYYY-MM-DD` date and `HH:MM` time of day into a local-time
/// timestamp. No timezone is transmitted by clients.
pub fn combine_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    Some(date.and_time(time))
}

/// Local midnight to 23:59:59.999 of the candidate's calendar day.
pub fn day_bounds(instant: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let date = instant.date();
    let start = date.and_hms_opt(0, 0, 0).unwrap_or(instant);
    let end = date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or(instant);
    (start, end)
}

/// Half-open interval semantics: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && a_end > b_start`. Touching boundaries are
/// not a conflict.
pub fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Reconstruct a stored booking's absolute end from its start date and the
/// time of day of its stored end. A missing end is treated as a zero-duration
/// event at the start.
pub fn resolve_end_time(slot: &BookedSlot) -> NaiveDateTime {
    match slot.end_time {
        Some(end) => slot.start_time.date().and_time(end.time()),
        None => slot.start_time,
    }
}

fn encode_timestamp(ts: NaiveDateTime) -> String {
    urlencoding::encode(&ts.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()).into_owned()
}
