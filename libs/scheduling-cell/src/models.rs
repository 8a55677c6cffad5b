use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate, NaiveTime};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Recurring weekly availability pattern for one provider, valid over an
/// inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub active_weekdays: Vec<i32>, // 0 = Sunday, 1 = Monday, etc.
    pub daily_start: NaiveTime,
    pub daily_end: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub slot_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleWindow {
    pub fn has_break(&self) -> bool {
        self.break_start.is_some() && self.break_end.is_some()
    }
}

/// Stored booking row. Owned by the booking subsystem; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub patient_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Occupied interval as seen by the slot calculator. Plain data, no storage
/// identifiers attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedInterval {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl From<&Booking> for BookedInterval {
    fn from(booking: &Booking) -> Self {
        Self {
            date: booking.booking_date,
            start: booking.start_time,
            end: booking.end_time,
        }
    }
}

/// A bookable interval. Computed fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleWindowRequest {
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub active_weekdays: Vec<i32>,
    pub daily_start: NaiveTime,
    pub daily_end: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub slot_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleWindowRequest {
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub active_weekdays: Option<Vec<i32>>,
    pub daily_start: Option<NaiveTime>,
    pub daily_end: Option<NaiveTime>,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub slot_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

// DTO for the availability endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAvailabilityResponse {
    pub provider_id: Uuid,
    pub provider_name: String,
    pub specialty: String,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub total_slots: usize,
    pub slots: Vec<FreeSlot>,
}
