use chrono::{Duration, NaiveDate, NaiveTime};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::postgrest::StorageClient;

use crate::error::SchedulingError;
use crate::models::{
    BookedInterval, Booking, FreeSlot, Provider, ProviderAvailabilityResponse, ScheduleWindow,
};
use crate::services::slots::compute_free_slots;

pub struct AvailabilityService {
    storage: StorageClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            storage: StorageClient::new(config),
        }
    }

    /// Compute the free slots for a provider over a queried date range.
    ///
    /// Fetches the provider record, the active schedule windows overlapping
    /// the range and the non-cancelled bookings in it, then derives the open
    /// slots. Window and bookings are read once per request so the calculator
    /// sees a consistent snapshot.
    pub async fn get_provider_availability(
        &self,
        provider_id: &str,
        range_start: NaiveDate,
        range_end: NaiveDate,
        duration_minutes: Option<i32>,
    ) -> Result<ProviderAvailabilityResponse, SchedulingError> {
        debug!(
            "Calculating availability for provider {} from {} to {}",
            provider_id, range_start, range_end
        );

        if range_start > range_end {
            return Err(SchedulingError::InvalidRange(format!(
                "range start {} is after range end {}",
                range_start, range_end
            )));
        }

        if let Some(minutes) = duration_minutes {
            if minutes <= 0 {
                return Err(SchedulingError::InvalidRange(
                    "slot duration must be positive".to_string(),
                ));
            }
        }

        let provider = self.get_provider(provider_id).await?;

        let windows = self
            .get_schedule_windows_in_range(provider_id, range_start, range_end)
            .await?;

        if windows.is_empty() {
            return Err(SchedulingError::ScheduleNotFound(format!(
                "provider {} has no schedule window between {} and {}",
                provider_id, range_start, range_end
            )));
        }

        let bookings = self
            .get_bookings_in_range(provider_id, range_start, range_end)
            .await?;
        let booked: Vec<BookedInterval> = bookings.iter().map(BookedInterval::from).collect();

        let mut slots = Vec::new();
        for window in &windows {
            let slot_duration =
                Duration::minutes(duration_minutes.unwrap_or(window.slot_minutes) as i64);

            let window_slots =
                compute_free_slots(window, &booked, range_start, range_end, slot_duration)
                    .map_err(|err| match err {
                        // A malformed stored window is a data problem, not a
                        // caller error.
                        SchedulingError::InvalidWindow(msg) => SchedulingError::Storage(format!(
                            "stored schedule window {} is invalid: {}",
                            window.id, msg
                        )),
                        other => other,
                    })?;

            slots.extend(window_slots);
        }

        slots.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        let slots = remove_overlapping_slots(slots);

        debug!(
            "Found {} available slots for provider {}",
            slots.len(),
            provider_id
        );

        Ok(ProviderAvailabilityResponse {
            provider_id: provider.id,
            provider_name: provider.full_name,
            specialty: provider.specialty,
            range_start,
            range_end,
            total_slots: slots.len(),
            slots,
        })
    }

    /// Availability for several providers at once, for dashboard views.
    /// Providers without a resolvable schedule are skipped, not an error.
    pub async fn get_availability_overview(
        &self,
        provider_ids: Vec<String>,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<ProviderAvailabilityResponse>, SchedulingError> {
        debug!(
            "Building availability overview for {} providers from {} to {}",
            provider_ids.len(),
            range_start,
            range_end
        );

        let mut responses = Vec::new();

        for provider_id in provider_ids {
            match self
                .get_provider_availability(&provider_id, range_start, range_end, None)
                .await
            {
                Ok(response) => responses.push(response),
                Err(SchedulingError::ProviderNotFound(msg))
                | Err(SchedulingError::ScheduleNotFound(msg)) => {
                    warn!("Skipping provider {} in overview: {}", provider_id, msg);
                }
                Err(other) => return Err(other),
            }
        }

        Ok(responses)
    }

    // Private helper methods

    async fn get_provider(&self, provider_id: &str) -> Result<Provider, SchedulingError> {
        let path = format!(
            "/rest/v1/providers?id=eq.{}&is_active=eq.true",
            provider_id
        );
        let result: Vec<Value> = self
            .storage
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::ProviderNotFound(format!(
                "provider {} does not exist or is inactive",
                provider_id
            )));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|err| SchedulingError::Storage(err.to_string()))
    }

    async fn get_schedule_windows_in_range(
        &self,
        provider_id: &str,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<ScheduleWindow>, SchedulingError> {
        // A window overlaps the query range when it starts on or before the
        // range end and ends on or after the range start.
        let path = format!(
            "/rest/v1/schedule_windows?provider_id=eq.{}&is_active=eq.true&valid_from=lte.{}&valid_to=gte.{}&order=valid_from.asc",
            provider_id, range_end, range_start
        );

        let result: Vec<Value> = self
            .storage
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        result
            .into_iter()
            .map(|window| {
                serde_json::from_value(window)
                    .map_err(|err| SchedulingError::Storage(err.to_string()))
            })
            .collect()
    }

    async fn get_bookings_in_range(
        &self,
        provider_id: &str,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<Booking>, SchedulingError> {
        let path = format!(
            "/rest/v1/bookings?provider_id=eq.{}&booking_date=gte.{}&booking_date=lte.{}&status=neq.cancelled&order=booking_date.asc,start_time.asc",
            provider_id, range_start, range_end
        );

        let result: Vec<Value> = self
            .storage
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        result
            .into_iter()
            .map(|booking| {
                serde_json::from_value(booking)
                    .map_err(|err| SchedulingError::Storage(err.to_string()))
            })
            .collect()
    }
}

/// Drop slots that overlap an earlier slot on the same day. Overlaps can only
/// come from multiple schedule windows covering the same dates.
fn remove_overlapping_slots(slots: Vec<FreeSlot>) -> Vec<FreeSlot> {
    let mut result: Vec<FreeSlot> = Vec::new();
    let mut last: Option<(NaiveDate, NaiveTime)> = None;

    for slot in slots {
        match last {
            Some((date, end)) if slot.date == date && slot.start_time < end => {
                // Skip overlapping slot
            }
            _ => {
                last = Some((slot.date, slot.end_time));
                result.push(slot);
            }
        }
    }

    result
}
