use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::postgrest::StorageClient;

use crate::error::SchedulingError;
use crate::models::{CreateScheduleWindowRequest, ScheduleWindow, UpdateScheduleWindowRequest};
use crate::services::slots::validate_schedule_bounds;

const DEFAULT_SLOT_MINUTES: i32 = 30;

pub struct ScheduleService {
    storage: StorageClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            storage: StorageClient::new(config),
        }
    }

    /// Create a recurring schedule window for a provider.
    pub async fn create_schedule_window(
        &self,
        provider_id: &str,
        request: CreateScheduleWindowRequest,
        auth_token: &str,
    ) -> Result<ScheduleWindow, SchedulingError> {
        debug!("Creating schedule window for provider: {}", provider_id);

        validate_schedule_bounds(
            request.valid_from,
            request.valid_to,
            &request.active_weekdays,
            request.daily_start,
            request.daily_end,
            request.break_start,
            request.break_end,
        )?;

        let slot_minutes = request.slot_minutes.unwrap_or(DEFAULT_SLOT_MINUTES);
        if slot_minutes <= 0 {
            return Err(SchedulingError::InvalidWindow(
                "slot_minutes must be positive".to_string(),
            ));
        }

        self.check_schedule_conflicts(provider_id, &request, None, auth_token)
            .await?;

        let window_data = json!({
            "provider_id": provider_id,
            "valid_from": request.valid_from,
            "valid_to": request.valid_to,
            "active_weekdays": request.active_weekdays,
            "daily_start": request.daily_start.format("%H:%M:%S").to_string(),
            "daily_end": request.daily_end.format("%H:%M:%S").to_string(),
            "break_start": request.break_start.map(|t| t.format("%H:%M:%S").to_string()),
            "break_end": request.break_end.map(|t| t.format("%H:%M:%S").to_string()),
            "slot_minutes": slot_minutes,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .storage
            .request_with_headers(
                Method::POST,
                "/rest/v1/schedule_windows",
                Some(auth_token),
                Some(window_data),
                Some(headers),
            )
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::Storage(
                "failed to create schedule window".to_string(),
            ));
        }

        let window: ScheduleWindow = serde_json::from_value(result[0].clone())
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;
        debug!("Schedule window created with ID: {}", window.id);

        Ok(window)
    }

    /// Partially update a schedule window. The merged definition must still
    /// satisfy the window invariants.
    pub async fn update_schedule_window(
        &self,
        window_id: &str,
        request: UpdateScheduleWindowRequest,
        auth_token: &str,
    ) -> Result<ScheduleWindow, SchedulingError> {
        debug!("Updating schedule window: {}", window_id);

        let current = self.get_window_by_id(window_id, auth_token).await?;

        // The merged definition is what ends up stored, so it is what gets
        // validated and conflict-checked.
        let merged = CreateScheduleWindowRequest {
            valid_from: request.valid_from.unwrap_or(current.valid_from),
            valid_to: request.valid_to.unwrap_or(current.valid_to),
            active_weekdays: request
                .active_weekdays
                .clone()
                .unwrap_or_else(|| current.active_weekdays.clone()),
            daily_start: request.daily_start.unwrap_or(current.daily_start),
            daily_end: request.daily_end.unwrap_or(current.daily_end),
            break_start: request.break_start.or(current.break_start),
            break_end: request.break_end.or(current.break_end),
            slot_minutes: request.slot_minutes.or(Some(current.slot_minutes)),
        };

        validate_schedule_bounds(
            merged.valid_from,
            merged.valid_to,
            &merged.active_weekdays,
            merged.daily_start,
            merged.daily_end,
            merged.break_start,
            merged.break_end,
        )?;

        if let Some(minutes) = request.slot_minutes {
            if minutes <= 0 {
                return Err(SchedulingError::InvalidWindow(
                    "slot_minutes must be positive".to_string(),
                ));
            }
        }

        self.check_schedule_conflicts(
            &current.provider_id.to_string(),
            &merged,
            Some(window_id),
            auth_token,
        )
        .await?;

        // Build update object with only provided fields
        let mut update_data = serde_json::Map::new();

        if let Some(valid_from) = request.valid_from {
            update_data.insert("valid_from".to_string(), json!(valid_from));
        }
        if let Some(valid_to) = request.valid_to {
            update_data.insert("valid_to".to_string(), json!(valid_to));
        }
        if let Some(weekdays) = request.active_weekdays {
            update_data.insert("active_weekdays".to_string(), json!(weekdays));
        }
        if let Some(start) = request.daily_start {
            update_data.insert("daily_start".to_string(), json!(start.format("%H:%M:%S").to_string()));
        }
        if let Some(end) = request.daily_end {
            update_data.insert("daily_end".to_string(), json!(end.format("%H:%M:%S").to_string()));
        }
        if let Some(break_start) = request.break_start {
            update_data.insert("break_start".to_string(), json!(break_start.format("%H:%M:%S").to_string()));
        }
        if let Some(break_end) = request.break_end {
            update_data.insert("break_end".to_string(), json!(break_end.format("%H:%M:%S").to_string()));
        }
        if let Some(minutes) = request.slot_minutes {
            update_data.insert("slot_minutes".to_string(), json!(minutes));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/schedule_windows?id=eq.{}", window_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .storage
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(headers),
            )
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::Storage(
                "failed to update schedule window".to_string(),
            ));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|err| SchedulingError::Storage(err.to_string()))
    }

    /// Delete a schedule window.
    pub async fn delete_schedule_window(
        &self,
        window_id: &str,
        auth_token: &str,
    ) -> Result<(), SchedulingError> {
        debug!("Deleting schedule window: {}", window_id);

        let path = format!("/rest/v1/schedule_windows?id=eq.{}", window_id);
        let _: Vec<Value> = self
            .storage
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        Ok(())
    }

    /// List a provider's schedule windows, newest validity range first.
    pub async fn get_provider_schedule(
        &self,
        provider_id: &str,
    ) -> Result<Vec<ScheduleWindow>, SchedulingError> {
        debug!("Fetching schedule windows for provider: {}", provider_id);

        let path = format!(
            "/rest/v1/schedule_windows?provider_id=eq.{}&order=valid_from.desc,daily_start.asc",
            provider_id
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

    // Private helper methods

    async fn get_window_by_id(
        &self,
        window_id: &str,
        auth_token: &str,
    ) -> Result<ScheduleWindow, SchedulingError> {
        let path = format!("/rest/v1/schedule_windows?id=eq.{}", window_id);
        let result: Vec<Value> = self
            .storage
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        if result.is_empty() {
            return Err(SchedulingError::ScheduleNotFound(format!(
                "schedule window {} not found",
                window_id
            )));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|err| SchedulingError::Storage(err.to_string()))
    }

    async fn check_schedule_conflicts(
        &self,
        provider_id: &str,
        request: &CreateScheduleWindowRequest,
        exclude_id: Option<&str>,
        auth_token: &str,
    ) -> Result<(), SchedulingError> {
        let mut path = format!(
            "/rest/v1/schedule_windows?provider_id=eq.{}&is_active=eq.true",
            provider_id
        );

        if let Some(id) = exclude_id {
            path.push_str(&format!("&id=neq.{}", id));
        }

        let existing: Vec<Value> = self
            .storage
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|err| SchedulingError::Storage(err.to_string()))?;

        for window in existing {
            let window: ScheduleWindow = match serde_json::from_value(window) {
                Ok(window) => window,
                Err(err) => return Err(SchedulingError::Storage(err.to_string())),
            };

            let dates_overlap = request.valid_from <= window.valid_to
                && request.valid_to >= window.valid_from;
            let weekdays_overlap = window
                .active_weekdays
                .iter()
                .any(|day| request.active_weekdays.contains(day));
            let times_overlap = request.daily_start < window.daily_end
                && request.daily_end > window.daily_start;

            if dates_overlap && weekdays_overlap && times_overlap {
                return Err(SchedulingError::ScheduleConflict(format!(
                    "window overlaps existing schedule {} ({} - {})",
                    window.id, window.daily_start, window.daily_end
                )));
            }
        }

        Ok(())
    }
}
