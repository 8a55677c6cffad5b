use std::sync::Arc;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub storage_url: String,
    pub storage_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            storage_url: "http://localhost:54321".to_string(),
            storage_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            storage_url: self.storage_url.clone(),
            storage_anon_key: self.storage_anon_key.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockStorageResponses;

impl MockStorageResponses {
    pub fn provider_response(provider_id: &str, full_name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": provider_id,
            "full_name": full_name,
            "specialty": specialty,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn schedule_window_response(provider_id: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "provider_id": provider_id,
            "valid_from": "2025-01-01",
            "valid_to": "2025-12-31",
            "active_weekdays": [1, 2, 3, 4, 5],
            "daily_start": "09:00:00",
            "daily_end": "17:00:00",
            "break_start": "12:00:00",
            "break_end": "13:00:00",
            "slot_minutes": 30,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn booking_response(provider_id: &str, date: &str, start: &str, end: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "provider_id": provider_id,
            "patient_id": Uuid::new_v4(),
            "booking_date": date,
            "start_time": start,
            "end_time": end,
            "status": "confirmed",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
