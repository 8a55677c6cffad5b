use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_url: String,
    pub storage_anon_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            storage_url: env::var("STORAGE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORAGE_URL not set, using empty value");
                    String::new()
                }),
            storage_anon_key: env::var("STORAGE_ANON_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORAGE_ANON_KEY not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.storage_url.is_empty() && !self.storage_anon_key.is_empty()
    }
}
