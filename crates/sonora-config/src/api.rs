use std::env;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, endpoints are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Generation can take a while on CPU backends
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    pub(crate) fn apply_env(&mut self) {
        if let Ok(url) = env::var("SONORA_API_URL") {
            self.base_url = url;
        }
        if let Some(timeout) = env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_seconds = timeout;
        }
    }
}
