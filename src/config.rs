use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout unless one is configured.
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url =
            env::var("COURSE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = match env::var("COURSE_API_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::Config(format!("COURSE_API_TIMEOUT_SECS is not a number: {}", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self { base_url, timeout })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
