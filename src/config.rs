use crate::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://dataset-lol-server-production.up.railway.app/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("LOL_DASHBOARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match env::var("LOL_DASHBOARD_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!(
                    "LOL_DASHBOARD_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(api_base_url, Duration::from_secs(timeout_secs))
    }

    pub fn new(api_base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        if url::Url::parse(&api_base_url).is_err() {
            return Err(AppError::Config(format!(
                "invalid gateway URL: {}",
                api_base_url
            )));
        }
        Ok(Config {
            api_base_url,
            timeout,
        })
    }

    pub fn with_api_url(self, api_base_url: String) -> Result<Self, AppError> {
        Self::new(api_base_url, self.timeout)
    }
}
