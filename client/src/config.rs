use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub endpoint: String,
    pub debounce: Duration,
    pub timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            endpoint: try_load::<String>("QKART_ENDPOINT", "http://localhost:8082/api/v1")?
                .trim_end_matches('/')
                .to_string(),
            debounce: Duration::from_millis(try_load("QKART_DEBOUNCE_MS", "500")?),
            timeout: Duration::from_millis(try_load("QKART_TIMEOUT_MS", "5000")?),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Config(format!("{key}: {e}"))
        })
}
