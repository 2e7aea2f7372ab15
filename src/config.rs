use std::time::Duration;

use reqwest::Url;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const KEYRING_SERVICE: &str = "moodify-admin";
const KEYRING_USER: &str = "api-token";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout: Duration::from_secs(30),
            page_size: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if config.api_token.is_none() {
            config.api_token = keyring_token();
        }
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("MOODIFY_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_base_url);
        Url::parse(&api_base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(api_base_url.clone(), e.to_string()))?;

        let api_token = lookup("MOODIFY_API_TOKEN").filter(|v| !v.trim().is_empty());

        let request_timeout = match lookup("MOODIFY_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("MOODIFY_REQUEST_TIMEOUT_SECS", &v)?),
            None => defaults.request_timeout,
        };

        let page_size = match lookup("MOODIFY_PAGE_SIZE") {
            Some(v) => parse_number("MOODIFY_PAGE_SIZE", &v)?,
            None => defaults.page_size,
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_token,
            request_timeout,
            page_size,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string()))
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
fn keyring_token() -> Option<String> {
    match keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).and_then(|e| e.get_password()) {
        Ok(token) => Some(token),
        Err(e) => {
            debug!("No API token in keyring: {}", e);
            None
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn keyring_token() -> Option<String> {
    debug!(
        "Keyring not supported on this platform, skipping {}/{}",
        KEYRING_SERVICE, KEYRING_USER
    );
    None
}
