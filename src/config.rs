//! Runtime configuration, read from the environment (and `.env`).

use anyhow::{Context, Result, anyhow};
use std::time::Duration;

use crate::paging::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

pub const ENV_BASE_URL: &str = "FLEET_API_BASE_URL";
pub const ENV_TOKEN: &str = "FLEET_API_TOKEN";
pub const ENV_PAGE_SIZE: &str = "FLEET_PAGE_SIZE";
pub const ENV_TIMEOUT: &str = "FLEET_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Versioned API root, e.g. `https://api.example.com/api/v1`.
    pub base_url: String,
    pub token: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };

        let base_url = required(ENV_BASE_URL)?;
        let token = required(ENV_TOKEN)?;

        let page_size = match lookup(ENV_PAGE_SIZE) {
            Some(raw) => {
                let size: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{ENV_PAGE_SIZE} is not a number: {raw}"))?;
                if !PAGE_SIZE_OPTIONS.contains(&size) {
                    return Err(anyhow!(
                        "{ENV_PAGE_SIZE} must be one of {PAGE_SIZE_OPTIONS:?}, got {size}"
                    ));
                }
                size
            }
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout = match lookup(ENV_TIMEOUT) {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("{ENV_TIMEOUT} is not a number: {raw}"))?,
            ),
            None => Duration::from_secs(30),
        };

        Ok(Self {
            base_url,
            token,
            page_size,
            timeout,
        })
    }
}
