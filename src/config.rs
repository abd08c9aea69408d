// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::form::NumericPolicy;
use crate::list_view::CardSettings;
use crate::sessions::DEFAULT_SESSION_IDLE;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Nieprawidłowa wartość zmiennej {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Konfiguracja panelu wczytywana ze zmiennych środowiskowych.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    pub static_dir: String,
    pub numeric_policy: NumericPolicy,
    pub card_settings: CardSettings,
    pub session_idle: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Wczytuje konfigurację z dowolnego źródła klucz -> wartość.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if Url::parse(&api_base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "API_URL",
                value: api_base_url,
            });
        }

        let bind_addr = parse_or_default(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let numeric_policy = match lookup("CATALOG_NUMERIC_POLICY") {
            Some(value) => {
                NumericPolicy::from_str(value.trim()).map_err(|_| ConfigError::InvalidValue {
                    key: "CATALOG_NUMERIC_POLICY",
                    value,
                })?
            }
            None => NumericPolicy::default(),
        };

        let defaults = CardSettings::default();
        let card_settings = CardSettings {
            low_stock_threshold: parse_or_default(
                &lookup,
                "LOW_STOCK_THRESHOLD",
                &defaults.low_stock_threshold.to_string(),
            )?,
            excerpt_chars: parse_or_default(
                &lookup,
                "DESCRIPTION_EXCERPT_CHARS",
                &defaults.excerpt_chars.to_string(),
            )?,
        };

        let session_idle_minutes: u64 = parse_or_default(
            &lookup,
            "SESSION_IDLE_MINUTES",
            &(DEFAULT_SESSION_IDLE.as_secs() / 60).to_string(),
        )?;

        Ok(AppConfig {
            api_base_url,
            bind_addr,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            numeric_policy,
            card_settings,
            session_idle: Duration::from_secs(session_idle_minutes.saturating_mul(60)),
        })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}
