use chrono_tz::Tz;
use std::{env, path::PathBuf};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/opslog.json";
const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown time zone: {0:?}")]
    UnknownTimeZone(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub timezone: Tz,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));
        let timezone = match env::var("APP_TIMEZONE") {
            Ok(name) => parse_timezone(&name)?,
            Err(_) => parse_timezone(DEFAULT_TIMEZONE)?,
        };

        Ok(Self {
            port,
            data_path,
            timezone,
        })
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimeZone(name.to_string()))
}
