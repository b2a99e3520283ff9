use crate::classify::ThresholdScheme;
use crate::errors::ConfigError;
use crate::window::{SeriesOrder, WindowSettings, DEFAULT_MAX_DISPLAY, DEFAULT_MAX_FETCH};
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/readings.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub scheme: ThresholdScheme,
    pub window: WindowSettings,
    pub premium: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            scheme: ThresholdScheme::default(),
            window: WindowSettings::default(),
            premium: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // unparsable ports fall back to the default
        if let Some(port) = lookup("PORT").and_then(|value| value.parse::<u16>().ok()) {
            config.port = port;
        }
        if let Some(path) = lookup("APP_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("GLUCOSE_SCHEME") {
            config.scheme = ThresholdScheme::parse(&raw).ok_or(ConfigError {
                key: "GLUCOSE_SCHEME",
                value: raw,
            })?;
        }
        if let Some(raw) = lookup("SERIES_ORDER") {
            config.window.order = SeriesOrder::parse(&raw).ok_or(ConfigError {
                key: "SERIES_ORDER",
                value: raw,
            })?;
        }
        config.window.max_fetch = parse_count(&lookup, "SERIES_MAX_FETCH", DEFAULT_MAX_FETCH)?;
        config.window.max_display = parse_count(&lookup, "SERIES_MAX_DISPLAY", DEFAULT_MAX_DISPLAY)?;
        if let Some(raw) = lookup("PREMIUM_UNLOCKED") {
            config.premium = parse_flag(&raw).ok_or(ConfigError {
                key: "PREMIUM_UNLOCKED",
                value: raw,
            })?;
        }

        Ok(config)
    }
}

fn parse_count(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(ConfigError { key, value: raw }),
        },
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
