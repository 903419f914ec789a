// Copyright @yucwang 2026

use crate::math::constants::Float;

use std::collections::HashMap;
use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    MissingKey(String),
    Parse { key: String, value: String },
    NonFinite { key: String, value: Float },
    UnknownSampler(String),
    InvalidValue { key: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingKey(key) => write!(f, "missing required config key: {}", key),
            ConfigError::Parse { key, value } => {
                write!(f, "failed to parse config key {} from value '{}'", key, value)
            }
            ConfigError::NonFinite { key, value } => {
                write!(f, "config key {} has non-finite value {}", key, value)
            }
            ConfigError::UnknownSampler(name) => write!(f, "unknown sampler: {}", name),
            ConfigError::InvalidValue { key, reason } => {
                write!(f, "invalid value for config key {}: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Flat key/value renderer configuration. All values are stored as
/// strings and parsed on access, with per-key defaults.
#[derive(Debug, Default, Clone)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    pub fn set<V: ToString>(&mut self, key: &str, value: V) -> &mut Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.values.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(raw) => match raw.as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConfigError::Parse { key: key.to_string(), value: raw.clone() }),
            },
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ConfigError::Parse { key: key.to_string(), value: raw.clone() }),
        }
    }

    pub fn get_real(&self, key: &str, default: Float) -> Result<Float, ConfigError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(raw) => {
                let value = raw
                    .parse::<Float>()
                    .map_err(|_| ConfigError::Parse { key: key.to_string(), value: raw.clone() })?;
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite { key: key.to_string(), value });
                }
                Ok(value)
            }
        }
    }

    pub fn get_real_required(&self, key: &str) -> Result<Float, ConfigError> {
        if !self.contains(key) {
            return Err(ConfigError::MissingKey(key.to_string()));
        }
        self.get_real(key, 0.0)
    }
}
