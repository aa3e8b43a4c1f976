// src/config.rs
use crate::groq_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_PROGRESS_FILE: &str = "learnmate-progress.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Server settings, read from the process environment (after `.env` has been loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    pub groq_model: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_value = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        Ok(Self {
            groq_api_key: lookup("GROQ_API_KEY").filter(|key| !key.is_empty()),
            groq_api_url: lookup("GROQ_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            groq_model: lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            bind_addr,
        })
    }
}

/// Terminal client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub progress_file: PathBuf,
    pub export_dir: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server_url: lookup("LEARNMATE_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            progress_file: lookup("LEARNMATE_PROGRESS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRESS_FILE)),
            export_dir: lookup("LEARNMATE_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.groq_api_key.is_none());
        assert_eq!(config.groq_api_url, DEFAULT_BASE_URL);
        assert_eq!(config.groq_model, "llama3-8b-8192");
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "")])).unwrap();
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("GROQ_MODEL", "llama-3.1-8b-instant"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.groq_model, "llama-3.1-8b-instant");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_bad_bind_addr() {
        let err = Config::from_lookup(lookup_from(&[("BIND_ADDR", "not-an-addr")])).unwrap_err();
        assert!(err.to_string().contains("not-an-addr"));
    }

    #[test]
    fn test_client_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.progress_file, PathBuf::from(DEFAULT_PROGRESS_FILE));
    }
}
