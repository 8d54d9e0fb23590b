//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the trip-planner.toml
//! file. It provides a centralized way to configure the routing provider and the
//! offline estimation used when the provider is unreachable.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "trip-planner.toml";

/// Environment variable that overrides `routing.api_key`
pub const API_KEY_ENV: &str = "GRAPHHOPPER_API_KEY";

/// Application configuration loaded from trip-planner.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Routing and geocoding provider
    pub routing: RoutingConfig,
    /// Offline estimation settings
    pub planner: PlannerConfig,
}

/// GraphHopper routing and geocoding configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoutingConfig {
    /// API root, e.g. "https://graphhopper.com/api/1"
    pub base_url: String,
    /// API key; empty means the provider is not used
    pub api_key: String,
    /// Vehicle profile passed to the route endpoint
    pub profile: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Settings for the deterministic fallback estimates
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlannerConfig {
    /// Average speed used to turn great-circle miles into driving hours
    pub fallback_average_mph: f64,
    /// Centre of the area approximate locations are scattered around
    pub anchor_lat: f64,
    pub anchor_lon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            routing: RoutingConfig {
                base_url: "https://graphhopper.com/api/1".to_string(),
                api_key: String::new(),
                profile: "car".to_string(),
                timeout_secs: 20,
            },
            planner: PlannerConfig {
                fallback_average_mph: 55.0,
                anchor_lat: 40.7128, // New York, NY
                anchor_lon: -74.006,
            },
        }
    }
}

impl Config {
    /// Load configuration from trip-planner.toml, then apply environment overrides.
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE).with_env_overrides()
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format in {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file found at {}, using default configuration",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Replace the API key with `GRAPHHOPPER_API_KEY` when it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.routing.api_key = key;
            }
        }
        self
    }

    /// Save configuration to the given path as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.routing.base_url, "https://graphhopper.com/api/1");
        assert_eq!(config.routing.profile, "car");
        assert!(config.routing.api_key.is_empty());
        assert_eq!(config.planner.fallback_average_mph, 55.0);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.routing.profile = "truck".to_string();
        config.planner.fallback_average_mph = 50.0;

        config.save_to_path(file.path()).unwrap();
        let loaded = Config::load_from_path(file.path());
        assert_eq!(loaded.routing.profile, "truck");
        assert_eq!(loaded.planner.fallback_average_mph, 50.0);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "routing = 12").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }
}
