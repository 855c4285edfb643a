use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use crate::device::DEFAULT_CONTROL_PORT;
use crate::lighting::Palette;
use crate::weather::Thresholds;

/// Environment variables overriding the weather API credentials.
pub const CLIENT_ID_ENV: &str = "METOFFICE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "METOFFICE_CLIENT_SECRET";

/// Met Office DataHub access and forecast location
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API root, without the `/forecasts/...` path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = if self.client_secret.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &secret)
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api-metoffice.apiconnect.ibmcloud.com/metoffice/production/v0".to_string()
}

fn default_latitude() -> f64 {
    51.485741
}

fn default_longitude() -> f64 {
    0.027864
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: String::new(),
            client_secret: String::new(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timeout_secs: default_request_timeout(),
        }
    }
}

/// How the day is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    /// How long a pattern plays, in seconds
    #[serde(default = "default_hold_duration")]
    pub hold_duration_secs: u32,
    #[serde(default)]
    pub palette: Palette,
}

fn default_hold_duration() -> u32 {
    60
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            hold_duration_secs: default_hold_duration(),
            palette: Palette::default(),
        }
    }
}

/// Device discovery and per-device limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicesConfig {
    /// How long to collect discovery replies, in seconds
    #[serde(default = "default_discovery_timeout")]
    pub discovery_timeout_secs: u64,
    /// Upper bound for one device's power-on + flow, in seconds
    #[serde(default = "default_device_timeout")]
    pub timeout_secs: u64,
    /// Fixed addresses (`ip` or `ip:port`); disables discovery when non-empty
    #[serde(default, rename = "static")]
    pub static_addresses: Vec<String>,
}

fn default_discovery_timeout() -> u64 {
    2
}

fn default_device_timeout() -> u64 {
    10
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            discovery_timeout_secs: default_discovery_timeout(),
            timeout_secs: default_device_timeout(),
            static_addresses: Vec::new(),
        }
    }
}

impl DevicesConfig {
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the static address list, defaulting the port.
    pub fn static_devices(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.static_addresses
            .iter()
            .map(|entry| parse_device_address(entry))
            .collect()
    }
}

fn parse_device_address(entry: &str) -> Result<SocketAddr, ConfigError> {
    if let Ok(address) = entry.parse::<SocketAddr>() {
        return Ok(address);
    }
    entry
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_CONTROL_PORT))
        .map_err(|_| ConfigError::ValidationError(format!("invalid device address '{}'", entry)))
}

/// Repeat mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between runs; a single run when unset
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::parse(&contents)
    }

    /// Load configuration from a file, or use defaults if it doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("Config file not found, using defaults: {}", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override credentials from `METOFFICE_CLIENT_ID` / `METOFFICE_CLIENT_SECRET`
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(CLIENT_ID_ENV).ok(),
            std::env::var(CLIENT_SECRET_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, client_id: Option<String>, client_secret: Option<String>) {
        if let Some(id) = client_id.filter(|v| !v.is_empty()) {
            self.weather.client_id = id;
        }
        if let Some(secret) = client_secret.filter(|v| !v.is_empty()) {
            self.weather.client_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        for (name, value) in [
            ("precipitation", t.precipitation),
            ("heavy_rain", t.heavy_rain),
            ("heavy_snow", t.heavy_snow),
        ] {
            if value > 100 {
                return Err(ConfigError::ValidationError(format!(
                    "threshold {} must be at most 100, got {}",
                    name, value
                )));
            }
        }

        if self.lighting.hold_duration_secs == 0 {
            return Err(ConfigError::ValidationError(
                "lighting.hold_duration_secs must be at least 1".to_string(),
            ));
        }
        self.lighting
            .palette
            .validate()
            .map_err(ConfigError::ValidationError)?;

        if !(-90.0..=90.0).contains(&self.weather.latitude)
            || !(-180.0..=180.0).contains(&self.weather.longitude)
        {
            return Err(ConfigError::ValidationError(format!(
                "invalid coordinates ({}, {})",
                self.weather.latitude, self.weather.longitude
            )));
        }

        if self.devices.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "devices.timeout_secs must be at least 1".to_string(),
            ));
        }
        self.devices.static_devices()?;

        if self.schedule.interval_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "schedule.interval_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
