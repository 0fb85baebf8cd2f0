use serde::{Deserialize, Deserializer};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

use crate::arbiter::{
    ArbiterSettings, DisplayMode, DEFAULT_FETCH_TIMEOUT, DEFAULT_SPORTS_TTL, DEFAULT_WEATHER_TTL,
};
use crate::feeds::DEFAULT_STALE_AFTER;
use crate::flight::DEFAULT_ENRICHMENT_CAPACITY;
use crate::geometry::{CorridorSpec, GeoPoint};
use crate::render::{LayoutSpec, ScrollProfile, ViewportSpec};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub corridor: CorridorSpec,
    #[serde(default)]
    pub mode: DisplayMode,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub display: DisplayConfig,
    pub sports: SportsConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub flight: FlightConfig,
    /// IATA code to the city name shown on the `FROM` line.
    #[serde(default)]
    pub airports: HashMap<String, String>,
    pub web: Option<WebConfig>,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval", deserialize_with = "duration")]
    pub interval: Duration,
    #[serde(default = "default_fetch_timeout", deserialize_with = "duration")]
    pub fetch_timeout: Duration,
    #[serde(default = "default_error_backoff", deserialize_with = "duration")]
    pub error_backoff: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            fetch_timeout: default_fetch_timeout(),
            error_backoff: default_error_backoff(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_sports_ttl", deserialize_with = "duration")]
    pub sports_ttl: Duration,
    #[serde(default = "default_weather_ttl", deserialize_with = "duration")]
    pub weather_ttl: Duration,
    #[serde(default = "default_enrichment_capacity")]
    pub enrichment_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sports_ttl: default_sports_ttl(),
            weather_ttl: default_weather_ttl(),
            enrichment_capacity: default_enrichment_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub width_px: i32,
    pub height_px: i32,
    #[serde(default = "default_margin")]
    pub margin_px: i32,
    #[serde(default = "default_glyph_width")]
    pub glyph_width_px: i32,
    #[serde(default)]
    pub layout: Option<LayoutSpec>,
    #[serde(default)]
    pub scroll: ScrollProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportsConfig {
    /// Abbreviation of the tracked team, e.g. `SD`.
    pub team: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherConfig {
    /// Defaults to the corridor midpoint.
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightConfig {
    /// Push sources tried in order.
    #[serde(default = "default_flight_sources")]
    pub sources: Vec<String>,
    #[serde(default = "default_stale_after", deserialize_with = "duration")]
    pub stale_after: Duration,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            sources: default_flight_sources(),
            stale_after: default_stale_after(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDisplay,
    PushFeeds,
}

fn duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_fetch_timeout() -> Duration {
    DEFAULT_FETCH_TIMEOUT
}

fn default_error_backoff() -> Duration {
    Duration::from_secs(2)
}

fn default_sports_ttl() -> Duration {
    DEFAULT_SPORTS_TTL
}

fn default_weather_ttl() -> Duration {
    DEFAULT_WEATHER_TTL
}

fn default_enrichment_capacity() -> usize {
    DEFAULT_ENRICHMENT_CAPACITY
}

fn default_margin() -> i32 {
    2
}

fn default_glyph_width() -> i32 {
    6
}

fn default_flight_sources() -> Vec<String> {
    vec!["primary".to_string()]
}

fn default_stale_after() -> Duration {
    DEFAULT_STALE_AFTER
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        for (name, p) in [("p1", &self.corridor.p1), ("p2", &self.corridor.p2)] {
            if !(-90.0..=90.0).contains(&p.lat) || !(-180.0..=180.0).contains(&p.lon) {
                return invalid(format!(
                    "corridor.{} ({}, {}) is not a coordinate",
                    name, p.lat, p.lon
                ));
            }
        }
        let c = &self.corridor;
        if !c.half_width_m.is_finite() || c.half_width_m <= 0.0 {
            return invalid(format!(
                "corridor.half_width_m must be positive, got {}",
                c.half_width_m
            ));
        }
        if c.altitude_min_ft > c.altitude_max_ft {
            return invalid(format!(
                "corridor altitude window {}..{} ft is empty",
                c.altitude_min_ft, c.altitude_max_ft
            ));
        }

        let d = &self.display;
        if d.width_px <= 2 * d.margin_px || d.margin_px < 0 {
            return invalid(format!(
                "display.width_px {} leaves no room inside margin {}",
                d.width_px, d.margin_px
            ));
        }
        if d.height_px <= 0 || d.glyph_width_px <= 0 {
            return invalid("display height and glyph width must be positive".to_string());
        }
        if let Some(row) = self.layout().rows.iter().find(|&&y| y < 0 || y > d.height_px) {
            return invalid(format!(
                "layout row {} is outside the {} px panel",
                row, d.height_px
            ));
        }

        if self.polling.interval.is_zero() {
            return invalid("polling.interval must be non-zero".to_string());
        }
        if self.flight.sources.is_empty() {
            return invalid("flight.sources must name at least one source".to_string());
        }
        if self.sports.team.trim().is_empty() {
            return invalid("sports.team must not be empty".to_string());
        }
        Ok(())
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.key == key)
    }

    pub fn weather_location(&self) -> GeoPoint {
        self.weather
            .location
            .unwrap_or_else(|| self.corridor.p1.midpoint(&self.corridor.p2))
    }

    pub fn arbiter_settings(&self) -> ArbiterSettings {
        ArbiterSettings {
            corridor: self.corridor.clone(),
            mode: self.mode,
            team: self.sports.team.trim().to_uppercase(),
            weather_location: self.weather_location(),
            sports_ttl: self.cache.sports_ttl,
            weather_ttl: self.cache.weather_ttl,
            fetch_timeout: self.polling.fetch_timeout,
            flight_timeout: self.polling.fetch_timeout * self.flight.sources.len().max(1) as u32,
            enrichment_capacity: self.cache.enrichment_capacity,
            airports: self
                .airports
                .iter()
                .map(|(code, name)| (code.trim().to_uppercase(), name.clone()))
                .collect(),
        }
    }

    pub fn viewport(&self) -> ViewportSpec {
        ViewportSpec {
            width_px: self.display.width_px,
            margin_px: self.display.margin_px,
        }
    }

    pub fn layout(&self) -> LayoutSpec {
        self.display.layout.unwrap_or_default()
    }
}
