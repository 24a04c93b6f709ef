//! Engine configuration
//!
//! Defaults match the fixed neighborhood constants; a TOML file can
//! override any of them.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::registry::GeoPoint;

/// Fallback search center used until geocoding succeeds.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 38.790_733_9,
    lng: -121.235_782_8,
};

/// The address geocoded at startup to recenter the surface.
pub const DEFAULT_ADDRESS: &str = "Rocklin, CA";

/// Nearby-search radius in meters.
pub const DEFAULT_RADIUS_M: u32 = 8000;

/// Per-category result cap; later results are discarded, not queued.
pub const DEFAULT_RESULT_CAP: usize = 5;

/// Bounce animation length in milliseconds.
pub const DEFAULT_BOUNCE_MS: u64 = 1400;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search center until geocoding succeeds.
    pub base_center: GeoPoint,
    /// Address geocoded at startup.
    pub base_address: String,
    /// Nearby-search radius in meters.
    pub radius_m: u32,
    /// Most results kept per category.
    pub result_cap: usize,
    /// Bounce animation length in milliseconds.
    pub bounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_center: DEFAULT_CENTER,
            base_address: DEFAULT_ADDRESS.to_string(),
            radius_m: DEFAULT_RADIUS_M,
            result_cap: DEFAULT_RESULT_CAP,
            bounce_ms: DEFAULT_BOUNCE_MS,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file, filling omitted fields with defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// The bounce length as a duration.
    pub fn bounce(&self) -> Duration {
        Duration::from_millis(self.bounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_neighborhood_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.base_address, "Rocklin, CA");
        assert_eq!(config.base_center.lat, 38.790_733_9);
        assert_eq!(config.radius_m, 8000);
        assert_eq!(config.result_cap, 5);
        assert_eq!(config.bounce(), Duration::from_millis(1400));
    }

    #[test]
    fn toml_overrides_apply_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_address = \"Roseville, CA\"\nradius_m = 4000\n\n[base_center]\nlat = 38.75\nlng = -121.28"
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.base_address, "Roseville, CA");
        assert_eq!(config.radius_m, 4000);
        assert_eq!(config.base_center.lat, 38.75);
        // Untouched fields keep their defaults.
        assert_eq!(config.result_cap, DEFAULT_RESULT_CAP);
        assert_eq!(config.bounce_ms, DEFAULT_BOUNCE_MS);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "radius_m = \"not a number\"").unwrap();
        assert!(matches!(
            EngineConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
