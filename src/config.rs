/// Startup configuration, loaded once from a JSON file. A missing file means
/// defaults; a file that exists but does not parse is a hard error, since
/// silently ignoring a typo'd interval would be worse.

use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// When false, neither the sensor feed nor the scheduler starts.
    pub enabled: bool,
    /// Reporting interval in milliseconds.
    pub interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 1000,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabled_at_one_second() {
        let c = Config::default();
        assert!(c.enabled);
        assert_eq!(c.interval_ms, 1000);
    }

    #[test]
    fn parses_partial_config() {
        let c: Config = serde_json::from_str(r#"{"interval_ms": 250}"#).unwrap();
        assert_eq!(c, Config { enabled: true, interval_ms: 250 });
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(serde_json::from_str::<Config>(r#"{"intervalMs": 250}"#).is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let c = Config::load(Path::new("/nonexistent/jolt.json")).unwrap();
        assert_eq!(c, Config::default());
    }
}
