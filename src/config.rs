use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::simulation::FollowerConfig;
use crate::vehicle::BadgerConfig;

/// Tuning for the whole simulation, loaded from YAML.
///
/// Every field is optional; missing fields take their defaults.
///
/// ```yaml
/// follower:
///   time_to_complete: 20.0
/// badger:
///   max_speed: 80.0
///   steering:
///     turn_speed: 80.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub follower: FollowerConfig,
    pub badger: BadgerConfig,
}

impl SimulationConfig {
    /// Parses and validates a config from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_yaml_str`](Self::from_yaml_str).
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialisation fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e).into())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.follower.validate()?;
        self.badger.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::BadgerError;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SimulationConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_abs_diff_eq!(config.follower.time_to_complete, 20.0);
        assert_abs_diff_eq!(config.badger.wheel_base, 8.0);
    }

    #[test]
    fn partial_override() {
        let yaml = r"
follower:
  time_to_complete: 12.5
badger:
  max_speed: 60.0
  steering:
    turn_speed: 120.0
";
        let config = SimulationConfig::from_yaml_str(yaml).unwrap();
        assert_abs_diff_eq!(config.follower.time_to_complete, 12.5);
        assert_abs_diff_eq!(config.badger.max_speed, 60.0);
        assert_abs_diff_eq!(config.badger.acceleration, 15.0);
        assert_abs_diff_eq!(config.badger.steering.turn_speed, 120.0);
        assert_abs_diff_eq!(config.badger.steering.tolerance, 0.0125);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SimulationConfig::from_yaml_str("follower:\n  time_to_complete: -1.0\n").unwrap_err();
        assert!(matches!(err, BadgerError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = SimulationConfig::from_yaml_str("badger: [1, 2").unwrap_err();
        assert!(matches!(err, BadgerError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = SimulationConfig::from_yaml_file("no/such/config.yaml").unwrap_err();
        assert!(matches!(err, BadgerError::Config(ConfigError::Io { .. })));
    }

    #[test]
    fn yaml_string_parses_back() {
        let mut config = SimulationConfig::default();
        config.badger.spawn_position = [1.0, 2.0, 3.0];
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(SimulationConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
