//! Topology configuration.
//!
//! Controls the canvas used to place nodes added without coordinates, the
//! range given to nodes the topology creates itself, and the placement seed.

use serde::{Deserialize, Serialize};

/// Default width of the random placement canvas
pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;
/// Default height of the random placement canvas
pub const DEFAULT_CANVAS_HEIGHT: f64 = 400.0;

/// Topology settings, loadable from YAML
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TopologyConfig {
    /// Width of the area used when a node is added without an x coordinate
    pub canvas_width: f64,
    /// Height of the area used when a node is added without a y coordinate
    pub canvas_height: f64,
    /// Range given to nodes the topology creates itself (imports, `create_node`)
    pub default_communication_range: f64,
    /// Seed for random placement; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl TopologyConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("canvas_width", self.canvas_width), ("canvas_height", self.canvas_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidCanvas(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.default_communication_range.is_finite() || self.default_communication_range < 0.0 {
            return Err(ConfigError::InvalidRange(format!(
                "default_communication_range must be non-negative, got {}",
                self.default_communication_range
            )));
        }

        Ok(())
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            default_communication_range: 0.0,
            seed: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid canvas configuration: {0}")]
    InvalidCanvas(String),
    #[error("Invalid communication range: {0}")]
    InvalidRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TopologyConfig::default();
        assert_eq!(config.canvas_width, 600.0);
        assert_eq!(config.canvas_height, 400.0);
        assert_eq!(config.default_communication_range, 0.0);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
default_communication_range: 25.5
seed: 7
"#;
        let config: TopologyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.default_communication_range, 25.5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.canvas_width, DEFAULT_CANVAS_WIDTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let config = TopologyConfig {
            canvas_width: 0.0,
            ..TopologyConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCanvas(_))));

        let config = TopologyConfig {
            default_communication_range: -1.0,
            ..TopologyConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));

        let config = TopologyConfig {
            canvas_height: f64::NAN,
            ..TopologyConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
