use crate::config::TopologyConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and validate a topology configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<TopologyConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: TopologyConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    config.validate()?;

    info!(
        "Canvas {}x{}, default communication range {}",
        config.canvas_width, config.canvas_height, config.default_communication_range
    );

    Ok(config)
}

/// Load the configuration at `config_path`, or the defaults when none is given
pub fn load_config_or_default(config_path: Option<&Path>) -> Result<TopologyConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(TopologyConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
canvas_width: 1000
canvas_height: 800
default_communication_range: 50
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.canvas_width, 1000.0);
        assert_eq!(config.canvas_height, 800.0);
        assert_eq!(config.default_communication_range, 50.0);
    }

    #[test]
    fn test_load_invalid_config() {
        let yaml = "default_communication_range: -5\n";

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Path::new("/nonexistent/toponet.yaml")).is_err());
    }

    #[test]
    fn test_default_when_absent() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config, TopologyConfig::default());
    }
}
