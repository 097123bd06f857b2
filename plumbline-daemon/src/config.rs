//! Configuration loading
//!
//! The tracker is configured from a TOML file deserialized straight into
//! the core config types. Without a path the copy of `plumbline.toml`
//! compiled into the binary is used.

use std::env;
use std::fs;
use std::path::Path;

use plumbline_core::config::PlumblineConfig;

use crate::error::{Error, Result};

/// Embedded default configuration (compiled into the binary)
pub const EMBEDDED_CONFIG: &str = include_str!("../plumbline.toml");

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    Embedded,
}

/// Find the config path on the command line
///
/// Supports `plumbline <path>`, `plumbline --config <path>` and
/// `plumbline -c <path>`.
pub fn parse_config_path<I>(args: I) -> ConfigSource
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().skip(1).collect();

    if let Some(i) = args.iter().position(|a| a == "--config" || a == "-c") {
        if let Some(path) = args.get(i + 1) {
            return ConfigSource::File(path.clone());
        }
    }

    match args.first() {
        Some(path) if !path.starts_with('-') => ConfigSource::File(path.clone()),
        _ => ConfigSource::Embedded,
    }
}

/// Config source from the process arguments
pub fn source_from_args() -> ConfigSource {
    parse_config_path(env::args())
}

/// Parse and validate TOML text
pub fn parse_config(text: &str) -> Result<PlumblineConfig> {
    let config: PlumblineConfig = toml::from_str(text)?;
    config
        .validate()
        .map_err(|e| Error::Config(e.to_string()))?;
    Ok(config)
}

/// Load a configuration file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PlumblineConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Load from `source`
pub fn load(source: &ConfigSource) -> Result<PlumblineConfig> {
    match source {
        ConfigSource::File(path) => from_file(path),
        ConfigSource::Embedded => parse_config(EMBEDDED_CONFIG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumbline_core::range::AccelRange;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_path_forms() {
        assert_eq!(
            parse_config_path(args(&["plumbline", "rig.toml"])),
            ConfigSource::File("rig.toml".into())
        );
        assert_eq!(
            parse_config_path(args(&["plumbline", "--config", "a.toml"])),
            ConfigSource::File("a.toml".into())
        );
        assert_eq!(
            parse_config_path(args(&["plumbline", "-v", "-c", "b.toml"])),
            ConfigSource::File("b.toml".into())
        );
        assert_eq!(parse_config_path(args(&["plumbline"])), ConfigSource::Embedded);
        assert_eq!(
            parse_config_path(args(&["plumbline", "--config"])),
            ConfigSource::Embedded
        );
    }

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = load(&ConfigSource::Embedded).unwrap();
        assert_eq!(config, PlumblineConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            [sensor]
            accel_range = "8g"

            [actuator]
            host = "pi.local"
            jog_step = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.sensor.accel_range, AccelRange::G8);
        assert_eq!(config.sensor.address, 0x68);
        assert_eq!(config.actuator.host.as_str(), "pi.local");
        assert_eq!(config.actuator.port, 8888);
        assert_eq!(config.actuator.jog_step(), 50);
        assert_eq!(config.tracking.max_iterations, 300);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = parse_config("[actuator]\nmin_pulse = 1900\nmax_pulse = 500\n");
        assert!(matches!(result, Err(Error::Config(_))));

        let result = parse_config("[sensor]\naccel_range = \"3g\"\n");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_zero_read_timeout_rejected() {
        let result = parse_config("[actuator]\nread_timeout_ms = 0\n");
        match result {
            Err(Error::Config(message)) => assert_eq!(
                message,
                "connect_timeout_ms and read_timeout_ms must be non-zero"
            ),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = from_file("/nonexistent/plumbline.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
