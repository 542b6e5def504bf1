//! Dispatch configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with VERBATIM_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! A [`BraketConfig`] is a plain value. It is built once and passed by
//! reference into every planning call; the `with_*` builders return a
//! modified copy.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use verbatim_compile::DeviceFamily;

/// How the verbatim translator is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// Match the device identifier against the known families.
    #[default]
    Auto,
    /// Always use this family's translator and enforce hardware limits.
    Force(DeviceFamily),
}

/// Settings for planning and dispatching circuits to Braket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraketConfig {
    /// Device ARN, friendly name, or local simulator name.
    #[serde(default = "default_device")]
    pub device: String,

    /// Translate to native gates and submit as a verbatim box.
    #[serde(default)]
    pub verbatim_mode: bool,

    /// Submit multi-circuit programs as one batch.
    #[serde(default)]
    pub batch_mode: bool,

    /// Allow cost-incurring hardware devices.
    #[serde(default)]
    pub allow_hardware: bool,

    /// Shot limit enforced on hardware targets.
    #[serde(default = "default_max_shots")]
    pub max_shots: usize,

    /// Circuit length limit enforced on hardware targets.
    #[serde(default = "default_max_circuit_length")]
    pub max_circuit_length: usize,

    #[serde(default)]
    pub translation: TranslationMode,
}

fn default_device() -> String {
    "braket_sv".to_string()
}

fn default_max_shots() -> usize {
    100
}

fn default_max_circuit_length() -> usize {
    100
}

impl Default for BraketConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            verbatim_mode: false,
            batch_mode: false,
            allow_hardware: false,
            max_shots: default_max_shots(),
            max_circuit_length: default_max_circuit_length(),
            translation: TranslationMode::Auto,
        }
    }
}

impl BraketConfig {
    /// Configuration targeting `device` with every other value at its default.
    pub fn for_device(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: BraketConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        BraketConfig::default().merge_env()
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            BraketConfig::default()
        };

        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set override the current values. A set
    /// variable that does not parse is an error rather than being ignored.
    pub fn merge_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var("VERBATIM_DEVICE") {
            self.device = v;
        }
        if let Some(v) = env_parse("VERBATIM_VERBATIM_MODE")? {
            self.verbatim_mode = v;
        }
        if let Some(v) = env_parse("VERBATIM_BATCH_MODE")? {
            self.batch_mode = v;
        }
        if let Some(v) = env_parse("VERBATIM_ALLOW_HARDWARE")? {
            self.allow_hardware = v;
        }
        if let Some(v) = env_parse("VERBATIM_MAX_SHOTS")? {
            self.max_shots = v;
        }
        if let Some(v) = env_parse("VERBATIM_MAX_CIRCUIT_LENGTH")? {
            self.max_circuit_length = v;
        }
        if let Ok(v) = std::env::var("VERBATIM_FORCE_FAMILY") {
            self.translation = match v.as_str() {
                "" | "auto" => TranslationMode::Auto,
                family => TranslationMode::Force(
                    family.parse().map_err(ConfigError::ValidationError)?,
                ),
            };
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "device must not be empty".to_string(),
            ));
        }
        if self.max_shots == 0 {
            return Err(ConfigError::ValidationError(
                "max_shots must be greater than 0".to_string(),
            ));
        }
        if self.max_circuit_length == 0 {
            return Err(ConfigError::ValidationError(
                "max_circuit_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_verbatim_mode(mut self, verbatim_mode: bool) -> Self {
        self.verbatim_mode = verbatim_mode;
        self
    }

    pub fn with_batch_mode(mut self, batch_mode: bool) -> Self {
        self.batch_mode = batch_mode;
        self
    }

    pub fn with_allow_hardware(mut self, allow_hardware: bool) -> Self {
        self.allow_hardware = allow_hardware;
        self
    }

    pub fn with_max_shots(mut self, max_shots: usize) -> Self {
        self.max_shots = max_shots;
        self
    }

    pub fn with_max_circuit_length(mut self, max_circuit_length: usize) -> Self {
        self.max_circuit_length = max_circuit_length;
        self
    }

    /// Force a family's translator. Implies verbatim mode.
    pub fn with_forced_family(mut self, family: DeviceFamily) -> Self {
        self.translation = TranslationMode::Force(family);
        self.verbatim_mode = true;
        self
    }

    /// Whether shot and length limits apply.
    pub fn enforces_limits(&self) -> bool {
        self.allow_hardware || matches!(self.translation, TranslationMode::Force(_))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::ValidationError(format!("{name}: cannot parse '{raw}'"))),
        Err(_) => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BraketConfig::default();
        assert_eq!(config.device, "braket_sv");
        assert_eq!(config.max_shots, 100);
        assert_eq!(config.max_circuit_length, 100);
        assert!(!config.verbatim_mode);
        assert!(!config.enforces_limits());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_forced_family_enforces_limits() {
        let config = BraketConfig::default().with_forced_family(DeviceFamily::Oqc);
        assert!(config.verbatim_mode);
        assert!(config.enforces_limits());
        assert!(BraketConfig::default().with_allow_hardware(true).enforces_limits());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        assert!(BraketConfig::default().with_max_shots(0).validate().is_err());
        assert!(
            BraketConfig::default()
                .with_max_circuit_length(0)
                .validate()
                .is_err()
        );
        assert!(BraketConfig::for_device(" ").validate().is_err());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "device: ionq\nverbatim_mode: true\nmax_shots: 500\ntranslation: auto"
        )
        .unwrap();

        let config = BraketConfig::from_file(file.path()).unwrap();
        assert_eq!(config.device, "ionq");
        assert!(config.verbatim_mode);
        assert_eq!(config.max_shots, 500);
        assert_eq!(config.max_circuit_length, 100);
        assert_eq!(config.translation, TranslationMode::Auto);
    }

    #[test]
    fn test_forced_family_serializes() {
        let config = BraketConfig::default().with_forced_family(DeviceFamily::Iqm);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""translation":{"force":"iqm"}"#));
        let back: BraketConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_shots: 0").unwrap();
        assert!(matches!(
            BraketConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            BraketConfig::from_file("/nonexistent/verbatim.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }
}
