//! Desk configuration.
//!
//! Loaded from YAML; every section is optional and falls back to the
//! defaults below.
//!
//! ```yaml
//! symbols: [ABC1, ABC2, DEF1, XYZ1, XYZ2]
//! limits:
//!   max_quantity: 10000
//!   max_price: "100000.00"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::types::Price;

/// Instruments recognized when no configuration is given
pub const DEFAULT_SYMBOLS: [&str; 5] = ["ABC1", "ABC2", "DEF1", "XYZ1", "XYZ2"];

/// Largest quantity a single order may carry
pub const DEFAULT_MAX_QUANTITY: u64 = 10_000;

/// Largest limit price, in whole units
pub const DEFAULT_MAX_PRICE_UNITS: u64 = 100_000;

fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

fn default_max_quantity() -> u64 {
    DEFAULT_MAX_QUANTITY
}

fn default_max_price() -> Price {
    Price::from_units(DEFAULT_MAX_PRICE_UNITS)
}

/// Order size limits applied by request validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u64,

    #[serde(default = "default_max_price")]
    pub max_price: Price,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_quantity: DEFAULT_MAX_QUANTITY,
            max_price: default_max_price(),
        }
    }
}

/// Top-level desk configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Recognized instrument symbols
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    #[serde(default)]
    pub limits: Limits,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            limits: Limits::default(),
        }
    }
}

impl DeskConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: DeskConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!(path = %path.display(), symbols = config.symbols.len(), "loaded desk config");
        Ok(config)
    }

    /// Reject configurations no order could pass
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("symbols must not be empty".into()));
        }
        if self.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("symbols must not be blank".into()));
        }
        if self.limits.max_quantity == 0 {
            return Err(ConfigError::Invalid("limits.max_quantity must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeskConfig::default();
        assert_eq!(config.symbols.len(), 5);
        assert!(config.symbols.iter().any(|s| s == "ABC1"));
        assert_eq!(config.limits.max_quantity, 10_000);
        assert_eq!(config.limits.max_price, Price::from_units(100_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_falls_back() {
        let config = DeskConfig::from_yaml_str("limits:\n  max_quantity: 500\n").unwrap();
        assert_eq!(config.limits.max_quantity, 500);
        assert_eq!(config.limits.max_price, Price::from_units(100_000));
        assert_eq!(config.symbols, default_symbols());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
symbols: [PETR1, VALE1]
limits:
  max_quantity: 100
  max_price: "250.50"
"#;
        let config = DeskConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.symbols, vec!["PETR1".to_string(), "VALE1".to_string()]);
        assert_eq!(config.limits.max_price, Price::from_cents(25_050));
    }

    #[test]
    fn test_numeric_max_price() {
        let config = DeskConfig::from_yaml_str("limits:\n  max_price: 99\n").unwrap();
        assert_eq!(config.limits.max_price, Price::from_units(99));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            DeskConfig::from_yaml_str("symbols: []\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DeskConfig::from_yaml_str("symbols: [\"  \"]\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DeskConfig::from_yaml_str("limits:\n  max_quantity: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DeskConfig::from_yaml_str("limits:\n  max_price: \"1.005\"\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DeskConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
