//! Application settings read from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Command-line flags are applied on top with
//! [`AppConfig::apply_overrides`].
//!
//! ```toml
//! log_level = "debug"
//! export_dir = "contracts"
//! platform_fee_percentage = "5.0"
//!
//! [database]
//! backend = "sqlite"
//! connection_string = "flatswaps.db"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swap_core::db::DbConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    /// Where exported contracts are written.
    pub export_dir: PathBuf,
    /// Checklist progress and the signed-in user between runs.
    pub state_file: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    /// Overrides the default fee when a contract does not set one.
    pub platform_fee_percentage: Option<Decimal>,
    /// Latency added to every simulated auth call.
    pub simulated_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DbConfig {
                backend: "sqlite".to_string(),
                connection_string: "flatswaps.db".to_string(),
            },
            export_dir: PathBuf::from("exports"),
            state_file: PathBuf::from("flatswaps-state.json"),
            log_file: None,
            log_level: "info".to_string(),
            platform_fee_percentage: None,
            simulated_delay_ms: 0,
        }
    }
}

/// Flag values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub db: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn apply_overrides(
        mut self,
        overrides: ConfigOverrides,
    ) -> Self {
        if let Some(backend) = overrides.backend {
            self.database.backend = backend;
        }
        if let Some(db) = overrides.db {
            self.database.connection_string = db;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            platform_fee_percentage = "5.0"

            [database]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.platform_fee_percentage, Some(dec!(5.0)));
        assert_eq!(config.database.backend, "memory");
        assert_eq!(config.database.connection_string, ":memory:");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn flags_override_file_values() {
        let config = AppConfig::default().apply_overrides(ConfigOverrides {
            backend: Some("memory".to_string()),
            db: None,
            log_level: Some("debug".to_string()),
        });

        assert_eq!(config.database.backend, "memory");
        assert_eq!(config.database.connection_string, "flatswaps.db");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(AppConfig::from_toml("simulated_delay_ms = \"slow\"").is_err());
    }
}
