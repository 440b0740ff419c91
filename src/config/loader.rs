//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! settings from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::calculation::state_rate;
use crate::error::{EngineError, EngineResult};

use super::types::{PayrollSettings, StateRatesConfig};

/// Loads and provides access to payroll settings.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml     # Rates, wage bases and wage-base mode
/// └── state_rates.yaml  # Optional state income tax overrides
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Federal rate: {}", loader.settings().federal_income_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: PayrollSettings,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `settings.yaml` is missing or if either file
    /// contains invalid YAML. A missing `state_rates.yaml` keeps the
    /// built-in table.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let mut settings = Self::load_yaml::<PayrollSettings>(&path.join("settings.yaml"))?;

        let overrides_path = path.join("state_rates.yaml");
        if overrides_path.exists() {
            let overrides = Self::load_yaml::<StateRatesConfig>(&overrides_path)?;
            settings.merge_state_rates(overrides.state_rates);
        }

        info!(
            path = %path.display(),
            states = settings.state_rates.len(),
            wage_base_mode = ?settings.wage_base_mode,
            "Loaded payroll settings"
        );

        Ok(Self { settings })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Consumes the loader, returning the settings.
    pub fn into_settings(self) -> PayrollSettings {
        self.settings
    }

    /// Gets the flat income tax rate for a state, zero when unknown.
    pub fn get_state_rate(&self, state: &str) -> Decimal {
        state_rate(&self.settings.state_rates, Some(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WageBaseMode;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "payroll-engine-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_default_config() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.settings().federal_income_rate, dec("0.22"));
        assert_eq!(loader.settings().social_security_wage_base, dec("168600"));
        assert_eq!(loader.settings().wage_base_mode, WageBaseMode::PerCheck);
    }

    #[test]
    fn test_default_config_state_rates() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.get_state_rate("CA"), dec("0.093"));
        assert_eq!(loader.get_state_rate("tx"), Decimal::ZERO);
        assert_eq!(loader.get_state_rate("ZZ"), Decimal::ZERO);
    }

    #[test]
    fn test_missing_directory_returns_not_found() {
        let result = ConfigLoader::load("./config/does-not-exist");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.ends_with("settings.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = scratch_dir("invalid");
        fs::write(dir.join("settings.yaml"), "federal_income_rate: [not a rate").unwrap();

        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_state_overrides_are_merged_upper_case() {
        let dir = scratch_dir("overrides");
        fs::write(dir.join("settings.yaml"), "wage_base_mode: year_to_date\n").unwrap();
        fs::write(
            dir.join("state_rates.yaml"),
            "state_rates:\n  ca: 0.1\n  PR: 0.05\n",
        )
        .unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.settings().wage_base_mode, WageBaseMode::YearToDate);
        assert_eq!(loader.get_state_rate("CA"), dec("0.1"));
        assert_eq!(loader.get_state_rate("pr"), dec("0.05"));
        assert_eq!(loader.get_state_rate("NY"), dec("0.109"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_state_rates_in_settings_file_keep_other_states() {
        let dir = scratch_dir("settings-states");
        fs::write(dir.join("settings.yaml"), "state_rates:\n  ca: 0.05\n").unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.get_state_rate("CA"), dec("0.05"));
        assert_eq!(loader.get_state_rate("NY"), dec("0.109"));
        assert_eq!(loader.settings().state_rates.len(), 51);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_state_rates_file_wins_over_settings_file() {
        let dir = scratch_dir("both-states");
        fs::write(dir.join("settings.yaml"), "state_rates:\n  NY: 0.08\n").unwrap();
        fs::write(dir.join("state_rates.yaml"), "state_rates:\n  ny: 0.07\n").unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.get_state_rate("NY"), dec("0.07"));
        assert_eq!(loader.get_state_rate("CA"), dec("0.093"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_empty_settings_file_uses_defaults() {
        let dir = scratch_dir("empty");
        fs::write(dir.join("settings.yaml"), "{}\n").unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.into_settings(), PayrollSettings::default());

        fs::remove_dir_all(dir).unwrap();
    }
}
