//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{RuleStyle, WageGrade};

use super::types::{EngineConfig, EngineFile, WageGradesFile};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/pabrik/
/// ├── engine.yaml       # Calendar, penalties, rule styles, cash and batch policy
/// └── wage_grades.yaml  # Wage-grade master rows
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/pabrik").unwrap();
/// println!("Loaded rule set: {}", loader.config().metadata().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A value fails validation (e.g. zero `days_per_month`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine = Self::load_yaml::<EngineFile>(&path.join("engine.yaml"))?;
        let grades = Self::load_yaml::<WageGradesFile>(&path.join("wage_grades.yaml"))?;

        let config = EngineConfig::new(engine, grades.wage_grades)?;
        Ok(Self { config })
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

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the wage-grade master rows.
    pub fn wage_grades(&self) -> &[WageGrade] {
        self.config.wage_grades()
    }

    /// Returns the rule style for an employee's site.
    pub fn rule_style_for(&self, site: Option<&str>) -> RuleStyle {
        self.config.rule_style_for(site)
    }
}

impl From<EngineConfig> for ConfigLoader {
    fn from(config: EngineConfig) -> Self {
        Self { config }
    }
}
