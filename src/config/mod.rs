//! Configuration loading and management for the payroll engine.
//!
//! This module loads the engine configuration from YAML files: calendar
//! constants, penalty amounts, the rule style of each factory site, cash
//! preparation policy, batch policy and the wage-grade master.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/pabrik").unwrap();
//! println!("Loaded {} wage grades", config.wage_grades().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BatchPolicy, CalendarConfig, CashPolicy, EngineConfig, EngineFile, EngineMetadata,
    PenaltySchedule, RuleStyleConfig, WageGradesFile,
};
