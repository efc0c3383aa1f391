//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::calculation::FallbackPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{RuleStyle, WageGrade};

/// Metadata identifying the configuration set.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable name, e.g. the factory group.
    pub name: String,
    /// Version of the rule set.
    pub version: String,
}

/// Calendar constants used for pro-rating.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Working days a monthly amount is spread over.
    #[serde(default = "default_days_per_month")]
    pub days_per_month: u32,
    /// Working hours in one day.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: u32,
}

fn default_days_per_month() -> u32 {
    26
}

fn default_hours_per_day() -> u32 {
    8
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            days_per_month: default_days_per_month(),
            hours_per_day: default_hours_per_day(),
        }
    }
}

/// Amounts used by the progressive and flat penalties.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PenaltySchedule {
    /// Cost of the first day of a penalized streak.
    pub progressive_base: Decimal,
    /// Increase for each further day of the streak.
    pub progressive_step: Decimal,
    /// Cost of each isolated occurrence.
    pub flat: Decimal,
}

impl Default for PenaltySchedule {
    fn default() -> Self {
        Self {
            progressive_base: Decimal::from(10_000),
            progressive_step: Decimal::from(2_000),
            flat: Decimal::from(10_000),
        }
    }
}

/// Which rule style each factory site uses.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleStyleConfig {
    /// Style for employees whose site is unknown or not listed.
    pub default_style: RuleStyle,
    /// Per-site overrides keyed by lower-case site name.
    #[serde(default)]
    pub sites: HashMap<String, RuleStyle>,
}

impl Default for RuleStyleConfig {
    fn default() -> Self {
        Self {
            default_style: RuleStyle::GeneralStaff,
            sites: HashMap::new(),
        }
    }
}

/// Cash preparation policy.
#[derive(Debug, Clone, Deserialize)]
pub struct CashPolicy {
    /// Denominations, largest first.
    pub denominations: Vec<Decimal>,
    /// Amounts are rounded up within steps of this size.
    #[serde(default = "default_rounding_unit")]
    pub rounding_unit: Decimal,
    /// The half step within a rounding unit.
    #[serde(default = "default_rounding_half_step")]
    pub rounding_half_step: Decimal,
}

fn default_rounding_unit() -> Decimal {
    Decimal::from(1_000)
}

fn default_rounding_half_step() -> Decimal {
    Decimal::from(500)
}

impl Default for CashPolicy {
    fn default() -> Self {
        Self {
            denominations: [100_000, 50_000, 20_000, 10_000, 5_000, 2_000, 1_000, 500]
                .into_iter()
                .map(Decimal::from)
                .collect(),
            rounding_unit: default_rounding_unit(),
            rounding_half_step: default_rounding_half_step(),
        }
    }
}

/// Batch recomputation policy.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPolicy {
    /// Maximum employees processed at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// How wage grades are resolved when the month has no row.
    #[serde(default = "default_wage_fallback")]
    pub wage_fallback: FallbackPolicy,
}

fn default_max_concurrency() -> usize {
    4
}

fn default_wage_fallback() -> FallbackPolicy {
    FallbackPolicy::LatestForGrade
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            wage_fallback: default_wage_fallback(),
        }
    }
}

/// Structure of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineFile {
    /// Metadata.
    pub metadata: EngineMetadata,
    /// Calendar constants.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Penalty amounts.
    #[serde(default)]
    pub penalties: PenaltySchedule,
    /// Rule style selection.
    #[serde(default)]
    pub rules: RuleStyleConfig,
    /// Cash preparation policy.
    #[serde(default)]
    pub cash: CashPolicy,
    /// Batch policy.
    #[serde(default)]
    pub batch: BatchPolicy,
}

/// Structure of `wage_grades.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct WageGradesFile {
    /// All wage-grade rows.
    pub wage_grades: Vec<WageGrade>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    calendar: CalendarConfig,
    penalties: PenaltySchedule,
    rules: RuleStyleConfig,
    cash: CashPolicy,
    batch: BatchPolicy,
    wage_grades: Vec<WageGrade>,
}

impl EngineConfig {
    /// Creates a new EngineConfig, validating values the engine divides by
    /// or iterates over.
    pub fn new(file: EngineFile, wage_grades: Vec<WageGrade>) -> EngineResult<Self> {
        let mut rules = file.rules;
        rules.sites = rules
            .sites
            .into_iter()
            .map(|(site, style)| (site.trim().to_lowercase(), style))
            .collect();

        let config = Self {
            metadata: file.metadata,
            calendar: file.calendar,
            penalties: file.penalties,
            rules,
            cash: file.cash,
            batch: file.batch,
            wage_grades,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> EngineResult<()> {
        let invalid = |field: &str, message: &str| EngineError::InvalidConfig {
            field: field.to_string(),
            message: message.to_string(),
        };

        if self.calendar.days_per_month == 0 {
            return Err(invalid("calendar.days_per_month", "must be greater than zero"));
        }
        if self.calendar.hours_per_day == 0 {
            return Err(invalid("calendar.hours_per_day", "must be greater than zero"));
        }
        if self.cash.denominations.is_empty() {
            return Err(invalid("cash.denominations", "must not be empty"));
        }
        if self.cash.denominations.iter().any(|d| *d <= Decimal::ZERO) {
            return Err(invalid("cash.denominations", "must all be positive"));
        }
        if self.cash.rounding_unit <= Decimal::ZERO
            || self.cash.rounding_half_step <= Decimal::ZERO
            || self.cash.rounding_half_step >= self.cash.rounding_unit
        {
            return Err(invalid(
                "cash.rounding_half_step",
                "must be positive and smaller than cash.rounding_unit",
            ));
        }
        if self.batch.max_concurrency == 0 {
            return Err(invalid("batch.max_concurrency", "must be greater than zero"));
        }
        for (index, row) in self.wage_grades.iter().enumerate() {
            if let Some(field) = row.out_of_range_field() {
                return Err(invalid(
                    &format!("wage_grades[{}].{}", index, field),
                    "must be within the supported rupiah range",
                ));
            }
        }
        Ok(())
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the calendar constants.
    pub fn calendar(&self) -> &CalendarConfig {
        &self.calendar
    }

    /// Returns the penalty schedule.
    pub fn penalties(&self) -> &PenaltySchedule {
        &self.penalties
    }

    /// Returns the cash policy.
    pub fn cash(&self) -> &CashPolicy {
        &self.cash
    }

    /// Returns the batch policy.
    pub fn batch(&self) -> &BatchPolicy {
        &self.batch
    }

    /// Returns the wage-grade master rows.
    pub fn wage_grades(&self) -> &[WageGrade] {
        &self.wage_grades
    }

    /// Returns the rule style for an employee's site.
    pub fn rule_style_for(&self, site: Option<&str>) -> RuleStyle {
        site.and_then(|s| self.rules.sites.get(&s.trim().to_lowercase()))
            .copied()
            .unwrap_or(self.rules.default_style)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metadata: EngineMetadata {
                name: "default".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            calendar: CalendarConfig::default(),
            penalties: PenaltySchedule::default(),
            rules: RuleStyleConfig::default(),
            cash: CashPolicy::default(),
            batch: BatchPolicy::default(),
            wage_grades: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_file(yaml: &str) -> EngineFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let file = engine_file("metadata:\n  name: test\n  version: '1'\n");
        let config = EngineConfig::new(file, vec![]).unwrap();

        assert_eq!(config.calendar().days_per_month, 26);
        assert_eq!(config.calendar().hours_per_day, 8);
        assert_eq!(config.penalties(), &PenaltySchedule::default());
        assert_eq!(config.cash().denominations.len(), 8);
        assert_eq!(config.batch().max_concurrency, 4);
        assert_eq!(config.batch().wage_fallback, FallbackPolicy::LatestForGrade);
    }

    #[test]
    fn test_rule_style_for_site_is_case_insensitive() {
        let file = engine_file(
            r#"
metadata: {name: test, version: '1'}
rules:
  default_style: general_staff
  sites:
    Garut: garut
    Pabrik Utama: general_pabrik
"#,
        );
        let config = EngineConfig::new(file, vec![]).unwrap();

        assert_eq!(config.rule_style_for(Some(" GARUT ")), RuleStyle::Garut);
        assert_eq!(
            config.rule_style_for(Some("pabrik utama")),
            RuleStyle::GeneralPabrik
        );
        assert_eq!(config.rule_style_for(Some("bandung")), RuleStyle::GeneralStaff);
        assert_eq!(config.rule_style_for(None), RuleStyle::GeneralStaff);
    }

    #[test]
    fn test_zero_days_per_month_is_rejected() {
        let file = engine_file(
            "metadata: {name: t, version: '1'}\ncalendar: {days_per_month: 0}\n",
        );
        match EngineConfig::new(file, vec![]) {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "calendar.days_per_month")
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_denominations_are_rejected() {
        let file = engine_file(
            "metadata: {name: t, version: '1'}\ncash: {denominations: []}\n",
        );
        assert!(matches!(
            EngineConfig::new(file, vec![]),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_half_step_must_be_below_unit() {
        let file = engine_file(
            "metadata: {name: t, version: '1'}\ncash: {denominations: [1000], rounding_unit: 1000, rounding_half_step: 1000}\n",
        );
        assert!(matches!(
            EngineConfig::new(file, vec![]),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let file = engine_file("metadata: {name: t, version: '1'}\nbatch: {max_concurrency: 0}\n");
        assert!(matches!(
            EngineConfig::new(file, vec![]),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_out_of_range_wage_row_is_rejected() {
        let file = engine_file("metadata: {name: t, version: '1'}\n");
        let row: WageGrade = serde_yaml::from_str(
            "grade: A\nmonth: Oktober 2025\ndaily_rate: 100000\nbonus: 5000000000000000000\n",
        )
        .unwrap();

        match EngineConfig::new(file, vec![row]) {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "wage_grades[0].bonus")
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.wage_grades().is_empty());
    }
}
