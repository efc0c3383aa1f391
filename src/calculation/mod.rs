//! Calculation logic for the payroll engine.
//!
//! This module contains the pure rule functions: attendance classification
//! into penalized and isolated absences, progressive and flat penalties,
//! wage-rate resolution with fallbacks, salary components for each rule
//! style, the single-record rule chain and cash denomination planning.

mod attendance_classifier;
mod cash_denomination;
mod penalty;
mod salary_components;
mod salary_record;
mod wage_rate;

pub use attendance_classifier::{ClassificationResult, classify_attendance};
pub use cash_denomination::{plan_cash, stepped_round_up};
pub use penalty::{flat_penalty, progressive_penalty};
pub use salary_components::{SalaryCalculationResult, SalaryInput, calculate_salary_components};
pub use salary_record::{
    AttendanceInput, RecordInput, SalaryRecordResult, calculate_salary_record,
};
pub use wage_rate::{
    FallbackPolicy, RateSource, WageRateResolution, derive_rates, grade_matches, month_matches,
    resolve_wage_rates, round_rupiah,
};
