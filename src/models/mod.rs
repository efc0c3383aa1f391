//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod audit;
mod calculation_result;
mod cash;
mod employee;
mod pay_period;
mod salary_record;
mod wage_grade;

pub use attendance::{
    AbsenceCount, AbsenceKind, AttendanceMarker, ClassifiedAttendance, MAX_OVERTIME_HOURS_PER_DAY,
    MarkerStatus, parse_overtime_hours,
};
pub use audit::{
    AuditStep, AuditTrace, AuditWarning, Severity, WARN_MALFORMED_OVERTIME,
    WARN_MALFORMED_STATUS, WARN_MISSING_PRIOR_PERIOD, WARN_MISSING_WAGE_GRADE,
    WARN_MULTI_COMPANY_UNALLOCATED, WARN_UNSORTED_MARKERS, WARN_WAGE_GRADE_FALLBACK,
};
pub use calculation_result::CalculationResult;
pub use cash::{CashRequirement, DenominationLine};
pub use employee::{Employee, EmployeeClass};
pub use pay_period::PayPeriod;
pub use salary_record::{
    ComponentLine, Deduction, EmployeeSalaryRecord, MAX_AMOUNT_RUPIAH, ManualAdjustment,
    PriorPeriodCarry, RecordKey, RuleStyle, SalaryComponent, SalaryComponents, amount_in_range,
};
pub use wage_grade::{ResolvedRates, WageGrade};
