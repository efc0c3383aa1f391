//! Calculation result envelope.
//!
//! A [`CalculationResult`] wraps one computed [`EmployeeSalaryRecord`] with
//! the identifiers and audit trace of the calculation that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, EmployeeSalaryRecord};

/// The complete result of a single-record calculation.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use uuid::Uuid;
/// use payroll_engine::models::{
///     AuditTrace, CalculationResult, ClassifiedAttendance, EmployeeSalaryRecord,
///     ManualAdjustment, PayPeriod, RecordKey, RuleStyle, SalaryComponents,
/// };
/// use rust_decimal::Decimal;
///
/// let result = CalculationResult {
///     calculation_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     record: EmployeeSalaryRecord {
///         key: RecordKey {
///             month: "Oktober 2025".to_string(),
///             employee_code: "K-001".to_string(),
///             period: PayPeriod::Period1,
///             company: "PT Sandang".to_string(),
///         },
///         grade: "A".to_string(),
///         rule_style: RuleStyle::GeneralStaff,
///         attendance: ClassifiedAttendance::default(),
///         components: SalaryComponents::default(),
///         adjustment: ManualAdjustment::default(),
///         hasil_gaji: Decimal::ZERO,
///         breakdown: vec![],
///         warnings: vec![],
///     },
///     audit_trace: AuditTrace {
///         steps: vec![],
///         warnings: vec![],
///         duration_us: 0,
///     },
/// };
/// assert_eq!(result.net_pay(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The computed record.
    pub record: EmployeeSalaryRecord,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl CalculationResult {
    /// The record's net payable amount.
    pub fn net_pay(&self) -> rust_decimal::Decimal {
        self.record.hasil_gaji
    }
}
