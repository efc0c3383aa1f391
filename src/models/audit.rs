//! Audit trace types.
//!
//! Every rule records an [`AuditStep`] with its inputs, outputs and reasoning.
//! Data-quality problems that do not stop a calculation are reported as
//! [`AuditWarning`]s.

use serde::{Deserialize, Serialize};

/// No wage-grade row could be resolved; dependent rates are zero.
pub const WARN_MISSING_WAGE_GRADE: &str = "MISSING_WAGE_GRADE";
/// The wage grade came from the latest row for the grade, not the month.
pub const WARN_WAGE_GRADE_FALLBACK: &str = "WAGE_GRADE_FALLBACK";
/// Period 2 was computed without Period 1 counts.
pub const WARN_MISSING_PRIOR_PERIOD: &str = "MISSING_PRIOR_PERIOD";
/// A status code was not recognized.
pub const WARN_MALFORMED_STATUS: &str = "MALFORMED_STATUS";
/// An overtime value held no number.
pub const WARN_MALFORMED_OVERTIME: &str = "MALFORMED_OVERTIME";
/// Markers arrived out of date order and were sorted.
pub const WARN_UNSORTED_MARKERS: &str = "UNSORTED_MARKERS";
/// Rows for several companies were split by tag without an allocator.
pub const WARN_MULTI_COMPANY_UNALLOCATED: &str = "MULTI_COMPANY_UNALLOCATED";

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// How urgently a warning needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; the numbers are still trustworthy.
    Low,
    /// The numbers were computed in a degraded mode.
    Medium,
    /// The numbers are very likely wrong (e.g. zero rates).
    High,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AuditWarning, Severity, WARN_MISSING_PRIOR_PERIOD};
///
/// let warning = AuditWarning::new(
///     WARN_MISSING_PRIOR_PERIOD,
///     "no Period 1 record for K-001",
///     Severity::Medium,
/// );
/// assert_eq!(warning.code, "MISSING_PRIOR_PERIOD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: Severity,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(code: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity,
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "attendance_classification".to_string(),
            rule_name: "Attendance Classification".to_string(),
            input: serde_json::json!({"markers": 3}),
            output: serde_json::json!({"sick_penalized": 3}),
            reasoning: "S streak of 3".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"attendance_classification\""));
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning::new(WARN_MISSING_WAGE_GRADE, "grade X", Severity::High);

        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"MISSING_WAGE_GRADE\""));
        assert!(json.contains("\"severity\":\"high\""));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_audit_trace_serialization() {
        let trace = AuditTrace {
            steps: vec![],
            warnings: vec![AuditWarning::new(WARN_UNSORTED_MARKERS, "sorted", Severity::Low)],
            duration_us: 1234,
        };

        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"duration_us\":1234"));
        assert!(json.contains("\"warnings\":["));
    }
}
