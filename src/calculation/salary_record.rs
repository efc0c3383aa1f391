//! Single employee-period record calculation.
//!
//! Runs the rule chain for one employee, month, period and company:
//! classification, wage-rate resolution, prior-period check and component
//! calculation. Both the batch aggregator and the HTTP surface go through here.

use crate::config::EngineConfig;
use crate::models::{
    AttendanceMarker, AuditStep, AuditWarning, ClassifiedAttendance, Employee,
    EmployeeSalaryRecord, ManualAdjustment, PayPeriod, PriorPeriodCarry, RecordKey, Severity,
    WARN_MISSING_PRIOR_PERIOD, WageGrade,
};

use super::attendance_classifier::classify_attendance;
use super::salary_components::{SalaryInput, calculate_salary_components};
use super::wage_rate::{FallbackPolicy, resolve_wage_rates};

/// The attendance a record is computed from.
#[derive(Debug, Clone)]
pub enum AttendanceInput<'a> {
    /// Raw markers for the key's month, period and company; classified here.
    Markers(&'a [AttendanceMarker]),
    /// Counts already split per company by an allocator.
    Allocated(ClassifiedAttendance),
}

/// Inputs for one record.
#[derive(Debug, Clone)]
pub struct RecordInput<'a> {
    /// The employee master row.
    pub employee: &'a Employee,
    /// The record being computed.
    pub key: RecordKey,
    /// The attendance for the key.
    pub attendance: AttendanceInput<'a>,
    /// Period 1 carry; only read when computing Period 2.
    pub prior: Option<&'a PriorPeriodCarry>,
    /// The externally managed adjustment for the key.
    pub adjustment: ManualAdjustment,
}

/// A computed record with the audit steps that produced it.
#[derive(Debug, Clone)]
pub struct SalaryRecordResult {
    /// The record.
    pub record: EmployeeSalaryRecord,
    /// Steps in the order they ran.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes one salary record.
///
/// Never fails: missing wage grades, a missing Period 1 and malformed markers
/// degrade to zero values and are reported in `record.warnings`.
pub fn calculate_salary_record(
    input: RecordInput<'_>,
    wage_grades: &[WageGrade],
    policy: FallbackPolicy,
    config: &EngineConfig,
) -> SalaryRecordResult {
    let period = input.key.period;
    let mut audit_steps = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();

    let attendance = match input.attendance {
        AttendanceInput::Markers(markers) => {
            let classification = classify_attendance(markers, 1);
            audit_steps.push(classification.audit_step);
            warnings.extend(classification.warnings);
            classification.attendance
        }
        AttendanceInput::Allocated(attendance) => {
            audit_steps.push(AuditStep {
                step_number: 1,
                rule_id: "attendance_allocation".to_string(),
                rule_name: "Allocated Attendance".to_string(),
                input: serde_json::json!({ "company": input.key.company }),
                output: serde_json::to_value(&attendance).unwrap_or(serde_json::Value::Null),
                reasoning: format!(
                    "Counts for {} taken from the company allocator",
                    input.key.company
                ),
            });
            attendance
        }
    };

    let grade = input.employee.grade_for(period).trim().to_string();
    let resolution = resolve_wage_rates(
        &grade,
        &input.key.month,
        wage_grades,
        policy,
        config.calendar(),
        2,
    );
    audit_steps.push(resolution.audit_step);
    warnings.extend(resolution.warning);

    let prior = match (period, input.prior) {
        (PayPeriod::Period1, _) => PriorPeriodCarry::default(),
        (PayPeriod::Period2, Some(carry)) => carry.clone(),
        (PayPeriod::Period2, None) => {
            warnings.push(AuditWarning::new(
                WARN_MISSING_PRIOR_PERIOD,
                format!(
                    "no Period 1 record for {}; carried counts are zero",
                    input.key.with_period(PayPeriod::Period1)
                ),
                Severity::Medium,
            ));
            PriorPeriodCarry::default()
        }
    };

    let style = config.rule_style_for(input.employee.site.as_deref());
    let salary_input = SalaryInput {
        attendance: &attendance,
        rates: &resolution.rates,
        class: input.employee.class,
        period,
        prior: &prior,
        adjustment: &input.adjustment,
    };
    let salary = calculate_salary_components(&salary_input, style, config, 3);
    audit_steps.extend(salary.audit_steps);

    let record = EmployeeSalaryRecord {
        key: input.key,
        grade,
        rule_style: style,
        attendance,
        components: salary.components,
        adjustment: input.adjustment,
        hasil_gaji: salary.hasil_gaji,
        breakdown: salary.lines,
        warnings,
    };

    SalaryRecordResult {
        record,
        audit_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{
        EmployeeClass, RuleStyle, WARN_MISSING_WAGE_GRADE, WARN_UNSORTED_MARKERS,
        WARN_WAGE_GRADE_FALLBACK,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::load("./config/pabrik").unwrap()
    }

    fn employee(site: Option<&str>, grade: &str) -> Employee {
        Employee {
            code: "K-001".to_string(),
            name: "Siti".to_string(),
            class: EmployeeClass::NonStaff,
            grade_p1: grade.to_string(),
            grade_p2: None,
            site: site.map(str::to_string),
        }
    }

    fn key(month: &str, period: PayPeriod) -> RecordKey {
        RecordKey {
            month: month.to_string(),
            employee_code: "K-001".to_string(),
            period,
            company: "PT Sandang".to_string(),
        }
    }

    fn markers(period: PayPeriod, first_day: u32, statuses: &[(&str, Option<&str>)]) -> Vec<AttendanceMarker> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, (status, overtime))| AttendanceMarker {
                employee_code: "K-001".to_string(),
                company: "PT Sandang".to_string(),
                month: "Oktober 2025".to_string(),
                period,
                date: NaiveDate::from_ymd_opt(2025, 10, first_day + i as u32).unwrap(),
                status: status.to_string(),
                overtime: overtime.map(str::to_string),
            })
            .collect()
    }

    #[test]
    fn test_period2_record_from_markers() {
        let loader = loader();
        let emp = employee(None, "A");
        let input_markers = markers(
            PayPeriod::Period2,
            16,
            &[("H", Some("2")), ("S", None), ("S", None), ("H", Some("1")), ("I", None), ("H", None)],
        );
        let prior = PriorPeriodCarry {
            company_holidays: 1,
            ..Default::default()
        };

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("Oktober 2025", PayPeriod::Period2),
                attendance: AttendanceInput::Markers(&input_markers),
                prior: Some(&prior),
                adjustment: ManualAdjustment {
                    kasbon: dec("20000"),
                    penyesuaian_bonus: Decimal::ZERO,
                },
            },
            loader.wage_grades(),
            FallbackPolicy::Strict,
            loader.config(),
        );
        let record = result.record;

        assert_eq!(record.rule_style, RuleStyle::GeneralStaff);
        assert_eq!(record.attendance.sick.penalized, 2);
        assert_eq!(record.attendance.leave.isolated, 1);
        assert_eq!(record.components.gapok, dec("2300000"));
        assert_eq!(record.components.gaji_lembur, dec("45000"));
        assert_eq!(record.components.uang_makan, dec("98000"));
        assert_eq!(record.components.uang_kehadiran, dec("120000"));
        assert_eq!(record.hasil_gaji, dec("2543000"));
        assert!(!record.has_warnings());
        assert_eq!(result.audit_steps[0].rule_id, "attendance_classification");
        assert_eq!(result.audit_steps[1].rule_id, "wage_rate_resolution");
        assert_eq!(result.audit_steps.len(), 8);
    }

    #[test]
    fn test_missing_prior_period_degrades_with_warning() {
        let loader = loader();
        let emp = employee(Some("garut"), "A");
        let input_markers = markers(PayPeriod::Period2, 16, &[("H", None), ("H", None)]);

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("Oktober 2025", PayPeriod::Period2),
                attendance: AttendanceInput::Markers(&input_markers),
                prior: None,
                adjustment: ManualAdjustment::default(),
            },
            loader.wage_grades(),
            FallbackPolicy::Strict,
            loader.config(),
        );

        let record = result.record;
        assert_eq!(record.rule_style, RuleStyle::Garut);
        assert_eq!(record.warnings[0].code, WARN_MISSING_PRIOR_PERIOD);
        // 2 days x 5000 meal daily
        assert_eq!(record.components.uang_makan, dec("10000"));
    }

    #[test]
    fn test_period1_ignores_prior() {
        let loader = loader();
        let emp = employee(Some("garut"), "A");
        let input_markers = markers(PayPeriod::Period1, 1, &[("H", None)]);

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("Oktober 2025", PayPeriod::Period1),
                attendance: AttendanceInput::Markers(&input_markers),
                prior: None,
                adjustment: ManualAdjustment::default(),
            },
            loader.wage_grades(),
            FallbackPolicy::Strict,
            loader.config(),
        );

        assert!(result.record.warnings.is_empty());
        assert_eq!(result.record.components.gapok, dec("100000"));
    }

    #[test]
    fn test_missing_grade_yields_zero_rates_and_warning() {
        let loader = loader();
        let emp = employee(Some("garut"), "Z");
        let input_markers = markers(PayPeriod::Period1, 1, &[("H", Some("2"))]);

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("Oktober 2025", PayPeriod::Period1),
                attendance: AttendanceInput::Markers(&input_markers),
                prior: None,
                adjustment: ManualAdjustment::default(),
            },
            loader.wage_grades(),
            FallbackPolicy::LatestForGrade,
            loader.config(),
        );

        assert_eq!(result.record.components.total(), Decimal::ZERO);
        assert_eq!(result.record.warnings[0].code, WARN_MISSING_WAGE_GRADE);
    }

    #[test]
    fn test_batch_policy_falls_back_to_latest_row() {
        let loader = loader();
        let emp = employee(Some("garut"), "A");
        let input_markers = markers(PayPeriod::Period1, 1, &[("H", None)]);

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("November 2025", PayPeriod::Period1),
                attendance: AttendanceInput::Markers(&input_markers),
                prior: None,
                adjustment: ManualAdjustment::default(),
            },
            loader.wage_grades(),
            FallbackPolicy::LatestForGrade,
            loader.config(),
        );

        // Oktober row (created 2025-10-01) is newer than September.
        assert_eq!(result.record.components.gapok, dec("100000"));
        assert_eq!(result.record.warnings[0].code, WARN_WAGE_GRADE_FALLBACK);
    }

    #[test]
    fn test_period2_uses_changed_grade() {
        let loader = loader();
        let mut emp = employee(None, "A");
        emp.grade_p2 = Some("B".to_string());
        let input_markers = markers(PayPeriod::Period2, 16, &[("H", None)]);

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("Oktober 2025", PayPeriod::Period2),
                attendance: AttendanceInput::Markers(&input_markers),
                prior: Some(&PriorPeriodCarry::default()),
                adjustment: ManualAdjustment::default(),
            },
            loader.wage_grades(),
            FallbackPolicy::Strict,
            loader.config(),
        );

        assert_eq!(result.record.grade, "B");
        assert_eq!(result.record.components.gapok, dec("2860000"));
    }

    #[test]
    fn test_allocated_attendance_skips_classification() {
        let loader = loader();
        let emp = employee(Some("garut"), "A");
        let allocated = ClassifiedAttendance {
            present_days: 5,
            ..Default::default()
        };

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("Oktober 2025", PayPeriod::Period1),
                attendance: AttendanceInput::Allocated(allocated),
                prior: None,
                adjustment: ManualAdjustment::default(),
            },
            loader.wage_grades(),
            FallbackPolicy::Strict,
            loader.config(),
        );

        assert_eq!(result.audit_steps[0].rule_id, "attendance_allocation");
        assert_eq!(result.record.attendance.present_days, 5);
        assert_eq!(result.record.components.gapok, dec("500000"));
    }

    #[test]
    fn test_warnings_collected_from_every_stage() {
        let loader = loader();
        let emp = employee(None, "A");
        let mut input_markers = markers(PayPeriod::Period2, 16, &[("H", None), ("H", None)]);
        input_markers.reverse();

        let result = calculate_salary_record(
            RecordInput {
                employee: &emp,
                key: key("Oktober 2025", PayPeriod::Period2),
                attendance: AttendanceInput::Markers(&input_markers),
                prior: None,
                adjustment: ManualAdjustment::default(),
            },
            loader.wage_grades(),
            FallbackPolicy::Strict,
            loader.config(),
        );

        let codes: Vec<&str> = result.record.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec![WARN_UNSORTED_MARKERS, WARN_MISSING_PRIOR_PERIOD]);
    }
}
