//! Attendance classification functionality.
//!
//! This module turns one employee's date-ordered markers for a month and period
//! into per-category counts. Leave, sick and unexplained absences are split by
//! run length: a run of two or more consecutive days of the same status is
//! penalized in full, a run of one is isolated. Company and public holidays
//! neither extend nor break a run.

use rust_decimal::Decimal;

use crate::models::{
    AbsenceKind, AttendanceMarker, AuditStep, AuditWarning, ClassifiedAttendance, MarkerStatus,
    MAX_OVERTIME_HOURS_PER_DAY, Severity, WARN_MALFORMED_OVERTIME, WARN_MALFORMED_STATUS,
    WARN_UNSORTED_MARKERS, parse_overtime_hours,
};

/// The result of classifying a month of markers.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// The classified counts.
    pub attendance: ClassifiedAttendance,
    /// Malformed or out-of-order input that was tolerated.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this classification.
    pub audit_step: AuditStep,
}

/// State of the absence streak accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreakState {
    /// No absence run is open.
    Idle,
    /// A run of `length` consecutive days of `kind` is open.
    Run { kind: AbsenceKind, length: u32 },
}

impl StreakState {
    /// Feeds one absence day into the accumulator.
    fn absence(self, kind: AbsenceKind, counts: &mut ClassifiedAttendance) -> Self {
        match self {
            StreakState::Run { kind: current, length } if current == kind => StreakState::Run {
                kind,
                length: length + 1,
            },
            other => {
                other.finalize(counts);
                StreakState::Run { kind, length: 1 }
            }
        }
    }

    /// Closes any open run, adding it to the counts.
    fn finalize(self, counts: &mut ClassifiedAttendance) -> Self {
        if let StreakState::Run { kind, length } = self {
            let slot = counts.absence_mut(kind);
            if length >= 2 {
                slot.penalized += length;
            } else {
                slot.isolated += length;
            }
        }
        StreakState::Idle
    }
}

/// Classifies one employee's markers for a month and period.
///
/// Markers must be in ascending date order for streaks to be detected
/// correctly. Out-of-order input is sorted (stable) and flagged with an
/// `UNSORTED_MARKERS` warning. Unrecognized statuses and non-numeric overtime
/// values count toward nothing and are flagged, never rejected.
///
/// # Arguments
///
/// * `markers` - The employee's markers for one month and period
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::classify_attendance;
/// use payroll_engine::models::{AttendanceMarker, PayPeriod};
/// use chrono::NaiveDate;
///
/// let markers: Vec<AttendanceMarker> = ["I", "LP", "I"]
///     .iter()
///     .enumerate()
///     .map(|(i, status)| AttendanceMarker {
///         employee_code: "K-001".to_string(),
///         company: "PT Sandang".to_string(),
///         month: "Oktober 2025".to_string(),
///         period: PayPeriod::Period2,
///         date: NaiveDate::from_ymd_opt(2025, 10, 16 + i as u32).unwrap(),
///         status: status.to_string(),
///         overtime: None,
///     })
///     .collect();
///
/// let result = classify_attendance(&markers, 1);
/// assert_eq!(result.attendance.leave.penalized, 2);
/// assert_eq!(result.attendance.company_holidays, 1);
/// ```
pub fn classify_attendance(markers: &[AttendanceMarker], step_number: u32) -> ClassificationResult {
    let mut warnings = Vec::new();

    let sorted;
    let ordered: &[AttendanceMarker] = if markers.windows(2).all(|w| w[0].date <= w[1].date) {
        markers
    } else {
        warnings.push(AuditWarning::new(
            WARN_UNSORTED_MARKERS,
            "attendance markers were not in date order and have been sorted",
            Severity::Low,
        ));
        let mut copy = markers.to_vec();
        copy.sort_by_key(|m| m.date);
        sorted = copy;
        &sorted
    };

    let mut counts = ClassifiedAttendance::default();
    let mut streak = StreakState::Idle;
    let max_overtime = Decimal::from(MAX_OVERTIME_HOURS_PER_DAY);

    for marker in ordered {
        match marker.parsed_status() {
            MarkerStatus::CompanyHoliday => counts.company_holidays += 1,
            MarkerStatus::PublicHoliday => counts.public_holidays += 1,
            status @ (MarkerStatus::Leave | MarkerStatus::Sick | MarkerStatus::Unexplained) => {
                if let Some(kind) = status.absence_kind() {
                    streak = streak.absence(kind, &mut counts);
                }
            }
            MarkerStatus::Present => {
                counts.present_days += 1;
                streak = streak.finalize(&mut counts);
            }
            MarkerStatus::Partial(fraction) => {
                counts.partial_credit += fraction;
                streak = streak.finalize(&mut counts);
            }
            MarkerStatus::Blank => {
                streak = streak.finalize(&mut counts);
            }
            MarkerStatus::Other(code) => {
                warnings.push(AuditWarning::new(
                    WARN_MALFORMED_STATUS,
                    format!("unrecognized status '{}' on {}", code, marker.date),
                    Severity::Low,
                ));
                streak = streak.finalize(&mut counts);
            }
        }

        if let Some(raw) = marker.overtime.as_deref().filter(|r| !r.trim().is_empty()) {
            match parse_overtime_hours(raw) {
                Some(hours) if hours > max_overtime => warnings.push(AuditWarning::new(
                    WARN_MALFORMED_OVERTIME,
                    format!(
                        "overtime value '{}' on {} exceeds {} hours and was ignored",
                        raw.trim(),
                        marker.date,
                        MAX_OVERTIME_HOURS_PER_DAY
                    ),
                    Severity::Medium,
                )),
                Some(hours) => match counts.overtime_hours.checked_add(hours) {
                    Some(total) => counts.overtime_hours = total,
                    None => warnings.push(AuditWarning::new(
                        WARN_MALFORMED_OVERTIME,
                        format!("overtime total overflowed at {}", marker.date),
                        Severity::Medium,
                    )),
                },
                None => warnings.push(AuditWarning::new(
                    WARN_MALFORMED_OVERTIME,
                    format!("overtime value '{}' on {} is not numeric", raw.trim(), marker.date),
                    Severity::Low,
                )),
            }
        }
    }
    streak.finalize(&mut counts);

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_classification".to_string(),
        rule_name: "Attendance Classification".to_string(),
        input: serde_json::json!({
            "markers": ordered.len(),
            "first_date": ordered.first().map(|m| m.date.to_string()),
            "last_date": ordered.last().map(|m| m.date.to_string()),
        }),
        output: serde_json::to_value(&counts).unwrap_or(serde_json::Value::Null),
        reasoning: describe(&counts),
    };

    ClassificationResult {
        attendance: counts,
        warnings,
        audit_step,
    }
}

fn describe(counts: &ClassifiedAttendance) -> String {
    let absences = [
        AbsenceKind::Leave,
        AbsenceKind::Sick,
        AbsenceKind::Unexplained,
    ]
    .iter()
    .map(|kind| {
        let c = counts.absence(*kind);
        format!("{} {}+{}", kind.code(), c.penalized, c.isolated)
    })
    .collect::<Vec<_>>()
    .join(", ");

    format!(
        "H {}, partial {}, LP {}, TM {}, {} (penalized+isolated), overtime {}h",
        counts.present_days,
        counts.partial_credit.normalize(),
        counts.company_holidays,
        counts.public_holidays,
        absences,
        counts.overtime_hours.normalize()
    )
}
