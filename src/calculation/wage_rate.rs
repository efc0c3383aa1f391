//! Wage-rate resolution functionality.
//!
//! This module selects the wage-grade row for an employee's grade and month
//! and fills in the rates a row leaves out (daily from monthly, hourly from
//! daily, daily allowances from monthly allowances).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::CalendarConfig;
use crate::models::{
    AuditStep, AuditWarning, ResolvedRates, Severity, WARN_MISSING_WAGE_GRADE,
    WARN_WAGE_GRADE_FALLBACK, WageGrade,
};

/// What to do when no row matches the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Only a row for the requested month is accepted.
    Strict,
    /// Fall back to the most recent row for the grade.
    LatestForGrade,
}

/// Where the resolved rates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// A row for the requested month.
    ExactMonth,
    /// The latest row for the grade, from another month.
    LatestForGrade,
    /// No row; every rate is zero.
    Missing,
}

/// The result of resolving wage rates.
#[derive(Debug, Clone)]
pub struct WageRateResolution {
    /// The resolved rates (all zero when missing).
    pub rates: ResolvedRates,
    /// Where the rates came from.
    pub source: RateSource,
    /// The month label of the row used, if any.
    pub matched_month: Option<String>,
    /// Raised for fallbacks and missing rows.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

impl WageRateResolution {
    /// Whether no row was found.
    pub fn is_missing(&self) -> bool {
        self.source == RateSource::Missing
    }
}

/// Rounds a rupiah amount to whole rupiah, halves away from zero.
pub fn round_rupiah(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether a grade code matches, ignoring case and whitespace.
pub fn grade_matches(row_grade: &str, grade: &str) -> bool {
    let (a, b) = (normalize(row_grade), normalize(grade));
    !a.is_empty() && a == b
}

/// Whether a month label matches, by containment in either direction.
///
/// ```
/// use payroll_engine::calculation::month_matches;
///
/// assert!(month_matches("Oktober 2025", "oktober 2025"));
/// assert!(month_matches("Gaji Oktober 2025", "Oktober 2025"));
/// assert!(!month_matches("September 2025", "Oktober 2025"));
/// ```
pub fn month_matches(row_month: &str, month: &str) -> bool {
    let (a, b) = (normalize(row_month), normalize(month));
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Picks the most recently created row; later table position breaks ties.
fn latest<'a>(rows: impl Iterator<Item = (usize, &'a WageGrade)>) -> Option<&'a WageGrade> {
    rows.max_by_key(|(index, row)| (row.created_at, *index))
        .map(|(_, row)| row)
}

/// Fills in derived rates from a wage-grade row.
pub fn derive_rates(row: &WageGrade, calendar: &CalendarConfig) -> ResolvedRates {
    let days = Decimal::from(calendar.days_per_month);
    let hours = Decimal::from(calendar.hours_per_day);

    let daily_rate = row
        .daily_rate
        .or_else(|| row.monthly_base.map(|m| round_rupiah(m / days)))
        .unwrap_or(Decimal::ZERO);
    let monthly_base = row.monthly_base.unwrap_or(daily_rate * days);
    let hourly_rate = row
        .hourly_rate
        .unwrap_or_else(|| round_rupiah(daily_rate / hours));

    ResolvedRates {
        monthly_base,
        daily_rate,
        hourly_rate,
        overtime_rate: row.overtime_rate,
        meal_allowance: row.meal_allowance,
        attendance_allowance: row.attendance_allowance,
        bonus: row.bonus,
        meal_daily: row
            .meal_daily
            .unwrap_or_else(|| round_rupiah(row.meal_allowance / days)),
        attendance_daily: row
            .attendance_daily
            .unwrap_or_else(|| round_rupiah(row.attendance_allowance / days)),
    }
}

/// Resolves the rates for a grade and month.
///
/// A row for the month is always preferred. Under
/// [`FallbackPolicy::LatestForGrade`] the most recently created row for the
/// grade is used otherwise, with a `WAGE_GRADE_FALLBACK` warning. When nothing
/// matches, every rate is zero and a `MISSING_WAGE_GRADE` warning is raised:
/// this never fails.
///
/// # Arguments
///
/// * `grade` - The employee's grade for the period
/// * `month` - The month label being computed
/// * `table` - The wage-grade master
/// * `policy` - The fallback policy
/// * `calendar` - Calendar constants for derived rates
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{resolve_wage_rates, FallbackPolicy, RateSource};
/// use payroll_engine::config::CalendarConfig;
///
/// let resolution = resolve_wage_rates(
///     "A", "Oktober 2025", &[], FallbackPolicy::Strict, &CalendarConfig::default(), 1,
/// );
/// assert_eq!(resolution.source, RateSource::Missing);
/// assert!(resolution.warning.is_some());
/// ```
pub fn resolve_wage_rates(
    grade: &str,
    month: &str,
    table: &[WageGrade],
    policy: FallbackPolicy,
    calendar: &CalendarConfig,
    step_number: u32,
) -> WageRateResolution {
    let for_grade = || {
        table
            .iter()
            .enumerate()
            .filter(move |(_, row)| grade_matches(&row.grade, grade))
    };

    let exact = latest(for_grade().filter(|(_, row)| month_matches(&row.month, month)));
    let (row, source) = match (exact, policy) {
        (Some(row), _) => (Some(row), RateSource::ExactMonth),
        (None, FallbackPolicy::LatestForGrade) => match latest(for_grade()) {
            Some(row) => (Some(row), RateSource::LatestForGrade),
            None => (None, RateSource::Missing),
        },
        (None, FallbackPolicy::Strict) => (None, RateSource::Missing),
    };

    let rates = row
        .map(|r| derive_rates(r, calendar))
        .unwrap_or_default();

    let warning = match (source, row) {
        (RateSource::LatestForGrade, Some(r)) => Some(AuditWarning::new(
            WARN_WAGE_GRADE_FALLBACK,
            format!(
                "no wage grade '{}' for {}; using latest row from {}",
                grade, month, r.month
            ),
            Severity::Medium,
        )),
        (RateSource::Missing, _) => Some(AuditWarning::new(
            WARN_MISSING_WAGE_GRADE,
            format!("no wage grade '{}' for {}; all rates are zero", grade, month),
            Severity::High,
        )),
        _ => None,
    };

    let reasoning = match (source, row) {
        (RateSource::ExactMonth, Some(r)) => {
            format!("Grade '{}' matched row for {}", grade, r.month)
        }
        (RateSource::LatestForGrade, Some(r)) => format!(
            "Grade '{}' has no row for {}; fell back to {}",
            grade, month, r.month
        ),
        _ => format!("Grade '{}' has no usable row; rates default to zero", grade),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "wage_rate_resolution".to_string(),
        rule_name: "Wage Rate Resolution".to_string(),
        input: serde_json::json!({
            "grade": grade,
            "month": month,
            "policy": policy,
            "rows": table.len(),
        }),
        output: serde_json::json!({
            "source": source,
            "matched_month": row.map(|r| r.month.clone()),
            "monthly_base": rates.monthly_base.to_string(),
            "daily_rate": rates.daily_rate.to_string(),
            "hourly_rate": rates.hourly_rate.to_string(),
            "overtime_rate": rates.overtime_rate.to_string(),
            "meal_daily": rates.meal_daily.to_string(),
            "attendance_daily": rates.attendance_daily.to_string(),
        }),
        reasoning,
    };

    WageRateResolution {
        rates,
        source,
        matched_month: row.map(|r| r.month.clone()),
        warning,
        audit_step,
    }
}
