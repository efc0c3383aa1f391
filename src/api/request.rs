//! Request types for the payroll HTTP API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceMarker, Employee, MAX_OVERTIME_HOURS_PER_DAY, ManualAdjustment, PayPeriod,
    PriorPeriodCarry, RecordKey, WageGrade, amount_in_range, parse_overtime_hours,
};

/// Most days a carried Period 1 count may hold.
const MAX_CARRIED_DAYS: u32 = 31;

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidRequest {
        field: field.to_string(),
        message: message.into(),
    }
}

fn out_of_range(field: &str) -> EngineError {
    invalid(field, "is outside the supported rupiah range")
}

/// Request body for the `/calculate` endpoint.
///
/// One employee, month, period and company. Markers outside that scope are
/// rejected rather than silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee master row.
    pub employee: Employee,
    /// Month label, e.g. "Oktober 2025".
    pub month: String,
    /// The period to compute.
    pub period: PayPeriod,
    /// The company the record is booked against.
    pub company: String,
    /// The employee's markers for the period.
    #[serde(default)]
    pub markers: Vec<AttendanceMarker>,
    /// Wage rows to resolve against; the configured master when absent.
    #[serde(default)]
    pub wage_grades: Option<Vec<WageGrade>>,
    /// Period 1 carry, for Period 2 requests.
    #[serde(default)]
    pub prior: Option<PriorPeriodCarry>,
    /// Kasbon and bonus adjustment entered for this record.
    #[serde(default)]
    pub adjustment: Option<ManualAdjustment>,
}

impl CalculationRequest {
    /// The key of the record this request computes.
    pub fn record_key(&self) -> RecordKey {
        RecordKey {
            month: self.month.trim().to_string(),
            employee_code: self.employee.code.clone(),
            period: self.period,
            company: self.company.trim().to_string(),
        }
    }

    /// Checks that the request describes a single record and that every
    /// amount, hour and day count is within what the rules can compute.
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee.code.trim().is_empty() {
            return Err(invalid("employee.code", "must not be empty".to_string()));
        }
        if self.month.trim().is_empty() {
            return Err(invalid("month", "must not be empty".to_string()));
        }
        for (index, marker) in self.markers.iter().enumerate() {
            if marker.employee_code.trim() != self.employee.code.trim() {
                return Err(invalid(
                    &format!("markers[{}].employee_code", index),
                    format!(
                        "'{}' does not match employee '{}'",
                        marker.employee_code, self.employee.code
                    ),
                ));
            }
            if marker.period != self.period {
                return Err(invalid(
                    &format!("markers[{}].period", index),
                    format!("{} does not match requested {}", marker.period, self.period),
                ));
            }
            let hours = marker.overtime.as_deref().and_then(parse_overtime_hours);
            if hours.is_some_and(|h| h > Decimal::from(MAX_OVERTIME_HOURS_PER_DAY)) {
                return Err(invalid(
                    &format!("markers[{}].overtime", index),
                    format!("must be at most {} hours", MAX_OVERTIME_HOURS_PER_DAY),
                ));
            }
        }
        for (index, row) in self.wage_grades.iter().flatten().enumerate() {
            if let Some(field) = row.out_of_range_field() {
                return Err(out_of_range(&format!("wage_grades[{}].{}", index, field)));
            }
        }
        if let Some(field) = self.adjustment.as_ref().and_then(|a| a.out_of_range_field()) {
            return Err(out_of_range(&format!("adjustment.{}", field)));
        }
        if let Some(prior) = &self.prior {
            let days = [
                ("prior.company_holidays", prior.company_holidays),
                ("prior.public_holidays", prior.public_holidays),
                ("prior.present_days", prior.present_days),
            ];
            if let Some((field, _)) = days.into_iter().find(|(_, days)| *days > MAX_CARRIED_DAYS) {
                return Err(invalid(field, format!("must be at most {}", MAX_CARRIED_DAYS)));
            }
            if prior.partial_credit > Decimal::from(MAX_CARRIED_DAYS)
                || prior.partial_credit < Decimal::ZERO
            {
                return Err(invalid(
                    "prior.partial_credit",
                    format!("must be between 0 and {}", MAX_CARRIED_DAYS),
                ));
            }
        }
        Ok(())
    }
}

/// Request body for the `/cash-plan` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashPlanRequest {
    /// Net amounts to pay out in cash.
    pub amounts: Vec<Decimal>,
}

impl CashPlanRequest {
    /// Rejects amounts too large to plan.
    pub fn validate(&self) -> EngineResult<()> {
        match self.amounts.iter().position(|amount| !amount_in_range(*amount)) {
            Some(index) => Err(out_of_range(&format!("amounts[{}]", index))),
            None => Ok(()),
        }
    }
}
