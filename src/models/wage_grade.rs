//! Wage-grade master rows and the rates resolved from them.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount_in_range;

/// One row of the wage-grade master, keyed by (grade, month).
///
/// Optional fields are derived when absent; see
/// [`resolve_wage_rates`](crate::calculation::resolve_wage_rates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageGrade {
    /// The grade code, matched case- and whitespace-insensitively.
    pub grade: String,
    /// The month label, matched by containment in either direction.
    pub month: String,
    /// Monthly base salary (gaji pokok).
    #[serde(default)]
    pub monthly_base: Option<Decimal>,
    /// Daily rate.
    #[serde(default)]
    pub daily_rate: Option<Decimal>,
    /// Hourly rate.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Overtime rate per hour.
    #[serde(default)]
    pub overtime_rate: Decimal,
    /// Monthly meal allowance (uang makan).
    #[serde(default)]
    pub meal_allowance: Decimal,
    /// Monthly attendance allowance (uang kehadiran).
    #[serde(default)]
    pub attendance_allowance: Decimal,
    /// Monthly bonus.
    #[serde(default)]
    pub bonus: Decimal,
    /// Explicit daily meal allowance.
    #[serde(default)]
    pub meal_daily: Option<Decimal>,
    /// Explicit daily attendance allowance.
    #[serde(default)]
    pub attendance_daily: Option<Decimal>,
    /// When the row was created; orders rows for the latest-row fallback.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl WageGrade {
    /// The first rate whose magnitude exceeds
    /// [`MAX_AMOUNT_RUPIAH`](super::MAX_AMOUNT_RUPIAH).
    pub fn out_of_range_field(&self) -> Option<&'static str> {
        [
            ("monthly_base", self.monthly_base),
            ("daily_rate", self.daily_rate),
            ("hourly_rate", self.hourly_rate),
            ("overtime_rate", Some(self.overtime_rate)),
            ("meal_allowance", Some(self.meal_allowance)),
            ("attendance_allowance", Some(self.attendance_allowance)),
            ("bonus", Some(self.bonus)),
            ("meal_daily", self.meal_daily),
            ("attendance_daily", self.attendance_daily),
        ]
        .into_iter()
        .find(|(_, rate)| rate.is_some_and(|rate| !amount_in_range(rate)))
        .map(|(field, _)| field)
    }
}

/// Rates ready for component calculation, with every fallback applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRates {
    /// Monthly base salary.
    pub monthly_base: Decimal,
    /// Daily rate.
    pub daily_rate: Decimal,
    /// Hourly rate.
    pub hourly_rate: Decimal,
    /// Overtime rate per hour.
    pub overtime_rate: Decimal,
    /// Monthly meal allowance.
    pub meal_allowance: Decimal,
    /// Monthly attendance allowance.
    pub attendance_allowance: Decimal,
    /// Monthly bonus.
    pub bonus: Decimal,
    /// Daily meal allowance.
    pub meal_daily: Decimal,
    /// Daily attendance allowance.
    pub attendance_daily: Decimal,
}
