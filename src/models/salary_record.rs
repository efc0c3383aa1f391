//! Salary record models.
//!
//! This module contains [`EmployeeSalaryRecord`] and the structures that make
//! up its components, manual adjustments and line-item breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AuditWarning, ClassifiedAttendance, PayPeriod};

/// Largest magnitude, in rupiah, accepted for any amount entering the engine.
pub const MAX_AMOUNT_RUPIAH: i64 = 1_000_000_000_000_000;

/// Whether an amount's magnitude is at most [`MAX_AMOUNT_RUPIAH`].
pub fn amount_in_range(amount: Decimal) -> bool {
    amount.abs() <= Decimal::from(MAX_AMOUNT_RUPIAH)
}

/// The salary rule convention of a factory site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStyle {
    /// Additive rules: pay per day credited, no absence penalties.
    Garut,
    /// Penalty rules: monthly amounts docked for absences in Period 2.
    GeneralStaff,
    /// Penalty rules where holidays across both periods also reduce the
    /// meal and attendance allowances.
    GeneralPabrik,
}

impl fmt::Display for RuleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleStyle::Garut => "garut",
            RuleStyle::GeneralStaff => "general_staff",
            RuleStyle::GeneralPabrik => "general_pabrik",
        };
        f.write_str(name)
    }
}

/// The five salary components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryComponent {
    /// Base pay.
    Gapok,
    /// Overtime pay.
    GajiLembur,
    /// Meal allowance.
    UangMakan,
    /// Attendance allowance.
    UangKehadiran,
    /// Bonus.
    UangBonus,
}

/// One deduction applied to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// A code identifying the deduction (e.g. "progressive_sick").
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// The amount deducted.
    pub amount: Decimal,
}

/// A line item explaining how one component was computed.
///
/// `amount` is `max(0, gross - sum(deductions))`. A forfeited component
/// carries a single deduction equal to its gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLine {
    /// Which component this line explains.
    pub component: SalaryComponent,
    /// Units the rate applies to (days, hours, or 1 for monthly amounts).
    pub units: Decimal,
    /// The rate per unit.
    pub rate: Decimal,
    /// Amount before deductions.
    pub gross: Decimal,
    /// Deductions applied, in order.
    pub deductions: Vec<Deduction>,
    /// The final component amount.
    pub amount: Decimal,
}

impl ComponentLine {
    /// A line with no deductions. The gross saturates at `Decimal::MAX`.
    pub fn plain(component: SalaryComponent, units: Decimal, rate: Decimal) -> Self {
        let gross = units.saturating_mul(rate);
        Self {
            component,
            units,
            rate,
            gross,
            deductions: vec![],
            amount: gross,
        }
    }

    /// A line fixed at zero (component not paid in this period).
    pub fn zero(component: SalaryComponent) -> Self {
        Self::plain(component, Decimal::ZERO, Decimal::ZERO)
    }

    /// Sum of all deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.iter().map(|d| d.amount).sum()
    }
}

/// The five computed salary components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponents {
    /// Base pay.
    pub gapok: Decimal,
    /// Overtime pay.
    pub gaji_lembur: Decimal,
    /// Meal allowance.
    pub uang_makan: Decimal,
    /// Attendance allowance.
    pub uang_kehadiran: Decimal,
    /// Bonus.
    pub uang_bonus: Decimal,
}

impl SalaryComponents {
    /// Builds the component totals from breakdown lines.
    pub fn from_lines(lines: &[ComponentLine]) -> Self {
        let mut components = SalaryComponents::default();
        for line in lines {
            let slot = match line.component {
                SalaryComponent::Gapok => &mut components.gapok,
                SalaryComponent::GajiLembur => &mut components.gaji_lembur,
                SalaryComponent::UangMakan => &mut components.uang_makan,
                SalaryComponent::UangKehadiran => &mut components.uang_kehadiran,
                SalaryComponent::UangBonus => &mut components.uang_bonus,
            };
            *slot += line.amount;
        }
        components
    }

    /// Sum of all five components.
    pub fn total(&self) -> Decimal {
        self.gapok + self.gaji_lembur + self.uang_makan + self.uang_kehadiran + self.uang_bonus
    }
}

/// Manually entered adjustments, owned by an external store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAdjustment {
    /// Salary advance to deduct.
    #[serde(default)]
    pub kasbon: Decimal,
    /// Signed bonus adjustment.
    #[serde(default)]
    pub penyesuaian_bonus: Decimal,
}

impl ManualAdjustment {
    /// The first field whose magnitude exceeds [`MAX_AMOUNT_RUPIAH`].
    pub fn out_of_range_field(&self) -> Option<&'static str> {
        [
            ("kasbon", self.kasbon),
            ("penyesuaian_bonus", self.penyesuaian_bonus),
        ]
        .into_iter()
        .find(|(_, amount)| !amount_in_range(*amount))
        .map(|(field, _)| field)
    }
}

/// Period 1 counts read forward into Period 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorPeriodCarry {
    /// Period 1 company holidays (`lp`).
    #[serde(default)]
    pub company_holidays: u32,
    /// Period 1 public holidays (`tm`).
    #[serde(default)]
    pub public_holidays: u32,
    /// Period 1 full-day presences (`h`).
    #[serde(default)]
    pub present_days: u32,
    /// Period 1 partial-day credits (`set_h`).
    #[serde(default)]
    pub partial_credit: Decimal,
}

impl PriorPeriodCarry {
    /// Extracts the carried counts from a classified Period 1.
    pub fn from_attendance(attendance: &ClassifiedAttendance) -> Self {
        Self {
            company_holidays: attendance.company_holidays,
            public_holidays: attendance.public_holidays,
            present_days: attendance.present_days,
            partial_credit: attendance.partial_credit,
        }
    }

    /// Company plus public holidays.
    pub fn holidays(&self) -> u32 {
        self.company_holidays + self.public_holidays
    }

    /// Full and partial days worked.
    pub fn worked_days(&self) -> Decimal {
        Decimal::from(self.present_days) + self.partial_credit
    }
}

/// The natural key of a salary record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Month label.
    pub month: String,
    /// Employee code.
    pub employee_code: String,
    /// Pay period.
    pub period: PayPeriod,
    /// Company (legal entity).
    pub company: String,
}

impl RecordKey {
    /// The same key for another period.
    pub fn with_period(&self, period: PayPeriod) -> Self {
        Self {
            period,
            ..self.clone()
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.month, self.employee_code, self.company, self.period
        )
    }
}

/// The computed salary for one employee, month, period and company.
///
/// Recomputing with the same inputs yields an identical record; the manual
/// adjustment is copied from its store, never produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSalaryRecord {
    /// Natural key.
    pub key: RecordKey,
    /// The wage grade the rates were resolved for.
    pub grade: String,
    /// The rule style that produced the components.
    pub rule_style: RuleStyle,
    /// The classified attendance snapshot.
    pub attendance: ClassifiedAttendance,
    /// The five components.
    pub components: SalaryComponents,
    /// Manual adjustments carried through unchanged.
    pub adjustment: ManualAdjustment,
    /// Net payable: components - kasbon + penyesuaian_bonus.
    pub hasil_gaji: Decimal,
    /// One line per component.
    pub breakdown: Vec<ComponentLine>,
    /// Data-quality warnings raised while computing this record.
    pub warnings: Vec<AuditWarning>,
}

impl EmployeeSalaryRecord {
    /// The counts Period 2 reads forward from this record.
    pub fn prior_carry(&self) -> PriorPeriodCarry {
        PriorPeriodCarry::from_attendance(&self.attendance)
    }

    /// Whether any warning was raised.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
