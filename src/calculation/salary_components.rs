//! Salary component calculation.
//!
//! This module turns classified attendance and resolved rates into the five
//! salary components and the net payable amount. Two rule styles exist:
//!
//! - **Additive** ([`RuleStyle::Garut`]): base pay per credited day, daily
//!   allowances per worked day, no absence penalties.
//! - **Penalty** ([`RuleStyle::GeneralStaff`], [`RuleStyle::GeneralPabrik`]):
//!   monthly amounts settled in Period 2 and docked for absences.
//!
//! In both styles Period 1 pays only what it earns on its own (base pay for
//! the additive style, overtime for both) and the month settles in Period 2.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::models::{
    AuditStep, ClassifiedAttendance, ComponentLine, Deduction, EmployeeClass, ManualAdjustment,
    PayPeriod, PriorPeriodCarry, ResolvedRates, RuleStyle, SalaryComponent, SalaryComponents,
};

use super::wage_rate::round_rupiah;

/// Everything the calculator needs for one employee and period.
#[derive(Debug, Clone, Copy)]
pub struct SalaryInput<'a> {
    /// Classified attendance for the period.
    pub attendance: &'a ClassifiedAttendance,
    /// Resolved rates for the period's grade.
    pub rates: &'a ResolvedRates,
    /// Staff or non-staff.
    pub class: EmployeeClass,
    /// The period being computed.
    pub period: PayPeriod,
    /// Period 1 counts; zero when computing Period 1.
    pub prior: &'a PriorPeriodCarry,
    /// Manual adjustments to carry through.
    pub adjustment: &'a ManualAdjustment,
}

/// The result of a salary component calculation.
#[derive(Debug, Clone)]
pub struct SalaryCalculationResult {
    /// One line per component, in component order.
    pub lines: Vec<ComponentLine>,
    /// Component totals.
    pub components: SalaryComponents,
    /// Net payable amount.
    pub hasil_gaji: Decimal,
    /// One audit step per component plus one for the net amount.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates the five salary components and the net payable amount.
///
/// `hasil_gaji = gapok + gaji_lembur + uang_makan + uang_kehadiran +
/// uang_bonus - kasbon + penyesuaian_bonus`. The adjustment is read, never
/// modified. The same input always yields the same result.
///
/// # Arguments
///
/// * `input` - Attendance, rates, class, period, prior carry and adjustment
/// * `style` - The site's rule style
/// * `config` - Calendar constants and penalty schedule
/// * `step_number` - The first step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_salary_components, SalaryInput};
/// use payroll_engine::config::EngineConfig;
/// use payroll_engine::models::*;
/// use rust_decimal::Decimal;
///
/// let attendance = ClassifiedAttendance { present_days: 10, ..Default::default() };
/// let rates = ResolvedRates { daily_rate: Decimal::from(100_000), ..Default::default() };
/// let input = SalaryInput {
///     attendance: &attendance,
///     rates: &rates,
///     class: EmployeeClass::NonStaff,
///     period: PayPeriod::Period1,
///     prior: &PriorPeriodCarry::default(),
///     adjustment: &ManualAdjustment::default(),
/// };
///
/// let result = calculate_salary_components(&input, RuleStyle::Garut, &EngineConfig::default(), 1);
/// assert_eq!(result.components.gapok, Decimal::from(1_000_000));
/// ```
pub fn calculate_salary_components(
    input: &SalaryInput<'_>,
    style: RuleStyle,
    config: &EngineConfig,
    step_number: u32,
) -> SalaryCalculationResult {
    let lines = match style {
        RuleStyle::Garut => additive_lines(input),
        RuleStyle::GeneralStaff => penalty_lines(input, config, false),
        RuleStyle::GeneralPabrik => penalty_lines(input, config, true),
    };

    let components = SalaryComponents::from_lines(&lines);
    let hasil_gaji =
        components.total() - input.adjustment.kasbon + input.adjustment.penyesuaian_bonus;

    let mut audit_steps: Vec<AuditStep> = lines
        .iter()
        .zip(step_number..)
        .map(|(line, step)| line_step(line, style, input.period, step))
        .collect();

    let net_step = step_number + lines.len() as u32;
    audit_steps.push(AuditStep {
        step_number: net_step,
        rule_id: "hasil_gaji".to_string(),
        rule_name: "Net Salary".to_string(),
        input: serde_json::json!({
            "components_total": components.total().to_string(),
            "kasbon": input.adjustment.kasbon.to_string(),
            "penyesuaian_bonus": input.adjustment.penyesuaian_bonus.to_string(),
        }),
        output: serde_json::json!({ "hasil_gaji": hasil_gaji.to_string() }),
        reasoning: format!(
            "{} - kasbon {} + penyesuaian {} = {}",
            components.total(),
            input.adjustment.kasbon,
            input.adjustment.penyesuaian_bonus,
            hasil_gaji
        ),
    });

    SalaryCalculationResult {
        lines,
        components,
        hasil_gaji,
        audit_steps,
    }
}

fn overtime_line(input: &SalaryInput<'_>) -> ComponentLine {
    ComponentLine::plain(
        SalaryComponent::GajiLembur,
        input.attendance.overtime_hours,
        input.rates.overtime_rate,
    )
}

fn deferred_lines(lines: &mut Vec<ComponentLine>) {
    lines.extend([
        ComponentLine::zero(SalaryComponent::UangMakan),
        ComponentLine::zero(SalaryComponent::UangKehadiran),
        ComponentLine::zero(SalaryComponent::UangBonus),
    ]);
}

/// Additive style.
fn additive_lines(input: &SalaryInput<'_>) -> Vec<ComponentLine> {
    let attendance = input.attendance;
    let rates = input.rates;

    let gapok_days = attendance.worked_days() + Decimal::from(attendance.holidays());
    let mut lines = vec![
        ComponentLine::plain(SalaryComponent::Gapok, gapok_days, rates.daily_rate),
        overtime_line(input),
    ];

    if !input.period.is_settlement() {
        deferred_lines(&mut lines);
        return lines;
    }

    // Allowances settle the whole month: Period 1 worked days carry forward.
    let allowance_days = attendance.worked_days() + input.prior.worked_days();
    lines.extend([
        ComponentLine::plain(SalaryComponent::UangMakan, allowance_days, rates.meal_daily),
        ComponentLine::plain(
            SalaryComponent::UangKehadiran,
            allowance_days,
            rates.attendance_daily,
        ),
        ComponentLine::plain(SalaryComponent::UangBonus, Decimal::ONE, rates.bonus),
    ]);
    lines
}

/// Penalty style. `cumulative_holidays` enables the holiday deduction of
/// the general pabrik variant.
fn penalty_lines(
    input: &SalaryInput<'_>,
    config: &EngineConfig,
    cumulative_holidays: bool,
) -> Vec<ComponentLine> {
    let rates = input.rates;

    if !input.period.is_settlement() {
        let mut lines = vec![ComponentLine::zero(SalaryComponent::Gapok), overtime_line(input)];
        deferred_lines(&mut lines);
        return lines;
    }

    if input.class == EmployeeClass::Staff {
        return vec![
            ComponentLine::plain(SalaryComponent::Gapok, Decimal::ONE, rates.monthly_base),
            overtime_line(input),
            ComponentLine::plain(SalaryComponent::UangMakan, Decimal::ONE, rates.meal_allowance),
            ComponentLine::plain(
                SalaryComponent::UangKehadiran,
                Decimal::ONE,
                rates.attendance_allowance,
            ),
            ComponentLine::plain(SalaryComponent::UangBonus, Decimal::ONE, rates.bonus),
        ];
    }

    let a = input.attendance;
    let penalties = config.penalties();
    let holiday_days = if cumulative_holidays {
        a.holidays() + input.prior.holidays()
    } else {
        0
    };

    let gapok = docked(
        SalaryComponent::Gapok,
        rates.monthly_base,
        base_pay_deductions(a, rates.monthly_base, config),
    );

    let mut meal_deductions = vec![
        deduction(
            "progressive_sick",
            format!("{} penalized sick days", a.sick.penalized),
            penalties.progressive_cost(a.sick.penalized),
        ),
        deduction(
            "progressive_leave",
            format!("{} penalized leave days", a.leave.penalized),
            penalties.progressive_cost(a.leave.penalized),
        ),
        deduction(
            "progressive_unexplained",
            format!("{} penalized unexplained days", a.unexplained.penalized),
            penalties.progressive_cost(a.unexplained.penalized),
        ),
    ];
    let meal_isolated = a.leave.isolated + a.sick.isolated + a.unexplained.isolated;
    meal_deductions.push(deduction(
        "flat_isolated",
        format!("{} isolated absences (I, S, T)", meal_isolated),
        penalties.flat_cost(meal_isolated),
    ));
    meal_deductions.push(holiday_deduction(holiday_days, rates.meal_daily));
    let meal = docked(
        SalaryComponent::UangMakan,
        rates.meal_allowance,
        meal_deductions,
    );

    // Isolated sick days do not reduce the attendance allowance.
    let attendance_isolated = a.leave.isolated + a.unexplained.isolated;
    let attendance = docked(
        SalaryComponent::UangKehadiran,
        rates.attendance_allowance,
        vec![
            deduction(
                "progressive_leave",
                format!("{} penalized leave days", a.leave.penalized),
                penalties.progressive_cost(a.leave.penalized),
            ),
            deduction(
                "progressive_unexplained",
                format!("{} penalized unexplained days", a.unexplained.penalized),
                penalties.progressive_cost(a.unexplained.penalized),
            ),
            deduction(
                "flat_isolated",
                format!("{} isolated absences (I, T)", attendance_isolated),
                penalties.flat_cost(attendance_isolated),
            ),
            holiday_deduction(holiday_days, rates.attendance_daily),
        ],
    );

    // Penalized leave is not part of the forfeiture trigger.
    let incidents = a.leave.isolated
        + a.sick.penalized
        + a.sick.isolated
        + a.unexplained.penalized
        + a.unexplained.isolated;
    let bonus = docked(
        SalaryComponent::UangBonus,
        rates.bonus,
        vec![if incidents > 0 {
            deduction(
                "bonus_forfeited",
                format!("{} sick, unexplained or isolated leave days", incidents),
                rates.bonus,
            )
        } else {
            None
        }],
    );

    vec![gapok, overtime_line(input), meal, attendance, bonus]
}

/// `pot_hari` and `pot_jam` for non-staff base pay.
fn base_pay_deductions(
    a: &ClassifiedAttendance,
    monthly_base: Decimal,
    config: &EngineConfig,
) -> Vec<Option<Deduction>> {
    let days = Decimal::from(config.calendar().days_per_month);
    let hours = Decimal::from(config.calendar().hours_per_day);

    let absences = a.total_absences();
    let pot_hari = deduction(
        "pot_hari",
        format!("{} absence days at monthly base / {}", absences, days),
        round_rupiah(Decimal::from(absences) * monthly_base / days),
    );

    let credited = a.partial_credit;
    let pot_jam = if credited > Decimal::ZERO && credited < hours {
        let missing = hours - credited;
        deduction(
            "pot_jam",
            format!("{} hours short of a {}-hour day", missing.normalize(), hours),
            round_rupiah(missing * monthly_base / (days * hours)),
        )
    } else {
        None
    };

    vec![pot_hari, pot_jam]
}

fn holiday_deduction(days: u32, daily: Decimal) -> Option<Deduction> {
    deduction(
        "holiday_days",
        format!("{} LP/TM days across both periods", days),
        Decimal::from(days) * daily,
    )
}

/// A deduction, or `None` when the amount is zero.
fn deduction(code: &str, description: String, amount: Decimal) -> Option<Deduction> {
    (!amount.is_zero()).then(|| Deduction {
        code: code.to_string(),
        description,
        amount,
    })
}

/// A monthly amount less its deductions, clamped at zero.
fn docked(
    component: SalaryComponent,
    gross: Decimal,
    deductions: Vec<Option<Deduction>>,
) -> ComponentLine {
    let deductions: Vec<Deduction> = deductions.into_iter().flatten().collect();
    let total: Decimal = deductions.iter().map(|d| d.amount).sum();

    ComponentLine {
        component,
        units: Decimal::ONE,
        rate: gross,
        gross,
        deductions,
        amount: (gross - total).max(Decimal::ZERO),
    }
}

fn component_names(component: SalaryComponent) -> (&'static str, &'static str) {
    match component {
        SalaryComponent::Gapok => ("gapok", "Gaji Pokok"),
        SalaryComponent::GajiLembur => ("gaji_lembur", "Gaji Lembur"),
        SalaryComponent::UangMakan => ("uang_makan", "Uang Makan"),
        SalaryComponent::UangKehadiran => ("uang_kehadiran", "Uang Kehadiran"),
        SalaryComponent::UangBonus => ("uang_bonus", "Uang Bonus"),
    }
}

fn line_step(line: &ComponentLine, style: RuleStyle, period: PayPeriod, step_number: u32) -> AuditStep {
    let (rule_id, rule_name) = component_names(line.component);

    let reasoning = if line.gross.is_zero() && line.deductions.is_empty() {
        format!("{}: nothing payable in {}", rule_name, period)
    } else if line.deductions.is_empty() {
        format!(
            "{}: {} x {} = {} ({})",
            rule_name,
            line.units.normalize(),
            line.rate,
            line.amount,
            style
        )
    } else {
        let applied = line
            .deductions
            .iter()
            .map(|d| format!("{} {}", d.code, d.amount))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}: {} less {} = {} ({})",
            rule_name, line.gross, applied, line.amount, style
        )
    };

    AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "style": style,
            "period": period,
            "units": line.units.to_string(),
            "rate": line.rate.to_string(),
        }),
        output: serde_json::json!({
            "gross": line.gross.to_string(),
            "deductions": line.deductions,
            "amount": line.amount.to_string(),
        }),
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AbsenceCount;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Grade A, Oktober 2025, as resolved from the daily rate.
    fn grade_a() -> ResolvedRates {
        ResolvedRates {
            monthly_base: dec("2600000"),
            daily_rate: dec("100000"),
            hourly_rate: dec("12500"),
            overtime_rate: dec("15000"),
            meal_allowance: dec("130000"),
            attendance_allowance: dec("130000"),
            bonus: dec("50000"),
            meal_daily: dec("5000"),
            attendance_daily: dec("5000"),
        }
    }

    fn scenario_attendance() -> ClassifiedAttendance {
        ClassifiedAttendance {
            present_days: 20,
            partial_credit: dec("8"),
            sick: AbsenceCount { penalized: 2, isolated: 0 },
            leave: AbsenceCount { penalized: 0, isolated: 1 },
            overtime_hours: dec("3"),
            ..Default::default()
        }
    }

    fn calculate(
        attendance: &ClassifiedAttendance,
        class: EmployeeClass,
        period: PayPeriod,
        prior: &PriorPeriodCarry,
        adjustment: &ManualAdjustment,
        style: RuleStyle,
    ) -> SalaryCalculationResult {
        let rates = grade_a();
        let input = SalaryInput {
            attendance,
            rates: &rates,
            class,
            period,
            prior,
            adjustment,
        };
        calculate_salary_components(&input, style, &EngineConfig::default(), 1)
    }

    fn find(result: &SalaryCalculationResult, component: SalaryComponent) -> &ComponentLine {
        result
            .lines
            .iter()
            .find(|l| l.component == component)
            .unwrap()
    }

    /// SC-001: the documented Period 2 non-staff settlement
    #[test]
    fn test_general_staff_end_to_end_scenario() {
        let prior = PriorPeriodCarry {
            company_holidays: 1,
            ..Default::default()
        };
        let adjustment = ManualAdjustment {
            kasbon: dec("20000"),
            penyesuaian_bonus: Decimal::ZERO,
        };

        let result = calculate(
            &scenario_attendance(),
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &prior,
            &adjustment,
            RuleStyle::GeneralStaff,
        );

        assert_eq!(result.components.gapok, dec("2300000"));
        assert_eq!(result.components.gaji_lembur, dec("45000"));
        assert_eq!(result.components.uang_makan, dec("98000"));
        assert_eq!(result.components.uang_kehadiran, dec("120000"));
        assert_eq!(result.components.uang_bonus, Decimal::ZERO);
        assert_eq!(result.hasil_gaji, dec("2543000"));
    }

    #[test]
    fn test_breakdown_explains_deductions() {
        let result = calculate(
            &scenario_attendance(),
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );

        let gapok = find(&result, SalaryComponent::Gapok);
        assert_eq!(gapok.gross, dec("2600000"));
        assert_eq!(gapok.deductions.len(), 1);
        assert_eq!(gapok.deductions[0].code, "pot_hari");
        assert_eq!(gapok.deductions[0].amount, dec("300000"));

        let meal = find(&result, SalaryComponent::UangMakan);
        let codes: Vec<&str> = meal.deductions.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["progressive_sick", "flat_isolated"]);
        assert_eq!(meal.total_deductions(), dec("32000"));

        let bonus = find(&result, SalaryComponent::UangBonus);
        assert_eq!(bonus.deductions[0].code, "bonus_forfeited");
        assert_eq!(bonus.amount, Decimal::ZERO);
    }

    #[test]
    fn test_lines_are_in_component_order_and_sum_to_components() {
        let result = calculate(
            &scenario_attendance(),
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralPabrik,
        );

        let order: Vec<SalaryComponent> = result.lines.iter().map(|l| l.component).collect();
        assert_eq!(
            order,
            vec![
                SalaryComponent::Gapok,
                SalaryComponent::GajiLembur,
                SalaryComponent::UangMakan,
                SalaryComponent::UangKehadiran,
                SalaryComponent::UangBonus,
            ]
        );
        let sum: Decimal = result.lines.iter().map(|l| l.amount).sum();
        assert_eq!(sum, result.components.total());
    }

    #[test]
    fn test_recalculation_is_identical() {
        let adjustment = ManualAdjustment {
            kasbon: dec("15000"),
            penyesuaian_bonus: dec("-5000"),
        };
        let run = || {
            calculate(
                &scenario_attendance(),
                EmployeeClass::NonStaff,
                PayPeriod::Period2,
                &PriorPeriodCarry::default(),
                &adjustment,
                RuleStyle::GeneralPabrik,
            )
        };

        let (first, second) = (run(), run());
        assert_eq!(first.lines, second.lines);
        assert_eq!(first.hasil_gaji, second.hasil_gaji);
        assert_eq!(first.audit_steps, second.audit_steps);
    }

    /// SC-002: one penalized sick day forfeits the bonus on its own
    #[test]
    fn test_bonus_forfeited_by_single_sick_streak_day() {
        let attendance = ClassifiedAttendance {
            sick: AbsenceCount { penalized: 1, isolated: 0 },
            ..Default::default()
        };
        let result = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );
        assert_eq!(result.components.uang_bonus, Decimal::ZERO);
    }

    #[test]
    fn test_bonus_kept_when_only_penalized_leave() {
        let attendance = ClassifiedAttendance {
            leave: AbsenceCount { penalized: 2, isolated: 0 },
            ..Default::default()
        };
        let result = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );
        assert_eq!(result.components.uang_bonus, dec("50000"));
        // i_b still reduces both allowances.
        assert_eq!(result.components.uang_makan, dec("108000"));
        assert_eq!(result.components.uang_kehadiran, dec("108000"));
    }

    #[test]
    fn test_isolated_sick_reduces_meal_but_not_attendance() {
        let attendance = ClassifiedAttendance {
            sick: AbsenceCount { penalized: 0, isolated: 2 },
            ..Default::default()
        };
        let result = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );
        assert_eq!(result.components.uang_makan, dec("110000"));
        assert_eq!(result.components.uang_kehadiran, dec("130000"));
    }

    #[test]
    fn test_pot_jam_for_partial_hours() {
        let attendance = ClassifiedAttendance {
            present_days: 25,
            partial_credit: dec("4"),
            ..Default::default()
        };
        let result = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );

        // 4 missing hours x 2600000 / 208 = 50000
        let gapok = find(&result, SalaryComponent::Gapok);
        assert_eq!(gapok.deductions[0].code, "pot_jam");
        assert_eq!(gapok.amount, dec("2550000"));
    }

    #[test]
    fn test_large_penalties_clamp_at_zero() {
        let attendance = ClassifiedAttendance {
            sick: AbsenceCount { penalized: 20, isolated: 0 },
            unexplained: AbsenceCount { penalized: 10, isolated: 0 },
            ..Default::default()
        };
        let result = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );

        assert_eq!(result.components.gapok, Decimal::ZERO);
        assert_eq!(result.components.uang_makan, Decimal::ZERO);
        assert_eq!(result.components.uang_kehadiran, Decimal::ZERO);
    }

    #[test]
    fn test_staff_receive_monthly_amounts_unmodified() {
        let result = calculate(
            &scenario_attendance(),
            EmployeeClass::Staff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralPabrik,
        );

        assert_eq!(result.components.gapok, dec("2600000"));
        assert_eq!(result.components.uang_makan, dec("130000"));
        assert_eq!(result.components.uang_kehadiran, dec("130000"));
        assert_eq!(result.components.uang_bonus, dec("50000"));
        assert_eq!(result.components.gaji_lembur, dec("45000"));
    }

    #[test]
    fn test_penalty_style_period1_pays_overtime_only() {
        let result = calculate(
            &scenario_attendance(),
            EmployeeClass::NonStaff,
            PayPeriod::Period1,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );

        assert_eq!(result.components.gapok, Decimal::ZERO);
        assert_eq!(result.components.gaji_lembur, dec("45000"));
        assert_eq!(result.components.total(), dec("45000"));
    }

    #[test]
    fn test_general_pabrik_deducts_holidays_across_periods() {
        let attendance = ClassifiedAttendance {
            company_holidays: 1,
            public_holidays: 1,
            ..Default::default()
        };
        let prior = PriorPeriodCarry {
            company_holidays: 1,
            public_holidays: 0,
            ..Default::default()
        };

        let pabrik = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &prior,
            &ManualAdjustment::default(),
            RuleStyle::GeneralPabrik,
        );
        let staff = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &prior,
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );

        // 3 holiday days x 5000
        assert_eq!(pabrik.components.uang_makan, dec("115000"));
        assert_eq!(pabrik.components.uang_kehadiran, dec("115000"));
        assert_eq!(staff.components.uang_makan, dec("130000"));
    }

    #[test]
    fn test_garut_period1_pays_credited_days_only() {
        let attendance = ClassifiedAttendance {
            present_days: 10,
            partial_credit: dec("0.5"),
            company_holidays: 1,
            public_holidays: 1,
            overtime_hours: dec("2"),
            ..Default::default()
        };
        let result = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period1,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::Garut,
        );

        assert_eq!(result.components.gapok, dec("1250000"));
        assert_eq!(result.components.gaji_lembur, dec("30000"));
        assert_eq!(result.components.uang_makan, Decimal::ZERO);
        assert_eq!(result.components.uang_bonus, Decimal::ZERO);
    }

    #[test]
    fn test_garut_period2_settles_allowances_for_month() {
        let attendance = ClassifiedAttendance {
            present_days: 11,
            company_holidays: 1,
            sick: AbsenceCount { penalized: 2, isolated: 0 },
            ..Default::default()
        };
        let prior = PriorPeriodCarry {
            present_days: 12,
            partial_credit: dec("0.5"),
            company_holidays: 2,
            public_holidays: 0,
        };
        let result = calculate(
            &attendance,
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &prior,
            &ManualAdjustment::default(),
            RuleStyle::Garut,
        );

        // Base: (11 + 1) x 100000; allowances: (11 + 12.5) x 5000
        assert_eq!(result.components.gapok, dec("1200000"));
        assert_eq!(result.components.uang_makan, dec("117500"));
        assert_eq!(result.components.uang_kehadiran, dec("117500"));
        // No penalties in the additive style.
        assert_eq!(result.components.uang_bonus, dec("50000"));
    }

    #[test]
    fn test_adjustments_pass_through() {
        let adjustment = ManualAdjustment {
            kasbon: dec("100000"),
            penyesuaian_bonus: dec("25000"),
        };
        let result = calculate(
            &ClassifiedAttendance::default(),
            EmployeeClass::Staff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &adjustment,
            RuleStyle::GeneralStaff,
        );

        // 2600000 + 130000 + 130000 + 50000 - 100000 + 25000
        assert_eq!(result.hasil_gaji, dec("2835000"));
    }

    #[test]
    fn test_audit_steps_one_per_line_plus_net() {
        let result = calculate(
            &scenario_attendance(),
            EmployeeClass::NonStaff,
            PayPeriod::Period2,
            &PriorPeriodCarry::default(),
            &ManualAdjustment::default(),
            RuleStyle::GeneralStaff,
        );

        assert_eq!(result.audit_steps.len(), 6);
        assert_eq!(result.audit_steps[0].rule_id, "gapok");
        assert_eq!(result.audit_steps[0].step_number, 1);
        assert_eq!(result.audit_steps[5].rule_id, "hasil_gaji");
        assert_eq!(result.audit_steps[5].step_number, 6);
    }

    proptest! {
        #[test]
        fn docked_components_never_negative(
            s_b in 0u32..30, s_tb in 0u32..30,
            i_b in 0u32..30, i_tb in 0u32..30,
            t_b in 0u32..30, t_tb in 0u32..30,
            lp in 0u32..10, prior_lp in 0u32..10,
            hours in 0u32..8,
        ) {
            let attendance = ClassifiedAttendance {
                partial_credit: Decimal::from(hours),
                company_holidays: lp,
                sick: AbsenceCount { penalized: s_b, isolated: s_tb },
                leave: AbsenceCount { penalized: i_b, isolated: i_tb },
                unexplained: AbsenceCount { penalized: t_b, isolated: t_tb },
                ..Default::default()
            };
            let prior = PriorPeriodCarry { company_holidays: prior_lp, ..Default::default() };

            for style in [RuleStyle::GeneralStaff, RuleStyle::GeneralPabrik] {
                let result = calculate(
                    &attendance,
                    EmployeeClass::NonStaff,
                    PayPeriod::Period2,
                    &prior,
                    &ManualAdjustment::default(),
                    style,
                );
                prop_assert!(result.components.gapok >= Decimal::ZERO);
                prop_assert!(result.components.uang_makan >= Decimal::ZERO);
                prop_assert!(result.components.uang_kehadiran >= Decimal::ZERO);
                prop_assert!(result.components.uang_bonus >= Decimal::ZERO);
            }
        }
    }
}
