//! Cash denomination planning functionality.
//!
//! Net salaries paid in cash are rounded up to a half or whole thousand and
//! then broken down greedily into notes and coins, largest first.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::CashPolicy;
use crate::models::{CashRequirement, DenominationLine};

/// Rounds an amount up within steps of `unit`, stopping at the half step.
///
/// With the default 1000/500 policy: exact thousands are unchanged, a
/// remainder below 500 rounds up to the next 500, anything else rounds up to
/// the next 1000. Returns `None` when the rounded value is not representable.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::stepped_round_up;
/// use payroll_engine::config::CashPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = CashPolicy::default();
/// assert_eq!(stepped_round_up(Decimal::from(100_499), &policy), Some(Decimal::from(100_500)));
/// assert_eq!(stepped_round_up(Decimal::from(100_500), &policy), Some(Decimal::from(101_000)));
/// assert_eq!(stepped_round_up(Decimal::MAX, &policy), None);
/// ```
pub fn stepped_round_up(value: Decimal, policy: &CashPolicy) -> Option<Decimal> {
    let unit = policy.rounding_unit;
    let base = value.checked_div(unit)?.floor().checked_mul(unit)?;
    let remainder = value.checked_sub(base)?;

    if remainder.is_zero() {
        Some(value)
    } else if remainder < policy.rounding_half_step {
        base.checked_add(policy.rounding_half_step)
    } else {
        base.checked_add(unit)
    }
}

/// One amount broken down over the policy's denominations.
struct Breakdown {
    rounded: Decimal,
    pieces: Vec<u32>,
    left: Decimal,
}

fn break_down(amount: Decimal, policy: &CashPolicy) -> Option<Breakdown> {
    let rounded = stepped_round_up(amount, policy)?;
    let mut left = rounded;
    let mut pieces = Vec::with_capacity(policy.denominations.len());

    for &denomination in &policy.denominations {
        let count = left.checked_div(denomination)?.floor();
        pieces.push(count.to_u32()?);
        left = left.checked_sub(count.checked_mul(denomination)?)?;
    }

    Some(Breakdown {
        rounded,
        pieces,
        left,
    })
}

/// Counts the notes and coins needed to pay every amount in cash.
///
/// Each positive amount is rounded with [`stepped_round_up`] and decomposed
/// greedily over the policy's denominations; the per-denomination counts are
/// summed across amounts. Zero and negative amounts are skipped and counted
/// in `skipped`, as are amounts whose rounding, piece counts or running
/// totals would overflow.
pub fn plan_cash(amounts: &[Decimal], policy: &CashPolicy) -> CashRequirement {
    let mut counts = vec![0u32; policy.denominations.len()];
    let mut total = Decimal::ZERO;
    let mut remainder = Decimal::ZERO;
    let mut skipped = 0u32;

    for amount in amounts {
        if *amount <= Decimal::ZERO {
            skipped = skipped.saturating_add(1);
            continue;
        }

        let merged = break_down(*amount, policy).and_then(|breakdown| {
            let next_counts = counts
                .iter()
                .zip(&breakdown.pieces)
                .map(|(count, pieces)| count.checked_add(*pieces))
                .collect::<Option<Vec<u32>>>()?;
            Some((
                next_counts,
                total.checked_add(breakdown.rounded)?,
                remainder.checked_add(breakdown.left)?,
            ))
        });

        match merged {
            Some((next_counts, next_total, next_remainder)) => {
                counts = next_counts;
                total = next_total;
                remainder = next_remainder;
            }
            None => skipped = skipped.saturating_add(1),
        }
    }

    let lines = policy
        .denominations
        .iter()
        .zip(counts)
        .map(|(denomination, count)| DenominationLine {
            denomination: *denomination,
            count,
            subtotal: *denomination * Decimal::from(count),
        })
        .collect();

    CashRequirement {
        lines,
        total,
        skipped,
        remainder,
    }
}
