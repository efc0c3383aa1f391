//! Absence penalty functionality.
//!
//! A penalized streak costs progressively more per day: the first day costs
//! the base amount and each further day costs one step more than the last.
//! Isolated occurrences cost a flat amount each.

use rust_decimal::Decimal;

use crate::config::PenaltySchedule;

impl PenaltySchedule {
    /// Cost of `n` penalized days: `n*base + step*n*(n-1)/2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::config::PenaltySchedule;
    /// use rust_decimal::Decimal;
    ///
    /// let schedule = PenaltySchedule::default();
    /// assert_eq!(schedule.progressive_cost(3), Decimal::from(36_000));
    /// ```
    pub fn progressive_cost(&self, days: u32) -> Decimal {
        if days == 0 {
            return Decimal::ZERO;
        }
        let n = Decimal::from(days);
        let triangle = Decimal::from(u64::from(days) * u64::from(days - 1) / 2);
        n * self.progressive_base + self.progressive_step * triangle
    }

    /// Cost of `n` isolated occurrences.
    pub fn flat_cost(&self, occurrences: u32) -> Decimal {
        Decimal::from(occurrences) * self.flat
    }
}

/// Progressive penalty under the default schedule (10000 base, 2000 step).
///
/// | days | penalty |
/// |------|---------|
/// | 0    | 0       |
/// | 1    | 10000   |
/// | 2    | 22000   |
/// | 3    | 36000   |
pub fn progressive_penalty(days: u32) -> Decimal {
    PenaltySchedule::default().progressive_cost(days)
}

/// Flat penalty under the default schedule (10000 per occurrence).
pub fn flat_penalty(occurrences: u32) -> Decimal {
    PenaltySchedule::default().flat_cost(occurrences)
}
