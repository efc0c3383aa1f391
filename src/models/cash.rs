//! Cash requirement model for physical payout preparation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The count of one denomination needed for a payout batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationLine {
    /// Face value of the note or coin.
    pub denomination: Decimal,
    /// Number of pieces needed.
    pub count: u32,
    /// `denomination * count`.
    pub subtotal: Decimal,
}

/// Notes and coins needed to pay a batch of net amounts in cash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRequirement {
    /// One line per denomination, largest first.
    pub lines: Vec<DenominationLine>,
    /// Sum of all rounded amounts.
    pub total: Decimal,
    /// Amounts skipped because they were zero, negative or too large to plan.
    pub skipped: u32,
    /// Value the denominations could not cover (zero for the default set).
    pub remainder: Decimal,
}

impl CashRequirement {
    /// Returns the count for a denomination, or zero if it is not in the set.
    pub fn count_of(&self, denomination: Decimal) -> u32 {
        self.lines
            .iter()
            .find(|l| l.denomination == denomination)
            .map(|l| l.count)
            .unwrap_or(0)
    }

    /// Sum of `count * denomination` over all lines.
    pub fn lines_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.subtotal).sum()
    }
}
