//! Pay period model.
//!
//! A calendar month is paid in two periods. Period 2 settles the month and
//! depends on counts carried over from Period 1.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two pay periods within a calendar month.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
///
/// assert_eq!(PayPeriod::Period2.previous(), Some(PayPeriod::Period1));
/// assert!(PayPeriod::Period2.is_settlement());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPeriod {
    /// First half of the month (Periode 1).
    Period1,
    /// Second half of the month (Periode 2).
    Period2,
}

impl PayPeriod {
    /// Both periods in computation order.
    pub const ALL: [PayPeriod; 2] = [PayPeriod::Period1, PayPeriod::Period2];

    /// The period whose counts this period reads forward, if any.
    pub fn previous(&self) -> Option<PayPeriod> {
        match self {
            PayPeriod::Period1 => None,
            PayPeriod::Period2 => Some(PayPeriod::Period1),
        }
    }

    /// Whether allowances, bonus and penalties settle in this period.
    pub fn is_settlement(&self) -> bool {
        matches!(self, PayPeriod::Period2)
    }

    /// The numeric label used by the record store (1 or 2).
    pub fn number(&self) -> u8 {
        match self {
            PayPeriod::Period1 => 1,
            PayPeriod::Period2 => 2,
        }
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "periode {}", self.number())
    }
}
