//! Employee model and related types.
//!
//! This module defines the Employee struct and EmployeeClass enum used to pick
//! the salary rules and wage grade for a worker.

use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// Represents the class of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeClass {
    /// Salaried staff; not subject to attendance penalties.
    Staff,
    /// Wage-table workers; base pay and allowances are docked for absences.
    NonStaff,
}

/// Represents an employee in the employee master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The employee code (natural key).
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Staff or non-staff.
    pub class: EmployeeClass,
    /// The wage grade in effect for Period 1.
    pub grade_p1: String,
    /// The wage grade in effect for Period 2, when it changed mid-month.
    #[serde(default)]
    pub grade_p2: Option<String>,
    /// The factory site, used to select the salary rule style.
    #[serde(default)]
    pub site: Option<String>,
}

impl Employee {
    /// Returns the wage grade that applies to the given period.
    ///
    /// Period 2 falls back to the Period 1 grade when no change was recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Employee, EmployeeClass, PayPeriod};
    ///
    /// let employee = Employee {
    ///     code: "K-001".to_string(),
    ///     name: "Siti".to_string(),
    ///     class: EmployeeClass::NonStaff,
    ///     grade_p1: "A".to_string(),
    ///     grade_p2: Some("B".to_string()),
    ///     site: None,
    /// };
    /// assert_eq!(employee.grade_for(PayPeriod::Period1), "A");
    /// assert_eq!(employee.grade_for(PayPeriod::Period2), "B");
    /// ```
    pub fn grade_for(&self, period: PayPeriod) -> &str {
        match period {
            PayPeriod::Period1 => &self.grade_p1,
            PayPeriod::Period2 => self
                .grade_p2
                .as_deref()
                .filter(|g| !g.trim().is_empty())
                .unwrap_or(&self.grade_p1),
        }
    }

    /// Returns true if the employee is salaried staff.
    pub fn is_staff(&self) -> bool {
        self.class == EmployeeClass::Staff
    }
}
