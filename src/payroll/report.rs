//! Batch outcome reporting.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::EngineError;
use crate::models::{EmployeeSalaryRecord, PayPeriod, RecordKey};

/// How far an employee's month has been computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodState {
    /// Nothing computed yet, or the first computation failed.
    Pending,
    /// Period 1 records are stored.
    Period1Computed,
    /// Period 2 records are stored.
    Period2Computed,
}

impl PeriodState {
    /// The state reached once `period` has been stored.
    pub fn reached(period: PayPeriod) -> Self {
        match period {
            PayPeriod::Period1 => PeriodState::Period1Computed,
            PayPeriod::Period2 => PeriodState::Period2Computed,
        }
    }
}

/// A record written by the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    /// The record key.
    pub key: RecordKey,
    /// Net payable amount.
    pub hasil_gaji: Decimal,
    /// Warning codes raised on the record.
    pub warnings: Vec<String>,
}

impl From<&EmployeeSalaryRecord> for RecordSummary {
    fn from(record: &EmployeeSalaryRecord) -> Self {
        Self {
            key: record.key.clone(),
            hasil_gaji: record.hasil_gaji,
            warnings: record.warnings.iter().map(|w| w.code.clone()).collect(),
        }
    }
}

/// One employee's successful progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeOutcome {
    /// Employee code.
    pub employee_code: String,
    /// The state the employee reached.
    pub state: PeriodState,
    /// Records written, one per period and company.
    pub records: Vec<RecordSummary>,
}

/// One employee's failure; the rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFailure {
    /// Employee code.
    pub employee_code: String,
    /// The period that failed.
    pub period: PayPeriod,
    /// What went wrong.
    pub error: EngineError,
}

/// The result of one employee's run within a batch.
#[derive(Debug)]
pub(crate) struct EmployeeRun {
    pub employee_code: String,
    pub completed: Vec<(PayPeriod, Vec<EmployeeSalaryRecord>)>,
    pub failure: Option<(PayPeriod, EngineError)>,
}

/// Summary of a batch computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// The month computed.
    pub month: String,
    /// The periods covered, in order.
    pub periods: Vec<PayPeriod>,
    /// Employees with at least one period stored, by code.
    pub outcomes: Vec<EmployeeOutcome>,
    /// Per-employee failures, by code.
    pub failures: Vec<EmployeeFailure>,
}

impl BatchReport {
    pub(crate) fn new(month: &str, periods: Vec<PayPeriod>) -> Self {
        Self {
            month: month.to_string(),
            periods,
            outcomes: vec![],
            failures: vec![],
        }
    }

    pub(crate) fn absorb(&mut self, run: EmployeeRun) {
        let state = run
            .completed
            .iter()
            .map(|(period, _)| PeriodState::reached(*period))
            .max();

        if let Some(state) = state {
            self.outcomes.push(EmployeeOutcome {
                employee_code: run.employee_code.clone(),
                state,
                records: run
                    .completed
                    .iter()
                    .flat_map(|(_, records)| records.iter().map(RecordSummary::from))
                    .collect(),
            });
        }

        if let Some((period, error)) = run.failure {
            self.failures.push(EmployeeFailure {
                employee_code: run.employee_code,
                period,
                error,
            });
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.outcomes
            .sort_by(|a, b| a.employee_code.cmp(&b.employee_code));
        self.failures
            .sort_by(|a, b| a.employee_code.cmp(&b.employee_code));
        self
    }

    /// The state an employee reached in this batch.
    pub fn state_of(&self, employee_code: &str) -> PeriodState {
        self.outcomes
            .iter()
            .find(|o| o.employee_code == employee_code)
            .map(|o| o.state)
            .unwrap_or(PeriodState::Pending)
    }

    /// Number of records written.
    pub fn records_written(&self) -> usize {
        self.outcomes.iter().map(|o| o.records.len()).sum()
    }

    /// Number of warnings across all written records.
    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .flat_map(|o| &o.records)
            .map(|r| r.warnings.len())
            .sum()
    }

    /// Whether every employee completed every period.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Net amounts of the records written for a period, for cash planning.
    pub fn net_amounts(&self, period: PayPeriod) -> Vec<Decimal> {
        self.outcomes
            .iter()
            .flat_map(|o| &o.records)
            .filter(|r| r.key.period == period)
            .map(|r| r.hasil_gaji)
            .collect()
    }
}
