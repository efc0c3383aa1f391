//! Period aggregation over external collaborators.
//!
//! The rule chain in [`crate::calculation`] computes one record at a time.
//! This module runs it across every employee of a month: it reads
//! attendance, the employee and wage-grade masters and manual adjustments
//! through the [`ports`] traits, carries Period 1 counts into Period 2, and
//! upserts the resulting records.

mod aggregator;
mod memory;
mod ports;
mod report;

pub use aggregator::{Collaborators, PeriodAggregator};
pub use memory::{
    MemoryAdjustments, MemoryAttendance, MemoryDirectory, MemoryRecords, MemoryWageGrades,
};
pub use ports::{
    AdjustmentStore, AttendanceSource, CompanyAllocator, CompanyShare, EmployeeDirectory,
    SalaryRecordStore, WageGradeSource,
};
pub use report::{BatchReport, EmployeeFailure, EmployeeOutcome, PeriodState, RecordSummary};
