//! Collaborator traits the aggregator reads from and writes to.
//!
//! Every storage concern sits behind one of these traits so the rule chain
//! stays free of I/O. Implementations report failures as
//! [`EngineError::Storage`](crate::error::EngineError::Storage).

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{
    AttendanceMarker, ClassifiedAttendance, Employee, EmployeeSalaryRecord, ManualAdjustment,
    PayPeriod, RecordKey, WageGrade,
};

/// Attendance rows for a month.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Every marker of a month and period, across employees and companies.
    async fn markers(&self, month: &str, period: PayPeriod) -> EngineResult<Vec<AttendanceMarker>>;
}

/// The employee master.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Looks up an employee by code.
    async fn employee(&self, code: &str) -> EngineResult<Option<Employee>>;
}

/// The wage-grade master.
#[async_trait]
pub trait WageGradeSource: Send + Sync {
    /// All wage-grade rows.
    async fn wage_grades(&self) -> EngineResult<Vec<WageGrade>>;
}

/// Manually entered kasbon and bonus adjustments. Read-only for the engine.
#[async_trait]
pub trait AdjustmentStore: Send + Sync {
    /// The adjustment for a record key; zero when none was entered.
    async fn adjustment(&self, key: &RecordKey) -> EngineResult<ManualAdjustment>;
}

/// Computed salary records.
#[async_trait]
pub trait SalaryRecordStore: Send + Sync {
    /// Reads a record, e.g. Period 1 when computing Period 2.
    async fn get(&self, key: &RecordKey) -> EngineResult<Option<EmployeeSalaryRecord>>;

    /// Inserts or replaces the record with the same key.
    async fn upsert(&self, record: EmployeeSalaryRecord) -> EngineResult<()>;
}

/// One company's share of an employee's attendance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyShare {
    /// The company the counts are booked against.
    pub company: String,
    /// The counts for that company.
    pub attendance: ClassifiedAttendance,
}

/// Splits an employee's attendance across the companies they worked for.
///
/// The shares must sum back to the employee's total counts.
#[async_trait]
pub trait CompanyAllocator: Send + Sync {
    /// Allocates one employee's markers for a month and period.
    async fn allocate(
        &self,
        employee: &Employee,
        month: &str,
        period: PayPeriod,
        markers: &[AttendanceMarker],
    ) -> EngineResult<Vec<CompanyShare>>;
}
