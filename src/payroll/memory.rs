//! In-memory collaborator implementations.
//!
//! Used by tests, benches and embedders that hold their data in process.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::EngineResult;
use crate::models::{
    AttendanceMarker, Employee, EmployeeSalaryRecord, ManualAdjustment, PayPeriod, RecordKey,
    WageGrade,
};

use super::ports::{
    AdjustmentStore, AttendanceSource, EmployeeDirectory, SalaryRecordStore, WageGradeSource,
};

fn same_month(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Attendance markers held in a vector.
#[derive(Debug, Default)]
pub struct MemoryAttendance {
    markers: RwLock<Vec<AttendanceMarker>>,
}

impl MemoryAttendance {
    /// Creates a source over the given markers.
    pub fn new(markers: Vec<AttendanceMarker>) -> Self {
        Self {
            markers: RwLock::new(markers),
        }
    }

    /// Adds markers.
    pub async fn extend(&self, markers: impl IntoIterator<Item = AttendanceMarker>) {
        self.markers.write().await.extend(markers);
    }
}

#[async_trait]
impl AttendanceSource for MemoryAttendance {
    async fn markers(&self, month: &str, period: PayPeriod) -> EngineResult<Vec<AttendanceMarker>> {
        Ok(self
            .markers
            .read()
            .await
            .iter()
            .filter(|m| m.period == period && same_month(&m.month, month))
            .cloned()
            .collect())
    }
}

/// Employee master keyed by code.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    employees: HashMap<String, Employee>,
}

impl MemoryDirectory {
    /// Creates a directory over the given employees.
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: employees.into_iter().map(|e| (e.code.clone(), e)).collect(),
        }
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryDirectory {
    async fn employee(&self, code: &str) -> EngineResult<Option<Employee>> {
        Ok(self.employees.get(code).cloned())
    }
}

/// A fixed wage-grade table.
#[derive(Debug, Default)]
pub struct MemoryWageGrades {
    rows: Vec<WageGrade>,
}

impl MemoryWageGrades {
    /// Creates a source over the given rows.
    pub fn new(rows: Vec<WageGrade>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl WageGradeSource for MemoryWageGrades {
    async fn wage_grades(&self) -> EngineResult<Vec<WageGrade>> {
        Ok(self.rows.clone())
    }
}

/// Manual adjustments keyed by record.
#[derive(Debug, Default)]
pub struct MemoryAdjustments {
    entries: RwLock<HashMap<RecordKey, ManualAdjustment>>,
}

impl MemoryAdjustments {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an adjustment, as an operator would.
    pub async fn set(&self, key: RecordKey, adjustment: ManualAdjustment) {
        self.entries.write().await.insert(key, adjustment);
    }
}

#[async_trait]
impl AdjustmentStore for MemoryAdjustments {
    async fn adjustment(&self, key: &RecordKey) -> EngineResult<ManualAdjustment> {
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default())
    }
}

/// Salary records keyed by their natural key.
#[derive(Debug, Default)]
pub struct MemoryRecords {
    records: RwLock<BTreeMap<RecordKey, EmployeeSalaryRecord>>,
}

impl MemoryRecords {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// All records in key order.
    pub async fn all(&self) -> Vec<EmployeeSalaryRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl SalaryRecordStore for MemoryRecords {
    async fn get(&self, key: &RecordKey) -> EngineResult<Option<EmployeeSalaryRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn upsert(&self, record: EmployeeSalaryRecord) -> EngineResult<()> {
        self.records
            .write()
            .await
            .insert(record.key.clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn marker(code: &str, month: &str, period: PayPeriod) -> AttendanceMarker {
        AttendanceMarker {
            employee_code: code.to_string(),
            company: "PT Sandang".to_string(),
            month: month.to_string(),
            period,
            date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            status: "H".to_string(),
            overtime: None,
        }
    }

    #[tokio::test]
    async fn test_attendance_filters_month_and_period() {
        let source = MemoryAttendance::new(vec![
            marker("K-001", "Oktober 2025", PayPeriod::Period1),
            marker("K-002", "oktober 2025 ", PayPeriod::Period1),
            marker("K-001", "Oktober 2025", PayPeriod::Period2),
            marker("K-001", "September 2025", PayPeriod::Period1),
        ]);

        let rows = source.markers("Oktober 2025", PayPeriod::Period1).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_adjustment_defaults_to_zero() {
        let store = MemoryAdjustments::new();
        let key = RecordKey {
            month: "Oktober 2025".to_string(),
            employee_code: "K-001".to_string(),
            period: PayPeriod::Period2,
            company: "PT Sandang".to_string(),
        };

        assert_eq!(store.adjustment(&key).await.unwrap(), ManualAdjustment::default());

        let entered = ManualAdjustment {
            kasbon: rust_decimal::Decimal::from(20_000),
            penyesuaian_bonus: rust_decimal::Decimal::ZERO,
        };
        store.set(key.clone(), entered.clone()).await;
        assert_eq!(store.adjustment(&key).await.unwrap(), entered);
    }

    #[tokio::test]
    async fn test_directory_lookup() {
        let directory = MemoryDirectory::new(vec![Employee {
            code: "K-001".to_string(),
            name: "Siti".to_string(),
            class: crate::models::EmployeeClass::NonStaff,
            grade_p1: "A".to_string(),
            grade_p2: None,
            site: None,
        }]);

        assert!(directory.employee("K-001").await.unwrap().is_some());
        assert!(directory.employee("K-999").await.unwrap().is_none());
    }
}
