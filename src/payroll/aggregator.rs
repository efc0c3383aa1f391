//! Period aggregation.
//!
//! The [`PeriodAggregator`] runs the rule chain over every employee with
//! attendance in a month. Employees are independent: each runs as its own
//! task, bounded by the batch concurrency limit, and a failure is recorded in
//! the [`BatchReport`] without touching anyone else's records. Within one
//! employee Period 2 always runs after Period 1 and reads its stored counts.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::calculation::{AttendanceInput, RecordInput, calculate_salary_record};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceMarker, AuditWarning, ClassifiedAttendance, Employee, EmployeeSalaryRecord,
    PayPeriod, RecordKey, Severity, WARN_MULTI_COMPANY_UNALLOCATED, WageGrade,
};

use super::ports::{
    AdjustmentStore, AttendanceSource, CompanyAllocator, EmployeeDirectory, SalaryRecordStore,
    WageGradeSource,
};
use super::report::{BatchReport, EmployeeRun};

/// The collaborators an aggregator works against.
#[derive(Clone)]
pub struct Collaborators {
    /// Attendance rows.
    pub attendance: Arc<dyn AttendanceSource>,
    /// Employee master.
    pub employees: Arc<dyn EmployeeDirectory>,
    /// Wage-grade master.
    pub wage_grades: Arc<dyn WageGradeSource>,
    /// Manual adjustments (read-only).
    pub adjustments: Arc<dyn AdjustmentStore>,
    /// Salary record store (prior-period reads and upserts).
    pub records: Arc<dyn SalaryRecordStore>,
    /// Optional multi-company allocator.
    pub allocator: Option<Arc<dyn CompanyAllocator>>,
}

/// Attendance for one company, before classification.
enum CompanyAttendance {
    /// `unallocated` lists every company tag when several were combined.
    Markers {
        company: String,
        markers: Vec<AttendanceMarker>,
        unallocated: Vec<String>,
    },
    Allocated {
        company: String,
        attendance: ClassifiedAttendance,
    },
}

/// Computes and stores salary records period by period.
#[derive(Clone)]
pub struct PeriodAggregator {
    config: Arc<EngineConfig>,
    ports: Collaborators,
}

impl PeriodAggregator {
    /// Creates an aggregator.
    pub fn new(config: Arc<EngineConfig>, ports: Collaborators) -> Self {
        Self { config, ports }
    }

    /// The engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes one period of a month for every employee with markers in it.
    ///
    /// Only a failure to read the month's attendance or the wage-grade master
    /// fails the whole call; anything else is a per-employee failure in the
    /// report.
    pub async fn compute_period(&self, month: &str, period: PayPeriod) -> EngineResult<BatchReport> {
        let by_employee = group_by_employee(self.ports.attendance.markers(month, period).await?);
        let wage_grades = Arc::new(self.ports.wage_grades.wage_grades().await?);

        info!(
            month,
            period = %period,
            employees = by_employee.len(),
            max_concurrency = self.config.batch().max_concurrency,
            "Computing period"
        );

        let runs = by_employee.into_iter().map(|(code, markers)| {
            let this = self.clone();
            let month = month.to_string();
            let grades = Arc::clone(&wage_grades);
            (code.clone(), async move {
                let mut run = EmployeeRun {
                    employee_code: code.clone(),
                    completed: vec![],
                    failure: None,
                };
                match this
                    .compute_employee_period(&code, &month, period, markers, &grades)
                    .await
                {
                    Ok(records) => run.completed.push((period, records)),
                    Err(error) => run.failure = Some((period, error)),
                }
                run
            })
        });

        let report = self
            .run_bounded(BatchReport::new(month, vec![period]), period, runs)
            .await;
        info!(
            month,
            period = %period,
            records = report.records_written(),
            failures = report.failures.len(),
            warnings = report.warning_count(),
            "Period computed"
        );
        Ok(report)
    }

    /// Recomputes both periods of a month.
    ///
    /// Per employee, Period 1 is computed and stored before Period 2 reads it.
    /// A Period 1 failure skips that employee's Period 2. Safe to re-run:
    /// records are upserted by key and manual adjustments are only read.
    pub async fn recompute_month(&self, month: &str) -> EngineResult<BatchReport> {
        let mut first =
            group_by_employee(self.ports.attendance.markers(month, PayPeriod::Period1).await?);
        let mut second =
            group_by_employee(self.ports.attendance.markers(month, PayPeriod::Period2).await?);
        let wage_grades = Arc::new(self.ports.wage_grades.wage_grades().await?);

        let codes: BTreeSet<String> = first.keys().chain(second.keys()).cloned().collect();
        info!(month, employees = codes.len(), "Recomputing month");

        let runs: Vec<_> = codes
            .into_iter()
            .map(|code| {
                let this = self.clone();
                let month = month.to_string();
                let grades = Arc::clone(&wage_grades);
                let periods = [
                    (PayPeriod::Period1, first.remove(&code)),
                    (PayPeriod::Period2, second.remove(&code)),
                ];
                (code.clone(), async move {
                    let mut run = EmployeeRun {
                        employee_code: code.clone(),
                        completed: vec![],
                        failure: None,
                    };
                    for (period, markers) in periods {
                        let Some(markers) = markers else { continue };
                        match this
                            .compute_employee_period(&code, &month, period, markers, &grades)
                            .await
                        {
                            Ok(records) => run.completed.push((period, records)),
                            Err(error) => {
                                run.failure = Some((period, error));
                                break;
                            }
                        }
                    }
                    run
                })
            })
            .collect();

        let report = self
            .run_bounded(BatchReport::new(month, PayPeriod::ALL.to_vec()), PayPeriod::Period1, runs)
            .await;
        info!(
            month,
            records = report.records_written(),
            failures = report.failures.len(),
            warnings = report.warning_count(),
            "Month recomputed"
        );
        Ok(report)
    }

    /// Spawns one task per employee, at most `max_concurrency` at a time.
    async fn run_bounded<F>(
        &self,
        mut report: BatchReport,
        first_period: PayPeriod,
        runs: impl IntoIterator<Item = (String, F)>,
    ) -> BatchReport
    where
        F: std::future::Future<Output = EmployeeRun> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.config.batch().max_concurrency));
        let mut tasks = FuturesUnordered::new();

        for (code, run) in runs {
            let handle = tokio::spawn(run_with_permit(
                Arc::clone(&semaphore),
                code.clone(),
                first_period,
                run,
            ));
            tasks.push(async move { (code, handle.await) });
        }

        while let Some((code, joined)) = tasks.next().await {
            let run = joined.unwrap_or_else(|join_error| EmployeeRun {
                employee_code: code.clone(),
                completed: vec![],
                failure: Some((
                    first_period,
                    EngineError::CalculationError {
                        message: format!("employee task aborted: {}", join_error),
                    },
                )),
            });
            if let Some((period, error)) = &run.failure {
                warn!(
                    employee_code = %code,
                    period = %period,
                    error = %error,
                    "Employee computation failed"
                );
            }
            report.absorb(run);
        }

        report.finish()
    }

    /// Computes and stores one employee's records for a period: one per
    /// allocated company, or a single record when no allocator splits it.
    ///
    /// Every record is computed before the first is written, so a failed
    /// read or rule check leaves the store untouched. A store failure part
    /// way through writing can still leave earlier records of the period in
    /// place; re-running the period overwrites them.
    pub async fn compute_employee_period(
        &self,
        employee_code: &str,
        month: &str,
        period: PayPeriod,
        markers: Vec<AttendanceMarker>,
        wage_grades: &[WageGrade],
    ) -> EngineResult<Vec<EmployeeSalaryRecord>> {
        let employee = self
            .ports
            .employees
            .employee(employee_code)
            .await?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                code: employee_code.to_string(),
            })?;

        let shares = self.split_by_company(&employee, month, period, markers).await?;
        let mut records = Vec::with_capacity(shares.len());

        for share in shares {
            let (company, attendance, unallocated) = match &share {
                CompanyAttendance::Markers {
                    company,
                    markers,
                    unallocated,
                } => (
                    company,
                    AttendanceInput::Markers(markers.as_slice()),
                    unallocated.as_slice(),
                ),
                CompanyAttendance::Allocated {
                    company,
                    attendance,
                } => (company, AttendanceInput::Allocated(attendance.clone()), &[][..]),
            };

            let key = RecordKey {
                month: month.to_string(),
                employee_code: employee.code.clone(),
                period,
                company: company.clone(),
            };
            let adjustment = self.ports.adjustments.adjustment(&key).await?;
            if let Some(field) = adjustment.out_of_range_field() {
                return Err(EngineError::InvalidRequest {
                    field: format!("adjustment.{}", field),
                    message: format!("{} is outside the supported rupiah range", key),
                });
            }
            let prior = match period {
                PayPeriod::Period1 => None,
                PayPeriod::Period2 => self
                    .ports
                    .records
                    .get(&key.with_period(PayPeriod::Period1))
                    .await?
                    .map(|record| record.prior_carry()),
            };

            let mut record = calculate_salary_record(
                RecordInput {
                    employee: &employee,
                    key,
                    attendance,
                    prior: prior.as_ref(),
                    adjustment,
                },
                wage_grades,
                self.config.batch().wage_fallback,
                &self.config,
            )
            .record;

            if !unallocated.is_empty() {
                record.warnings.push(AuditWarning::new(
                    WARN_MULTI_COMPANY_UNALLOCATED,
                    format!(
                        "{} has attendance at {}; paid once under {} without an allocator",
                        employee.code,
                        unallocated.join(", "),
                        company
                    ),
                    Severity::High,
                ));
            }

            debug!(
                record = %record.key,
                hasil_gaji = %record.hasil_gaji,
                warnings = record.warnings.len(),
                "Record computed"
            );
            records.push(record);
        }

        for record in &records {
            self.ports.records.upsert(record.clone()).await?;
        }
        Ok(records)
    }

    async fn split_by_company(
        &self,
        employee: &Employee,
        month: &str,
        period: PayPeriod,
        markers: Vec<AttendanceMarker>,
    ) -> EngineResult<Vec<CompanyAttendance>> {
        let companies: BTreeSet<String> = markers
            .iter()
            .map(|marker| marker.company.trim().to_string())
            .collect();

        if companies.len() > 1 {
            if let Some(allocator) = &self.ports.allocator {
                let shares = allocator.allocate(employee, month, period, &markers).await?;
                return Ok(shares
                    .into_iter()
                    .map(|share| CompanyAttendance::Allocated {
                        company: share.company,
                        attendance: share.attendance,
                    })
                    .collect());
            }
            warn!(
                employee_code = %employee.code,
                period = %period,
                companies = companies.len(),
                "Attendance spans several companies without an allocator; computing one record"
            );
        }

        let company = companies.first().cloned().unwrap_or_default();
        let unallocated = if companies.len() > 1 {
            companies.into_iter().collect()
        } else {
            vec![]
        };
        Ok(vec![CompanyAttendance::Markers {
            company,
            markers,
            unallocated,
        }])
    }
}

/// Runs one employee once a permit is free. A closed limit fails the
/// employee rather than running it unbounded.
async fn run_with_permit<F>(
    semaphore: Arc<Semaphore>,
    employee_code: String,
    first_period: PayPeriod,
    run: F,
) -> EmployeeRun
where
    F: std::future::Future<Output = EmployeeRun>,
{
    match semaphore.acquire_owned().await {
        Ok(_permit) => run.await,
        Err(closed) => EmployeeRun {
            employee_code,
            completed: vec![],
            failure: Some((
                first_period,
                EngineError::CalculationError {
                    message: format!("concurrency limit unavailable: {}", closed),
                },
            )),
        },
    }
}

/// Groups markers by employee code, keeping each employee's input order.
fn group_by_employee(markers: Vec<AttendanceMarker>) -> BTreeMap<String, Vec<AttendanceMarker>> {
    let mut grouped: BTreeMap<String, Vec<AttendanceMarker>> = BTreeMap::new();
    for marker in markers {
        grouped
            .entry(marker.employee_code.trim().to_string())
            .or_default()
            .push(marker);
    }
    grouped
}
