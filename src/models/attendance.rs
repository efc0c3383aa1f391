//! Attendance markers and their classified monthly counts.
//!
//! A marker is one employee's status for one calendar date. The raw status and
//! overtime texts come straight from the attendance source and are only
//! interpreted here, so a malformed value never rejects the row.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::PayPeriod;

/// One employee's attendance entry for a single date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AttendanceMarker, MarkerStatus, PayPeriod};
/// use chrono::NaiveDate;
///
/// let marker = AttendanceMarker {
///     employee_code: "K-001".to_string(),
///     company: "PT Sandang".to_string(),
///     month: "Oktober 2025".to_string(),
///     period: PayPeriod::Period2,
///     date: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
///     status: " s ".to_string(),
///     overtime: Some("2 jam".to_string()),
/// };
/// assert_eq!(marker.parsed_status(), MarkerStatus::Sick);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMarker {
    /// The employee's code in the employee master.
    pub employee_code: String,
    /// The company (legal entity) the row is booked against.
    pub company: String,
    /// The month label, e.g. "Oktober 2025".
    pub month: String,
    /// The pay period the date belongs to.
    pub period: PayPeriod,
    /// The calendar date.
    pub date: NaiveDate,
    /// The raw status code (H, LP, TM, I, S, T or a day fraction).
    pub status: String,
    /// The raw overtime hours text, if any.
    #[serde(default)]
    pub overtime: Option<String>,
}

impl AttendanceMarker {
    /// Interprets the raw status code.
    pub fn parsed_status(&self) -> MarkerStatus {
        MarkerStatus::parse(&self.status)
    }
}

/// The interpreted status of an attendance marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerStatus {
    /// `H`: present for the full day.
    Present,
    /// A day fraction in (0, 1] credited for a partial day.
    Partial(Decimal),
    /// `LP`: company-declared holiday.
    CompanyHoliday,
    /// `TM`: public holiday ("tanggal merah").
    PublicHoliday,
    /// `I`: excused leave.
    Leave,
    /// `S`: sick.
    Sick,
    /// `T`: unexplained absence or lateness.
    Unexplained,
    /// An empty cell or a dash.
    Blank,
    /// Anything else; ignored for counting.
    Other(String),
}

impl MarkerStatus {
    /// Parses a raw status code, ignoring case and surrounding whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::MarkerStatus;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(MarkerStatus::parse("lp"), MarkerStatus::CompanyHoliday);
    /// assert_eq!(MarkerStatus::parse("0,5"), MarkerStatus::Partial(Decimal::new(5, 1)));
    /// assert_eq!(MarkerStatus::parse("X"), MarkerStatus::Other("X".to_string()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "H" => MarkerStatus::Present,
            "LP" => MarkerStatus::CompanyHoliday,
            "TM" => MarkerStatus::PublicHoliday,
            "I" => MarkerStatus::Leave,
            "S" => MarkerStatus::Sick,
            "T" => MarkerStatus::Unexplained,
            "" | "-" => MarkerStatus::Blank,
            _ => match Decimal::from_str(&trimmed.replace(',', ".")) {
                Ok(fraction) if fraction > Decimal::ZERO && fraction <= Decimal::ONE => {
                    MarkerStatus::Partial(fraction)
                }
                _ => MarkerStatus::Other(trimmed.to_string()),
            },
        }
    }

    /// Returns the absence category for statuses that form streaks.
    pub fn absence_kind(&self) -> Option<AbsenceKind> {
        match self {
            MarkerStatus::Leave => Some(AbsenceKind::Leave),
            MarkerStatus::Sick => Some(AbsenceKind::Sick),
            MarkerStatus::Unexplained => Some(AbsenceKind::Unexplained),
            _ => None,
        }
    }
}

/// The absence categories that are split into penalized and isolated counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    /// `I`: excused leave.
    Leave,
    /// `S`: sick.
    Sick,
    /// `T`: unexplained absence.
    Unexplained,
}

impl AbsenceKind {
    /// The status code used in the attendance source.
    pub fn code(&self) -> &'static str {
        match self {
            AbsenceKind::Leave => "I",
            AbsenceKind::Sick => "S",
            AbsenceKind::Unexplained => "T",
        }
    }
}

/// Overtime hours above this on a single marker are treated as malformed.
pub const MAX_OVERTIME_HOURS_PER_DAY: u32 = 24;

/// Extracts the numeric part of an overtime cell.
///
/// The first run of digits is taken, with at most one `.` or `,` decimal
/// separator. Returns `None` when the text holds no digits at all.
///
/// # Example
///
/// ```
/// use payroll_engine::models::parse_overtime_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_overtime_hours("1,5 jam"), Some(Decimal::new(15, 1)));
/// assert_eq!(parse_overtime_hours("lembur"), None);
/// ```
pub fn parse_overtime_hours(raw: &str) -> Option<Decimal> {
    let mut number = String::new();
    let mut seen_separator = false;

    for c in raw.chars() {
        if c.is_ascii_digit() {
            number.push(c);
        } else if (c == '.' || c == ',') && !number.is_empty() && !seen_separator {
            seen_separator = true;
            number.push('.');
        } else if !number.is_empty() {
            break;
        }
    }

    let number = number.trim_end_matches('.');
    if number.is_empty() {
        return None;
    }
    Decimal::from_str(number).ok()
}

/// Penalized and isolated occurrence counts for one absence category.
///
/// "Berpengaruh" occurrences belong to a run of two or more consecutive days
/// of the same status; "tidak berpengaruh" occurrences stand alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceCount {
    /// Occurrences inside a run of length >= 2 (berpengaruh).
    pub penalized: u32,
    /// Occurrences in a run of length 1 (tidak berpengaruh).
    pub isolated: u32,
}

impl AbsenceCount {
    /// Total occurrences regardless of run length.
    pub fn total(&self) -> u32 {
        self.penalized + self.isolated
    }
}

/// Per-category attendance counts for one employee, month and period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAttendance {
    /// `h`: full-day presences.
    pub present_days: u32,
    /// `set_h`: summed partial-day credits.
    pub partial_credit: Decimal,
    /// `lp`: company holidays.
    pub company_holidays: u32,
    /// `tm`: public holidays.
    pub public_holidays: u32,
    /// `I` occurrences.
    pub leave: AbsenceCount,
    /// `S` occurrences.
    pub sick: AbsenceCount,
    /// `T` occurrences.
    pub unexplained: AbsenceCount,
    /// `lembur`: summed overtime hours.
    pub overtime_hours: Decimal,
}

impl ClassifiedAttendance {
    /// Returns the counts for one absence category.
    pub fn absence(&self, kind: AbsenceKind) -> &AbsenceCount {
        match kind {
            AbsenceKind::Leave => &self.leave,
            AbsenceKind::Sick => &self.sick,
            AbsenceKind::Unexplained => &self.unexplained,
        }
    }

    /// Mutable access to the counts for one absence category.
    pub fn absence_mut(&mut self, kind: AbsenceKind) -> &mut AbsenceCount {
        match kind {
            AbsenceKind::Leave => &mut self.leave,
            AbsenceKind::Sick => &mut self.sick,
            AbsenceKind::Unexplained => &mut self.unexplained,
        }
    }

    /// Every leave, sick and unexplained day, penalized or not.
    pub fn total_absences(&self) -> u32 {
        self.leave.total() + self.sick.total() + self.unexplained.total()
    }

    /// Full and partial days worked (`h + set_h`).
    pub fn worked_days(&self) -> Decimal {
        Decimal::from(self.present_days) + self.partial_credit
    }

    /// Company plus public holidays (`lp + tm`).
    pub fn holidays(&self) -> u32 {
        self.company_holidays + self.public_holidays
    }

    /// Adds another set of counts into this one.
    pub fn accumulate(&mut self, other: &ClassifiedAttendance) {
        self.present_days += other.present_days;
        self.partial_credit += other.partial_credit;
        self.company_holidays += other.company_holidays;
        self.public_holidays += other.public_holidays;
        for kind in [AbsenceKind::Leave, AbsenceKind::Sick, AbsenceKind::Unexplained] {
            let src = *other.absence(kind);
            let dst = self.absence_mut(kind);
            dst.penalized += src.penalized;
            dst.isolated += src.isolated;
        }
        self.overtime_hours += other.overtime_hours;
    }
}
