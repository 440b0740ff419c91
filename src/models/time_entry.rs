//! Time entry model.
//!
//! A time entry records hours an employee worked on a date. It is created
//! unapproved and may be approved exactly once; only approved entries are
//! payable.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::store::Record;

/// The kind of hours recorded by a time entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// Ordinary hours at 1.0x.
    Regular,
    /// Overtime at 1.5x.
    Overtime,
    /// Double time at 2.0x.
    Doubletime,
    /// Premium hours, paid at 1.0x.
    Premium,
    /// Per diem hours, paid at 1.0x.
    Perdiem,
}

impl PayType {
    /// Returns true for pay types reported as overtime hours.
    pub fn is_overtime(self) -> bool {
        matches!(self, PayType::Overtime | PayType::Doubletime)
    }
}

/// Hours worked by an employee on a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The employee who worked the hours.
    pub employee_id: String,
    /// Optional job or project the hours were charged to.
    #[serde(default)]
    pub job_id: Option<String>,
    /// The date the hours were worked.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Kind of hours, which selects the pay multiplier.
    pub pay_type: PayType,
    /// Free-text note.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the entry has been approved for payment.
    pub approved: bool,
    /// Who approved the entry.
    #[serde(default)]
    pub approved_by: Option<String>,
    /// When the entry was approved.
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Builds an unapproved entry from a creation payload.
    pub fn from_new(id: String, new: NewTimeEntry) -> Self {
        Self {
            id,
            employee_id: new.employee_id,
            job_id: new.job_id,
            date: new.date,
            hours: new.hours,
            pay_type: new.pay_type,
            description: new.description,
            approved: false,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        }
    }

    /// Marks the entry approved.
    ///
    /// Approval is one-way: approving an already-approved entry fails with
    /// [`EngineError::InvalidTransition`] and leaves the entry untouched.
    pub fn approve(&mut self, approver: &str, at: DateTime<Utc>) -> EngineResult<()> {
        if self.approved {
            return Err(EngineError::InvalidTransition {
                entity: Self::KIND.to_string(),
                id: self.id.clone(),
                from: "approved".to_string(),
                action: "approve".to_string(),
            });
        }
        self.approved = true;
        self.approved_by = Some(approver.to_string());
        self.approved_at = Some(at);
        Ok(())
    }
}

impl Record for TimeEntry {
    const KIND: &'static str = "TimeEntry";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Creation payload for a time entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub employee_id: String,
    #[serde(default)]
    pub job_id: Option<String>,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub pay_type: PayType,
    #[serde(default)]
    pub description: Option<String>,
}
