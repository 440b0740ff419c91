//! Pay run model and its lifecycle state machine.
//!
//! A pay run moves `draft -> processing -> completed`, and can be voided
//! from any state except `voided`. Legal moves are listed in
//! [`PAY_RUN_TRANSITIONS`]; anything not in the table is rejected.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::store::Record;

use super::PayCheck;

/// Lifecycle state of a pay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayRunStatus {
    /// Created; checks may already be added.
    Draft,
    /// Being processed; checks may be added.
    Processing,
    /// Finalized; no further checks.
    Completed,
    /// Cancelled. Totals and checks are left as they were.
    Voided,
}

impl PayRunStatus {
    /// Returns the wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            PayRunStatus::Draft => "draft",
            PayRunStatus::Processing => "processing",
            PayRunStatus::Completed => "completed",
            PayRunStatus::Voided => "voided",
        }
    }

    /// Returns true if pay checks may be added in this state.
    pub fn accepts_pay_checks(self) -> bool {
        matches!(self, PayRunStatus::Draft | PayRunStatus::Processing)
    }

    /// Resolves the state reached by applying `action`, if the table allows it.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{PayRunAction, PayRunStatus};
    ///
    /// assert_eq!(
    ///     PayRunStatus::Draft.next(PayRunAction::Process),
    ///     Some(PayRunStatus::Processing)
    /// );
    /// assert_eq!(PayRunStatus::Draft.next(PayRunAction::Complete), None);
    /// assert_eq!(PayRunStatus::Voided.next(PayRunAction::Void), None);
    /// ```
    pub fn next(self, action: PayRunAction) -> Option<PayRunStatus> {
        PAY_RUN_TRANSITIONS
            .iter()
            .find(|t| t.from == self && t.action == action)
            .map(|t| t.to)
    }
}

impl fmt::Display for PayRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation that moves a pay run between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayRunAction {
    /// Begin processing a draft run.
    Process,
    /// Finalize a processing run.
    Complete,
    /// Cancel the run.
    Void,
}

impl PayRunAction {
    /// Returns the verb used in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            PayRunAction::Process => "process",
            PayRunAction::Complete => "complete",
            PayRunAction::Void => "void",
        }
    }
}

/// One legal edge in the pay run state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayRunTransition {
    /// State the run must be in.
    pub from: PayRunStatus,
    /// The action being applied.
    pub action: PayRunAction,
    /// State the run ends up in.
    pub to: PayRunStatus,
}

/// Every legal pay run transition. Nothing leaves `completed` except a void.
pub const PAY_RUN_TRANSITIONS: &[PayRunTransition] = &[
    PayRunTransition {
        from: PayRunStatus::Draft,
        action: PayRunAction::Process,
        to: PayRunStatus::Processing,
    },
    PayRunTransition {
        from: PayRunStatus::Processing,
        action: PayRunAction::Complete,
        to: PayRunStatus::Completed,
    },
    PayRunTransition {
        from: PayRunStatus::Draft,
        action: PayRunAction::Void,
        to: PayRunStatus::Voided,
    },
    PayRunTransition {
        from: PayRunStatus::Processing,
        action: PayRunAction::Void,
        to: PayRunStatus::Voided,
    },
    PayRunTransition {
        from: PayRunStatus::Completed,
        action: PayRunAction::Void,
        to: PayRunStatus::Voided,
    },
];

/// A payroll batch for one period, with running totals of its checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRun {
    /// Unique identifier for the pay run.
    pub id: String,
    /// First day of the pay period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub period_end: NaiveDate,
    /// The date employees are paid.
    pub pay_date: NaiveDate,
    /// Current lifecycle state.
    pub status: PayRunStatus,
    /// Sum of gross pay across checks.
    pub total_gross: Decimal,
    /// Sum of net pay across checks.
    pub total_net: Decimal,
    /// Sum of all employee tax withholdings across checks.
    pub total_taxes: Decimal,
    /// Sum of deductions across checks.
    pub total_deductions: Decimal,
    /// Number of checks added.
    pub employee_count: u32,
    /// Free-text note.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// When the run was completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the run was voided.
    #[serde(default)]
    pub voided_at: Option<DateTime<Utc>>,
}

impl PayRun {
    /// Builds an empty draft run from a creation payload.
    pub fn from_new(id: String, new: NewPayRun) -> Self {
        Self {
            id,
            period_start: new.period_start,
            period_end: new.period_end,
            pay_date: new.pay_date,
            status: PayRunStatus::Draft,
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
            total_taxes: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            employee_count: 0,
            notes: new.notes,
            created_at: Utc::now(),
            completed_at: None,
            voided_at: None,
        }
    }

    /// Returns true if `date` falls inside the pay period, inclusive.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }

    /// Applies a lifecycle action, stamping completion/void times.
    pub fn transition(&mut self, action: PayRunAction, at: DateTime<Utc>) -> EngineResult<()> {
        let next = self
            .status
            .next(action)
            .ok_or_else(|| self.invalid_transition(action.as_str()))?;

        match next {
            PayRunStatus::Completed => self.completed_at = Some(at),
            PayRunStatus::Voided => self.voided_at = Some(at),
            PayRunStatus::Draft | PayRunStatus::Processing => {}
        }
        self.status = next;
        Ok(())
    }

    /// Fails unless the run is in a state that accepts new checks.
    pub fn ensure_accepts_pay_checks(&self) -> EngineResult<()> {
        if self.status.accepts_pay_checks() {
            Ok(())
        } else {
            Err(self.invalid_transition("add a pay check to"))
        }
    }

    /// Accumulates a check into the running totals.
    pub fn add_pay_check(&mut self, check: &PayCheck) {
        self.total_gross += check.gross_pay;
        self.total_net += check.net_pay;
        self.total_taxes += check.total_taxes();
        self.total_deductions += check.total_deductions;
        self.employee_count += 1;
    }

    fn invalid_transition(&self, action: &str) -> EngineError {
        EngineError::InvalidTransition {
            entity: Self::KIND.to_string(),
            id: self.id.clone(),
            from: self.status.to_string(),
            action: action.to_string(),
        }
    }
}

impl Record for PayRun {
    const KIND: &'static str = "PayRun";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Creation payload for a pay run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayRun {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub pay_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}
