//! Core data models for the payroll engine.
//!
//! This module contains all the domain records persisted through the
//! record store, plus the pay run state machine and audit trail types.

mod audit;
mod employee;
mod pay_check;
mod pay_run;
mod setup;
mod time_entry;

pub use audit::AuditStep;
pub use employee::{
    Employee, EmployeeFilter, EmployeeUpdate, EmploymentStatus, NewEmployee, PayBasis,
    PayFrequency,
};
pub use pay_check::PayCheck;
pub use pay_run::{
    NewPayRun, PAY_RUN_TRANSITIONS, PayRun, PayRunAction, PayRunStatus, PayRunTransition,
};
pub use setup::{
    Benefit, Deduction, DeductionMethod, Earning, FilingForm, FilingStatus, Jurisdiction,
    NewBenefit, NewDeduction, NewEarning, NewTaxFiling, NewTaxTable, NewWorkerComp, SetupRecord,
    TaxFiling, TaxTable, WorkerComp,
};
pub use time_entry::{NewTimeEntry, PayType, TimeEntry};
