//! Async payroll services.
//!
//! Each service wraps a shared [`ServiceContext`] and performs its I/O
//! through the record store and event notifier ports:
//!
//! - [`WorkforceLedger`]: employees and time entries
//! - [`ConfigurationRegistry`]: earnings, deductions and other setup records
//! - [`PayrollEngine`]: pay runs and pay checks
//! - [`ReportingService`]: register, quarterly summary, earnings history
//!
//! # Example
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> Result<(), payroll_engine::error::EngineError> {
//! use payroll_engine::config::PayrollSettings;
//! use payroll_engine::models::NewPayRun;
//! use payroll_engine::services::{PayrollEngine, ServiceContext};
//! use chrono::NaiveDate;
//!
//! let ctx = ServiceContext::in_memory(PayrollSettings::default());
//! let engine = PayrollEngine::new(ctx);
//! let run = engine
//!     .create_pay_run(NewPayRun {
//!         period_start: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
//!         period_end: NaiveDate::from_ymd_opt(2026, 1, 18).unwrap(),
//!         pay_date: NaiveDate::from_ymd_opt(2026, 1, 23).unwrap(),
//!         notes: None,
//!     })
//!     .await?;
//! engine.start_processing(&run.id).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod payroll;
mod registry;
mod reporting;
mod workforce;

pub use context::{ServiceContext, StoreFor, Stores};
pub use payroll::PayrollEngine;
pub use registry::ConfigurationRegistry;
pub use reporting::{
    EarningsHistory, EarningsHistoryEntry, EarningsTotals, PayrollRegister, QuarterlyTaxSummary,
    RegisterLine, ReportingService, quarter_window,
};
pub use workforce::{WorkforceLedger, normalize_ssn};
