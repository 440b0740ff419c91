//! Payroll gross-to-net engine
//!
//! This crate turns approved time entries (or a salaried default) into taxed,
//! net-paid pay checks, accumulates them into pay runs that move through a
//! draft/processing/completed/voided lifecycle, and builds register,
//! quarterly tax and earnings history reports over the results.
//!
//! The calculation in [`calculation`] is pure. The async [`services`] read
//! and write through the [`store::RecordStore`] port and publish domain
//! events through [`events::EventNotifier`].

pub mod calculation;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod store;
