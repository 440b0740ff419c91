//! Domain event notification.
//!
//! The engine emits a [`PayrollEvent`] after every successful mutation and
//! never consumes events itself. Delivery goes through the
//! [`EventNotifier`] port; adapters here log, broadcast, record, or drop.

use std::sync::Mutex;

use serde_json::{Value, json};
use tokio::sync::broadcast;
use tracing::info;

use crate::models::{Employee, PayCheck, PayRun, TimeEntry};

/// A domain event produced by the payroll services.
#[derive(Debug, Clone, PartialEq)]
pub enum PayrollEvent {
    EmployeeCreated(Employee),
    EmployeeUpdated(Employee),
    EmployeeDeleted { employee_id: String },
    TimeEntryCreated(TimeEntry),
    TimeEntryApproved(TimeEntry),
    PayRunCreated(PayRun),
    PayRunCompleted(PayRun),
    PayCheckCreated(PayCheck),
}

impl PayrollEvent {
    /// Returns the event name published on the bus.
    pub fn name(&self) -> &'static str {
        match self {
            PayrollEvent::EmployeeCreated(_) => "payroll.employee.created",
            PayrollEvent::EmployeeUpdated(_) => "payroll.employee.updated",
            PayrollEvent::EmployeeDeleted { .. } => "payroll.employee.deleted",
            PayrollEvent::TimeEntryCreated(_) => "payroll.timeEntry.created",
            PayrollEvent::TimeEntryApproved(_) => "payroll.timeEntry.approved",
            PayrollEvent::PayRunCreated(_) => "payroll.payRun.created",
            PayrollEvent::PayRunCompleted(_) => "payroll.payRun.completed",
            PayrollEvent::PayCheckCreated(_) => "payroll.payCheck.created",
        }
    }

    /// Returns the event payload as a JSON object.
    pub fn payload(&self) -> Value {
        let payload = match self {
            PayrollEvent::EmployeeCreated(e) | PayrollEvent::EmployeeUpdated(e) => {
                serde_json::to_value(e)
            }
            PayrollEvent::EmployeeDeleted { employee_id } => Ok(json!({ "id": employee_id })),
            PayrollEvent::TimeEntryCreated(t) | PayrollEvent::TimeEntryApproved(t) => {
                serde_json::to_value(t)
            }
            PayrollEvent::PayRunCreated(r) | PayrollEvent::PayRunCompleted(r) => {
                serde_json::to_value(r)
            }
            PayrollEvent::PayCheckCreated(c) => serde_json::to_value(c),
        };
        // all payloads are plain structs with string keys
        payload.unwrap_or(Value::Null)
    }
}

/// Publish side of the domain event bus.
pub trait EventNotifier: Send + Sync {
    /// Publishes an event. Delivery failures are not reported to the caller.
    fn emit(&self, event: &PayrollEvent);
}

/// Logs every event at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl EventNotifier for TracingNotifier {
    fn emit(&self, event: &PayrollEvent) {
        info!(event = event.name(), payload = %event.payload(), "Domain event");
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl EventNotifier for NoopNotifier {
    fn emit(&self, _event: &PayrollEvent) {}
}

/// Fans events out to tokio broadcast subscribers as `(name, payload)`.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<(String, Value)>,
}

impl BroadcastNotifier {
    /// Creates a notifier whose channel buffers `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<(String, Value)> {
        self.sender.subscribe()
    }
}

impl EventNotifier for BroadcastNotifier {
    fn emit(&self, event: &PayrollEvent) {
        // no subscribers is not an error
        let _ = self
            .sender
            .send((event.name().to_string(), event.payload()));
    }
}

/// Keeps every emitted event in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the names of all events emitted so far, in order.
    pub fn names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// Returns all events emitted so far, in order.
    pub fn events(&self) -> Vec<(String, Value)> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventNotifier for RecordingNotifier {
    fn emit(&self, event: &PayrollEvent) {
        let entry = (event.name().to_string(), event.payload());
        match self.events.lock() {
            Ok(mut events) => events.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
