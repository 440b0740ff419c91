//! Shared service state.
//!
//! Every service holds a [`ServiceContext`]: the record stores, the event
//! notifier and the loaded settings, all behind `Arc` so the context is
//! cheap to clone into each service.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::PayrollSettings;
use crate::events::{EventNotifier, PayrollEvent, TracingNotifier};
use crate::models::{
    Benefit, Deduction, Earning, Employee, PayCheck, PayRun, TaxFiling, TaxTable, TimeEntry,
    WorkerComp,
};
use crate::store::{InMemoryStore, Record, RecordStore};

/// One store per record kind.
#[derive(Clone)]
pub struct Stores {
    pub employees: Arc<dyn RecordStore<Employee>>,
    pub time_entries: Arc<dyn RecordStore<TimeEntry>>,
    pub pay_runs: Arc<dyn RecordStore<PayRun>>,
    pub pay_checks: Arc<dyn RecordStore<PayCheck>>,
    pub earnings: Arc<dyn RecordStore<Earning>>,
    pub deductions: Arc<dyn RecordStore<Deduction>>,
    pub benefits: Arc<dyn RecordStore<Benefit>>,
    pub tax_tables: Arc<dyn RecordStore<TaxTable>>,
    pub tax_filings: Arc<dyn RecordStore<TaxFiling>>,
    pub worker_comps: Arc<dyn RecordStore<WorkerComp>>,
}

impl Stores {
    /// Creates empty in-memory stores for every record kind.
    pub fn in_memory() -> Self {
        Self {
            employees: Arc::new(InMemoryStore::new()),
            time_entries: Arc::new(InMemoryStore::new()),
            pay_runs: Arc::new(InMemoryStore::new()),
            pay_checks: Arc::new(InMemoryStore::new()),
            earnings: Arc::new(InMemoryStore::new()),
            deductions: Arc::new(InMemoryStore::new()),
            benefits: Arc::new(InMemoryStore::new()),
            tax_tables: Arc::new(InMemoryStore::new()),
            tax_filings: Arc::new(InMemoryStore::new()),
            worker_comps: Arc::new(InMemoryStore::new()),
        }
    }
}

/// Resolves the store for a record kind.
pub trait StoreFor<T: Record> {
    fn store_for(&self) -> &Arc<dyn RecordStore<T>>;
}

macro_rules! store_for {
    ($($record:ty => $field:ident),* $(,)?) => {
        $(
            impl StoreFor<$record> for Stores {
                fn store_for(&self) -> &Arc<dyn RecordStore<$record>> {
                    &self.$field
                }
            }
        )*
    };
}

store_for! {
    Employee => employees,
    TimeEntry => time_entries,
    PayRun => pay_runs,
    PayCheck => pay_checks,
    Earning => earnings,
    Deduction => deductions,
    Benefit => benefits,
    TaxTable => tax_tables,
    TaxFiling => tax_filings,
    WorkerComp => worker_comps,
}

/// Shared state for the payroll services.
#[derive(Clone)]
pub struct ServiceContext {
    stores: Stores,
    notifier: Arc<dyn EventNotifier>,
    settings: Arc<PayrollSettings>,
}

impl ServiceContext {
    /// Creates a context from its parts.
    pub fn new(
        stores: Stores,
        notifier: Arc<dyn EventNotifier>,
        settings: PayrollSettings,
    ) -> Self {
        Self {
            stores,
            notifier,
            settings: Arc::new(settings),
        }
    }

    /// In-memory stores, tracing notifier and the given settings.
    pub fn in_memory(settings: PayrollSettings) -> Self {
        Self::new(Stores::in_memory(), Arc::new(TracingNotifier), settings)
    }

    /// Returns the record stores.
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Publishes a domain event.
    pub fn emit(&self, event: PayrollEvent) {
        self.notifier.emit(&event);
    }
}

/// Generates a new record id with a readable prefix.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_context_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<ServiceContext>();
    }

    #[test]
    fn test_new_id_has_prefix() {
        let id = new_id("emp");
        assert!(id.starts_with("emp_"));
        assert_eq!(id.len(), 4 + 32);
        assert_ne!(new_id("emp"), id);
    }

    #[tokio::test]
    async fn test_store_for_resolves_each_kind() {
        let stores = Stores::in_memory();
        let employees: &Arc<dyn RecordStore<Employee>> = stores.store_for();
        let filings: &Arc<dyn RecordStore<TaxFiling>> = stores.store_for();

        assert!(employees.get("emp_missing").await.unwrap().is_none());
        assert!(filings.get("fil_missing").await.unwrap().is_none());
    }
}
