//! Payroll setup catalog.
//!
//! One generic set of operations covers every [`SetupRecord`] kind. Coded
//! kinds reject duplicate codes on create and on code-changing updates;
//! money fields are rounded to the cent before every write.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};

use crate::calculation;
use crate::error::{EngineError, EngineResult};
use crate::models::{SetupRecord, TaxFiling, WorkerComp};
use crate::store::{Op, Query, RecordStore};

use super::context::{ServiceContext, StoreFor, Stores, new_id};

/// CRUD over earnings, deductions, benefits, tax tables, filings and
/// workers' compensation classes.
#[derive(Clone)]
pub struct ConfigurationRegistry {
    ctx: ServiceContext,
}

impl ConfigurationRegistry {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Creates a setup record.
    ///
    /// # Example
    ///
    /// ```
    /// # #[tokio::main]
    /// # async fn main() {
    /// use payroll_engine::config::PayrollSettings;
    /// use payroll_engine::models::{Deduction, DeductionMethod, NewDeduction};
    /// use payroll_engine::services::{ConfigurationRegistry, ServiceContext};
    /// use rust_decimal::Decimal;
    ///
    /// let registry = ConfigurationRegistry::new(ServiceContext::in_memory(PayrollSettings::default()));
    /// let parking: Deduction = registry
    ///     .create(NewDeduction {
    ///         code: "PARK".to_string(),
    ///         name: "Parking".to_string(),
    ///         method: DeductionMethod::Flat { amount: Decimal::new(45_005, 3) },
    ///         max_per_period: None,
    ///         max_per_year: None,
    ///     })
    ///     .await
    ///     .unwrap();
    /// assert_eq!(parking.method, DeductionMethod::Flat { amount: Decimal::new(4501, 2) });
    /// # }
    /// ```
    pub async fn create<T>(&self, new: T::New) -> EngineResult<T>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
    {
        let mut record = T::from_new(new_id(id_prefix::<T>()), new);
        record.round_money();
        record.validate()?;
        self.ensure_code_free(&record).await?;

        let record = self.store::<T>().insert(record).await?;
        info!(kind = T::KIND, id = %record.id(), code = ?record.code(), "Setup record created");
        Ok(record)
    }

    /// Applies `change` to the stored record and writes it back.
    ///
    /// The id cannot be changed. A changed code is checked for uniqueness.
    pub async fn update<T, F>(&self, id: &str, change: F) -> EngineResult<T>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
        F: FnOnce(&mut T) + Send,
    {
        let mut record = self.store::<T>().require(id).await?;
        change(&mut record);

        if record.id() != id {
            return Err(EngineError::invalid_input("id", "cannot be changed"));
        }
        record.round_money();
        record.validate()?;
        self.ensure_code_free(&record).await?;

        let record = self.store::<T>().update(record).await?;
        info!(kind = T::KIND, id = %id, "Setup record updated");
        Ok(record)
    }

    pub async fn get<T>(&self, id: &str) -> EngineResult<T>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
    {
        self.store::<T>().require(id).await
    }

    /// Looks a coded record up by its code. Uncoded kinds never match.
    pub async fn find_by_code<T>(&self, code: &str) -> EngineResult<Option<T>>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
    {
        match T::CODE_FIELD {
            Some(field) => {
                self.store::<T>()
                    .first(&Query::new().filter(field, Op::Eq, json!(code)))
                    .await
            }
            None => Ok(None),
        }
    }

    /// Lists records matching the query. `Query::new()` lists everything.
    pub async fn list<T>(&self, query: &Query) -> EngineResult<Vec<T>>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
    {
        self.store::<T>().query(query).await
    }

    pub async fn delete<T>(&self, id: &str) -> EngineResult<()>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
    {
        self.store::<T>().remove(id).await?;
        info!(kind = T::KIND, id = %id, "Setup record deleted");
        Ok(())
    }

    /// Marks a pending tax filing as filed.
    pub async fn mark_filed(
        &self,
        id: &str,
        confirmation: Option<String>,
    ) -> EngineResult<TaxFiling> {
        let mut filing = self.get::<TaxFiling>(id).await?;
        if let Err(err) = filing.mark_filed(confirmation, Utc::now()) {
            warn!(filing_id = %id, error = %err, "Tax filing rejected");
            return Err(err);
        }
        let filing = self.ctx.stores().tax_filings.update(filing).await?;
        info!(filing_id = %id, form = ?filing.form, year = filing.year, "Tax filing marked filed");
        Ok(filing)
    }

    /// Workers' compensation premium for `payroll` under a class code.
    pub async fn compute_wc_premium(&self, class_code: &str, payroll: Decimal) -> EngineResult<Decimal> {
        let class = self
            .find_by_code::<WorkerComp>(class_code)
            .await?
            .ok_or_else(|| EngineError::not_found("WorkerComp", class_code))?;
        Ok(calculation::compute_wc_premium(payroll, class.rate))
    }

    fn store<T>(&self) -> &Arc<dyn RecordStore<T>>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
    {
        self.ctx.stores().store_for()
    }

    async fn ensure_code_free<T>(&self, record: &T) -> EngineResult<()>
    where
        T: SetupRecord,
        Stores: StoreFor<T>,
    {
        let (Some(field), Some(code)) = (T::CODE_FIELD, record.code()) else {
            return Ok(());
        };
        let clashes = self
            .store::<T>()
            .query(&Query::new().filter(field, Op::Eq, json!(code)))
            .await?;

        if clashes.iter().any(|other| other.id() != record.id()) {
            warn!(kind = T::KIND, code, "Duplicate setup code rejected");
            return Err(EngineError::DuplicateValue {
                entity: T::KIND.to_string(),
                field: field.to_string(),
                value: code.to_string(),
            });
        }
        Ok(())
    }
}

fn id_prefix<T: SetupRecord>() -> &'static str {
    match T::KIND {
        "Earning" => "ern",
        "Deduction" => "ded",
        "Benefit" => "ben",
        "TaxTable" => "tax",
        "TaxFiling" => "fil",
        "WorkerComp" => "wc",
        _ => "rec",
    }
}
