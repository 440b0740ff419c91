//! Record store port.
//!
//! The engine persists every record through [`RecordStore`], a small async
//! repository interface with get/insert/update/remove and a filter/sort/limit
//! [`Query`]. Any backend can sit behind it; [`InMemoryStore`] is the
//! reference adapter used by tests and single-process deployments.
//!
//! # Example
//!
//! ```
//! use payroll_engine::store::{Direction, Op, Query};
//! use serde_json::json;
//!
//! let query = Query::new()
//!     .filter("employee_id", Op::Eq, json!("emp_001"))
//!     .filter("approved", Op::Eq, json!(true))
//!     .order_by("date", Direction::Asc)
//!     .limit(10);
//! assert_eq!(query.conditions().len(), 2);
//! ```

mod memory;
mod query;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{EngineError, EngineResult};

pub use memory::InMemoryStore;
pub use query::{Condition, Direction, Op, Ordering, Query};

/// A persistable record with a string id.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the record kind, used in errors and logs.
    const KIND: &'static str;

    /// The record's unique id.
    fn id(&self) -> &str;
}

/// Async repository for one record kind.
///
/// Implementations must be immediately consistent: a successful write is
/// visible to the next read.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Fetches a record by id.
    async fn get(&self, id: &str) -> EngineResult<Option<T>>;

    /// Inserts a new record, failing if the id is already present.
    async fn insert(&self, record: T) -> EngineResult<T>;

    /// Replaces an existing record, failing with `NotFound` if absent.
    async fn update(&self, record: T) -> EngineResult<T>;

    /// Removes a record, failing with `NotFound` if absent.
    async fn remove(&self, id: &str) -> EngineResult<()>;

    /// Returns all records matching the query, ordered and limited.
    async fn query(&self, query: &Query) -> EngineResult<Vec<T>>;

    /// Fetches a record by id, failing with `NotFound` if absent.
    async fn require(&self, id: &str) -> EngineResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| EngineError::not_found(T::KIND, id))
    }

    /// Returns the first record matching the query.
    async fn first(&self, query: &Query) -> EngineResult<Option<T>> {
        let limited = query.clone().limit(1);
        Ok(self.query(&limited).await?.into_iter().next())
    }

    /// Counts records matching the query.
    async fn count(&self, query: &Query) -> EngineResult<usize> {
        Ok(self.query(query).await?.len())
    }
}
