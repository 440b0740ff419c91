//! In-memory record store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::{Query, Record, RecordStore};

/// A [`RecordStore`] backed by a vector behind a tokio `RwLock`.
///
/// Records keep insertion order, which is the order returned by queries
/// without sort keys.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> InMemoryStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryStore<T> {
    async fn get(&self, id: &str) -> EngineResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, record: T) -> EngineResult<T> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(EngineError::StoreError {
                message: format!("{} '{}' already stored", T::KIND, record.id()),
            });
        }
        debug!(kind = T::KIND, id = record.id(), "Inserted record");
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> EngineResult<T> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| EngineError::not_found(T::KIND, record.id()))?;
        *slot = record.clone();
        debug!(kind = T::KIND, id = record.id(), "Updated record");
        Ok(record)
    }

    async fn remove(&self, id: &str) -> EngineResult<()> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| EngineError::not_found(T::KIND, id))?;
        records.remove(index);
        debug!(kind = T::KIND, id, "Removed record");
        Ok(())
    }

    async fn query(&self, query: &Query) -> EngineResult<Vec<T>> {
        let records = self.records.read().await;

        let mut matched = Vec::new();
        for record in records.iter() {
            let json = serde_json::to_value(record)?;
            if query.matches(&json) {
                matched.push((json, record.clone()));
            }
        }

        if !query.orderings().is_empty() {
            matched.sort_by(|(a, _), (b, _)| query.compare_records(a, b));
        }

        let limit = query.max_results().unwrap_or(usize::MAX);
        Ok(matched.into_iter().take(limit).map(|(_, r)| r).collect())
    }
}
