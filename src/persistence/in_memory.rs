// Copyright 2025 Cowboy AI, LLC.

//! In-memory record store
//!
//! Insertion-ordered so "store iteration order" is deterministic, which the
//! sorting contract leans on for tie-breaking.

use crate::entity::{EntityId, Record};
use crate::errors::{RecordError, RecordResult};
use crate::query::RecordQuery;
use crate::state_code::StateCode;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::store::RecordStore;

/// An insertion-ordered, in-memory store for one record type
///
/// Persisted copies are normalized to [`StateCode::Unchanged`], so a
/// subsequent `get` returns a clean snapshot suitable for loading into an
/// edit context.
#[derive(Clone)]
pub struct InMemoryRecordStore<T: Record> {
    records: Arc<RwLock<IndexMap<EntityId<T::Marker>, T>>>,
}

impl<T: Record> InMemoryRecordStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Create a store pre-loaded with records
    ///
    /// Seeded records are stored as `Unchanged` in the given order.
    pub async fn seeded(records: Vec<T>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write().await;
            for record in records {
                map.insert(record.uid(), record.with_state(StateCode::Unchanged));
            }
        }
        store
    }

    /// Number of records currently stored
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T: Record> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryRecordStore<T> {
    async fn query(&self) -> RecordResult<RecordQuery<T>> {
        let records = self.records.read().await;
        Ok(RecordQuery::new(records.values().cloned().collect()))
    }

    async fn get(&self, uid: &EntityId<T::Marker>) -> RecordResult<Option<T>> {
        Ok(self.records.read().await.get(uid).cloned())
    }

    async fn insert(&self, record: &T) -> RecordResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.uid()) {
            return Err(RecordError::already_exists(T::record_name(), record.uid()));
        }
        records.insert(record.uid(), record.with_state(StateCode::Unchanged));
        Ok(())
    }

    async fn update(&self, record: &T) -> RecordResult<()> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.uid()) {
            return Err(RecordError::not_found(T::record_name(), record.uid()));
        }
        records.insert(record.uid(), record.with_state(StateCode::Unchanged));
        Ok(())
    }

    async fn delete(&self, uid: &EntityId<T::Marker>) -> RecordResult<()> {
        let mut records = self.records.write().await;
        // shift_remove keeps the iteration order of the remaining records
        match records.shift_remove(uid) {
            Some(_) => Ok(()),
            None => Err(RecordError::not_found(T::record_name(), uid)),
        }
    }
}
