// Copyright 2025 Cowboy AI, LLC.

//! The store contract

use crate::entity::{EntityId, Record};
use crate::errors::RecordResult;
use crate::query::RecordQuery;
use async_trait::async_trait;

/// A queryable, persistable collection of one record type
///
/// Queries return a snapshot: the pipeline composes filtering, counting,
/// sorting, and paging over the snapshot without holding any store lock.
/// Mutations are single-record operations; the store provides per-operation
/// atomicity and nothing more. There is no transaction spanning multiple
/// calls.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Take a snapshot of all records as a queryable
    async fn query(&self) -> RecordResult<RecordQuery<T>>;

    /// Fetch a single record by key
    async fn get(&self, uid: &EntityId<T::Marker>) -> RecordResult<Option<T>>;

    /// Insert a record; fails if the key already exists
    async fn insert(&self, record: &T) -> RecordResult<()>;

    /// Update a record; fails if the key is absent
    async fn update(&self, record: &T) -> RecordResult<()>;

    /// Delete a record by key; fails if the key is absent
    async fn delete(&self, uid: &EntityId<T::Marker>) -> RecordResult<()>;
}
