// Copyright 2025 Cowboy AI, LLC.

//! Persistence layer for the record pipeline
//!
//! The store is an abstraction over a queryable, persistable collection:
//! snapshot queries plus single-record insert/update/delete. Handlers obtain
//! one snapshot per operation and never hold one across requests. The
//! in-memory store is the reference implementation used by the demo domains
//! and the test suite.

mod in_memory;
mod store;

pub use in_memory::InMemoryRecordStore;
pub use store::RecordStore;
