// Copyright 2025 Cowboy AI, LLC.

//! Boundary contracts for the record pipeline
//!
//! These are the wire-level types at the pipeline boundary: list, item, and
//! command requests with their result counterparts, plus the named
//! filter/sort descriptors that decouple the request transport from concrete
//! predicate and ordering implementations.
//!
//! Result types always carry a success flag and a message. Expected absence
//! ("not found", "no matching records") is reported through the result,
//! never through an error.

use crate::entity::{EntityId, Record};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A named filter descriptor
///
/// The name selects a specification registered with a record type's filter
/// provider; the data payload is opaque at this level and parsed by the
/// concrete specification (a GUID string, a JSON-encoded month/year pair).
/// A definition whose name has no registered specification is ignored, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterDefinition {
    /// Name of the registered filter to apply
    pub filter_name: String,
    /// Opaque payload for the specification to parse
    pub filter_data: String,
}

impl FilterDefinition {
    /// Create a filter definition
    pub fn new(filter_name: impl Into<String>, filter_data: impl Into<String>) -> Self {
        Self {
            filter_name: filter_name.into(),
            filter_data: filter_data.into(),
        }
    }
}

/// A named sort descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SortDefinition {
    /// Field name to order by, resolved against the record type's sorter
    pub sort_field: String,
    /// Whether to sort in descending order
    pub sort_descending: bool,
}

impl SortDefinition {
    /// Create an ascending sort on a field
    pub fn ascending(sort_field: impl Into<String>) -> Self {
        Self {
            sort_field: sort_field.into(),
            sort_descending: false,
        }
    }

    /// Create a descending sort on a field
    pub fn descending(sort_field: impl Into<String>) -> Self {
        Self {
            sort_field: sort_field.into(),
            sort_descending: true,
        }
    }
}

/// Request for a filtered, sorted, paged list of records
///
/// `page_size` of `None` (or zero) disables paging and returns everything
/// that matches the filters.
#[derive(Debug, Clone, Default)]
pub struct ListQueryRequest {
    /// Index of the first record to return from the sorted, filtered set
    pub start_index: usize,
    /// Page length; `None` or `Some(0)` returns the full result set
    pub page_size: Option<usize>,
    /// Sort definitions, applied in list order
    pub sorters: Vec<SortDefinition>,
    /// Filter definitions, AND-composed in list order
    pub filters: Vec<FilterDefinition>,
    /// Cooperative cancellation token threaded through to the store call
    pub cancellation: CancellationToken,
}

impl ListQueryRequest {
    /// Create an unfiltered, unpaged request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page window
    pub fn with_paging(mut self, start_index: usize, page_size: usize) -> Self {
        self.start_index = start_index;
        self.page_size = Some(page_size);
        self
    }

    /// Set the filter definitions
    pub fn with_filters(mut self, filters: Vec<FilterDefinition>) -> Self {
        self.filters = filters;
        self
    }

    /// Set the sort definitions
    pub fn with_sorters(mut self, sorters: Vec<SortDefinition>) -> Self {
        self.sorters = sorters;
        self
    }

    /// Set the cancellation token
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Result of a list query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQueryResult<T> {
    /// The materialized page of records
    pub items: Vec<T>,
    /// Count over the filtered but unpaginated query
    pub total_count: usize,
    /// Whether the query succeeded
    pub successful: bool,
    /// Optional outcome message
    pub message: Option<String>,
}

impl<T> ListQueryResult<T> {
    /// Create a successful result
    pub fn success(items: Vec<T>, total_count: usize) -> Self {
        Self {
            items,
            total_count,
            successful: true,
            message: None,
        }
    }

    /// Create a failed result carrying a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            successful: false,
            message: Some(message.into()),
        }
    }

    /// Map the items to a different type, preserving the metadata
    pub fn map<U, F>(self, f: F) -> ListQueryResult<U>
    where
        F: FnMut(T) -> U,
    {
        ListQueryResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            successful: self.successful,
            message: self.message,
        }
    }
}

/// Request for a single record by key
#[derive(Debug, Clone)]
pub struct ItemQueryRequest<T: Record> {
    /// Key of the record to fetch
    pub uid: EntityId<T::Marker>,
    /// Cooperative cancellation token
    pub cancellation: CancellationToken,
}

impl<T: Record> ItemQueryRequest<T> {
    /// Create an item request for a key
    pub fn new(uid: EntityId<T::Marker>) -> Self {
        Self {
            uid,
            cancellation: CancellationToken::new(),
        }
    }

    /// Set the cancellation token
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Result of an item query
///
/// An absent record is an expected outcome: `successful` is false, `item` is
/// `None`, and the message says what was missing. No error is raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemQueryResult<T> {
    /// The record, if found
    pub item: Option<T>,
    /// Whether the record was found
    pub successful: bool,
    /// Optional outcome message
    pub message: Option<String>,
}

impl<T> ItemQueryResult<T> {
    /// Create a successful result
    pub fn success(item: T) -> Self {
        Self {
            item: Some(item),
            successful: true,
            message: None,
        }
    }

    /// Create a not-found or failed result carrying a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            item: None,
            successful: false,
            message: Some(message.into()),
        }
    }
}

/// Request to persist a single record according to its state code
#[derive(Debug, Clone)]
pub struct CommandRequest<T> {
    /// The record to persist; its state code selects the operation
    pub item: T,
    /// Cooperative cancellation token
    pub cancellation: CancellationToken,
}

impl<T> CommandRequest<T> {
    /// Create a command request
    pub fn new(item: T) -> Self {
        Self {
            item,
            cancellation: CancellationToken::new(),
        }
    }

    /// Set the cancellation token
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Result of a command
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommandResult {
    /// Whether the command succeeded
    pub successful: bool,
    /// Optional outcome message
    pub message: Option<String>,
    /// Key of the affected record, when one applies
    pub key_value: Option<Uuid>,
}

impl CommandResult {
    /// Create a successful result carrying the affected key
    pub fn success(key_value: Option<Uuid>) -> Self {
        Self {
            successful: true,
            message: None,
            key_value,
        }
    }

    /// Create a successful result with an informational message
    pub fn success_with_message(key_value: Option<Uuid>, message: impl Into<String>) -> Self {
        Self {
            successful: true,
            message: Some(message.into()),
            key_value,
        }
    }

    /// Create a failed result carrying a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            message: Some(message.into()),
            key_value: None,
        }
    }
}
