// Copyright 2025 Cowboy AI, LLC.

//! Sorting and the sorter provider contract
//!
//! Each record type declares its sortable fields through a
//! [`RecordSorter`]: a compile-time dispatch table from field name to a
//! typed comparator function, plus a default ordering used when a request
//! carries no sort definitions. Field lookup replaces run-time property
//! reflection; an unknown field name resolves to `None` in the table and the
//! definition degrades to a no-op.

use crate::query::RecordQuery;
use crate::requests::SortDefinition;
use std::cmp::Ordering;
use tracing::debug;

/// A typed comparator over one record type
pub type SortComparer<T> = fn(&T, &T) -> Ordering;

/// Declares the sortable fields and default ordering of a record type
pub trait RecordSorter<T>: Send + Sync {
    /// Look up the comparator for a field name
    ///
    /// Returns `None` for unknown fields; the definition is then skipped
    /// rather than failing the query.
    fn comparer(&self, field: &str) -> Option<SortComparer<T>>;

    /// The type's default ordering, applied when no definitions are supplied
    fn default_sort(&self) -> SortDefinition;

    /// Apply sort definitions to the query
    ///
    /// With no definitions, the default ordering applies. Otherwise each
    /// definition is applied in list order with a stable sort, so the last
    /// definition becomes the primary order and earlier ones survive as
    /// tie-breaks. Remaining ties keep store iteration order; no secondary
    /// key is implied.
    fn apply(&self, query: RecordQuery<T>, definitions: &[SortDefinition]) -> RecordQuery<T> {
        if definitions.is_empty() {
            let default = self.default_sort();
            return match self.comparer(&default.sort_field) {
                Some(comparer) => query.order_by(comparer, default.sort_descending),
                None => query,
            };
        }

        definitions.iter().fold(query, |query, definition| {
            match self.comparer(&definition.sort_field) {
                Some(comparer) => query.order_by(comparer, definition.sort_descending),
                None => {
                    debug!(
                        field = %definition.sort_field,
                        "unknown sort field, skipping definition"
                    );
                    query
                }
            }
        })
    }
}
