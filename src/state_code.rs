// Copyright 2025 Cowboy AI, LLC.

//! Per-record persistence lifecycle states
//!
//! Every record carries exactly one `StateCode`. The state code is
//! authoritative for persistence: a command handler routes on it alone and
//! never infers the state from field comparison.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a record instance
///
/// The state code drives which persistence operation a command handler
/// performs:
///
/// - `New` → insert
/// - `Modified` → update
/// - `Deleted` → delete
/// - `Unchanged` → no-op
///
/// # Examples
///
/// ```rust
/// use cim_records::StateCode;
///
/// // Editing an existing record marks it modified
/// assert_eq!(StateCode::Unchanged.marked_modified(), StateCode::Modified);
///
/// // A record that was never persisted stays new however often it is edited
/// assert_eq!(StateCode::New.marked_modified(), StateCode::New);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum StateCode {
    /// The record matches its persisted form
    #[default]
    Unchanged,
    /// The record has never been persisted
    New,
    /// The record differs from its persisted form
    Modified,
    /// The record is marked for removal from the store
    Deleted,
}

impl StateCode {
    /// The state after a field edit
    ///
    /// `Unchanged` becomes `Modified`; `New`, `Modified`, and `Deleted` are
    /// already pending a persistence operation and keep their state.
    pub fn marked_modified(self) -> Self {
        match self {
            StateCode::Unchanged => StateCode::Modified,
            other => other,
        }
    }

    /// The state after the record is marked for removal
    pub fn marked_deleted(self) -> Self {
        StateCode::Deleted
    }

    /// Whether this state requires a persistence operation
    pub fn is_mutation(self) -> bool {
        !matches!(self, StateCode::Unchanged)
    }

    /// Get the state name for logging and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            StateCode::Unchanged => "Unchanged",
            StateCode::New => "New",
            StateCode::Modified => "Modified",
            StateCode::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
