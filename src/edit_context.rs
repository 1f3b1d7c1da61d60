// Copyright 2025 Cowboy AI, LLC.

//! Edit contexts: dirty tracking over immutable record snapshots
//!
//! An [`EditContext`] is the mutable, UI-facing projection of a record. It
//! holds the last-loaded (or last-saved) snapshot as its base and a working
//! copy that edits apply to. Dirtiness is computed, never cached: the
//! working copy is compared structurally against the base on every ask.

use crate::entity::Record;
use crate::errors::{RecordError, RecordResult};

/// Dirty-tracking edit projection of a single record
///
/// The base record is single-assignment: loading into an already-populated
/// context is a precondition violation, not a silent overwrite.
///
/// # Examples
///
/// ```rust
/// use cim_records::{Customer, EditContext, Record, StateCode};
///
/// let customer = Customer::new("Acme").with_state(StateCode::Unchanged);
/// let mut context = EditContext::new();
/// context.load(customer.clone()).unwrap();
/// assert!(!context.is_dirty());
///
/// context.edit(|c| c.with_name("Acme Ltd")).unwrap();
/// assert!(context.is_dirty());
///
/// context.reset();
/// assert!(!context.is_dirty());
/// assert_eq!(context.record(), Some(&customer));
/// ```
#[derive(Debug, Clone)]
pub struct EditContext<T: Record> {
    base: Option<T>,
    working: Option<T>,
}

impl<T: Record> Default for EditContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> EditContext<T> {
    /// Create an empty context awaiting a load
    pub fn new() -> Self {
        Self {
            base: None,
            working: None,
        }
    }

    /// Create a context already loaded with a record
    pub fn from_record(record: T) -> Self {
        Self {
            base: Some(record.clone()),
            working: Some(record),
        }
    }

    /// Load a record, setting the base snapshot and working copy atomically
    ///
    /// Fails if the context already holds a base record.
    pub fn load(&mut self, record: T) -> RecordResult<()> {
        if self.base.is_some() {
            return Err(RecordError::PreconditionViolation(format!(
                "edit context for {} already holds a base record",
                T::record_name()
            )));
        }
        self.base = Some(record.clone());
        self.working = Some(record);
        Ok(())
    }

    /// Whether a record has been loaded
    pub fn is_loaded(&self) -> bool {
        self.base.is_some()
    }

    /// The current working copy
    pub fn record(&self) -> Option<&T> {
        self.working.as_ref()
    }

    /// The base snapshot the working copy is compared against
    pub fn base_record(&self) -> Option<&T> {
        self.base.as_ref()
    }

    /// Apply a with-semantics edit to the working copy
    pub fn edit(&mut self, f: impl FnOnce(T) -> T) -> RecordResult<()> {
        let Some(working) = self.working.take() else {
            return Err(RecordError::PreconditionViolation(format!(
                "edit context for {} has no loaded record",
                T::record_name()
            )));
        };
        self.working = Some(f(working));
        Ok(())
    }

    /// Whether the working copy differs structurally from the base
    ///
    /// Computed on every call; never cached.
    pub fn is_dirty(&self) -> bool {
        match (&self.base, &self.working) {
            (Some(base), Some(working)) => base != working,
            _ => false,
        }
    }

    /// Discard edits, re-deriving the working copy from the base
    pub fn reset(&mut self) {
        self.working = self.base.clone();
    }

    /// The record to hand to a command handler, state code updated
    ///
    /// A dirty context yields the working copy marked modified (a record
    /// that was loaded `New` stays `New`); a clean context yields the
    /// working copy as-is, which the command handler treats as a no-op.
    pub fn as_saveable(&self) -> Option<T> {
        let working = self.working.as_ref()?;
        if self.is_dirty() {
            Some(working.with_state(working.state().marked_modified()))
        } else {
            Some(working.clone())
        }
    }

    /// Accept a persisted record as the new base, clearing dirty state
    ///
    /// Privileged operation for the persistence layer, invoked after a
    /// successful save.
    pub fn set_as_saved(&mut self, saved: T) {
        self.base = Some(saved.clone());
        self.working = Some(saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::state_code::StateCode;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct ProfileMarker;

    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        uid: EntityId<ProfileMarker>,
        name: String,
        state: StateCode,
    }

    impl Profile {
        fn unchanged(name: &str) -> Self {
            Self {
                uid: EntityId::new(),
                name: name.to_string(),
                state: StateCode::Unchanged,
            }
        }

        fn with_name(&self, name: &str) -> Self {
            Self {
                name: name.to_string(),
                ..self.clone()
            }
        }
    }

    impl Record for Profile {
        type Marker = ProfileMarker;

        fn uid(&self) -> EntityId<ProfileMarker> {
            self.uid
        }

        fn state(&self) -> StateCode {
            self.state
        }

        fn with_state(&self, state: StateCode) -> Self {
            Self {
                state,
                ..self.clone()
            }
        }

        fn record_name() -> &'static str {
            "Profile"
        }
    }

    /// Test the dirty round-trip: load, edit, reset
    ///
    /// ```mermaid
    /// graph LR
    ///     A[Load] -->|clean| B[IsDirty false]
    ///     B -->|edit| C[IsDirty true]
    ///     C -->|Reset| D[IsDirty false, fields restored]
    /// ```
    #[test]
    fn test_dirty_round_trip() {
        let profile = Profile::unchanged("original");
        let mut context = EditContext::new();

        context.load(profile.clone()).unwrap();
        assert!(!context.is_dirty());

        context.edit(|p| p.with_name("edited")).unwrap();
        assert!(context.is_dirty());

        context.reset();
        assert!(!context.is_dirty());
        assert_eq!(context.record().unwrap().name, "original");
        assert_eq!(context.record(), Some(&profile));
    }

    /// Test loading into a populated context is rejected
    #[test]
    fn test_load_is_single_assignment() {
        let mut context = EditContext::from_record(Profile::unchanged("first"));

        let err = context.load(Profile::unchanged("second")).unwrap_err();
        assert!(matches!(err, RecordError::PreconditionViolation(_)));

        // The original base survives
        assert_eq!(context.base_record().unwrap().name, "first");
    }

    /// Test a dirty context yields a Modified record for saving
    #[test]
    fn test_as_saveable_marks_modified() {
        let mut context = EditContext::from_record(Profile::unchanged("original"));
        context.edit(|p| p.with_name("edited")).unwrap();

        let saveable = context.as_saveable().unwrap();
        assert_eq!(saveable.state(), StateCode::Modified);
        assert_eq!(saveable.name, "edited");
    }

    /// Test a record loaded as New stays New through edits
    #[test]
    fn test_as_saveable_keeps_new() {
        let draft = Profile::unchanged("draft").with_state(StateCode::New);
        let mut context = EditContext::from_record(draft);
        context.edit(|p| p.with_name("still a draft")).unwrap();

        assert_eq!(context.as_saveable().unwrap().state(), StateCode::New);
    }

    /// Test set_as_saved replaces the base and clears dirtiness
    #[test]
    fn test_set_as_saved() {
        let mut context = EditContext::from_record(Profile::unchanged("original"));
        context.edit(|p| p.with_name("edited")).unwrap();
        assert!(context.is_dirty());

        let saved = context.as_saveable().unwrap().with_state(StateCode::Unchanged);
        context.set_as_saved(saved.clone());

        assert!(!context.is_dirty());
        assert_eq!(context.base_record(), Some(&saved));
    }

    /// Test editing an unloaded context is rejected
    #[test]
    fn test_edit_requires_load() {
        let mut context: EditContext<Profile> = EditContext::new();
        let err = context.edit(|p| p).unwrap_err();

        assert!(matches!(err, RecordError::PreconditionViolation(_)));
    }
}
