// Copyright 2025 Cowboy AI, LLC.

//! Aggregates: a root record plus an owned child collection
//!
//! An aggregate keeps a parent record and a variable-length collection of
//! child records consistent under edit. Each child carries its own state
//! code; removed existing children move to a pending-removal set so the
//! save sequence still issues their deletes. Root-derived fields (totals)
//! are recomputed after every mutation and are never stale.
//!
//! The aggregate exclusively owns its child collection for the duration of
//! an edit session; no other component mutates it concurrently.

use crate::entity::{EntityId, Record};
use crate::errors::{RecordError, RecordResult};
use crate::state_code::StateCode;
use indexmap::IndexMap;

/// Recomputes root-derived fields from the live child collection
///
/// Implementations must change only the derived fields: everything else on
/// the returned root, the state code included, is expected to match the
/// input. The aggregate handles state flipping itself.
pub trait AggregateComposer<R: Record, C: Record>: Send + Sync {
    /// Produce the root as derived from the live, non-deleted children
    fn recompose(&self, root: &R, live_children: &[C]) -> R;
}

/// A root record and its owned child collection
///
/// # Child state machine
///
/// ```mermaid
/// graph LR
///     A[add_child] -->|New| B[live set]
///     B -->|update_child| C[Modified]
///     B -->|remove_child, was New| D[dropped outright]
///     B -->|remove_child, was Existing| E[Deleted, pending removal]
/// ```
pub struct Aggregate<R: Record, C: Record, P: AggregateComposer<R, C>> {
    root: R,
    children: IndexMap<EntityId<C::Marker>, C>,
    pending_removal: Vec<C>,
    composer: P,
}

impl<R: Record, C: Record, P: AggregateComposer<R, C>> Aggregate<R, C, P> {
    /// Create an aggregate from a loaded root and child set
    ///
    /// Derived root fields are recomputed immediately, so a root loaded
    /// inconsistent with its children is corrected (and marked modified) on
    /// construction.
    pub fn new(root: R, children: Vec<C>, composer: P) -> Self {
        let children = children
            .into_iter()
            .map(|child| (child.uid(), child))
            .collect();
        let mut aggregate = Self {
            root,
            children,
            pending_removal: Vec::new(),
            composer,
        };
        aggregate.notify_updated();
        aggregate
    }

    /// The root record
    pub fn root(&self) -> &R {
        &self.root
    }

    /// The live, non-deleted children in collection order
    pub fn children(&self) -> impl Iterator<Item = &C> {
        self.children.values()
    }

    /// Number of live children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// A live child by key
    pub fn child(&self, uid: &EntityId<C::Marker>) -> Option<&C> {
        self.children.get(uid)
    }

    /// Children flipped to `Deleted` and awaiting their delete command
    pub fn deleted_children(&self) -> &[C] {
        &self.pending_removal
    }

    /// Clones of the live children currently in the given state
    pub fn children_in_state(&self, state: StateCode) -> Vec<C> {
        self.children
            .values()
            .filter(|child| child.state() == state)
            .cloned()
            .collect()
    }

    /// Add a new child to the live collection
    ///
    /// The child enters the collection as `New` regardless of the state it
    /// arrived with.
    pub fn add_child(&mut self, child: C) -> RecordResult<()> {
        let child = child.with_state(StateCode::New);
        if self.children.contains_key(&child.uid()) {
            return Err(RecordError::already_exists(C::record_name(), child.uid()));
        }
        self.children.insert(child.uid(), child);
        self.notify_updated();
        Ok(())
    }

    /// Replace a live child's fields
    ///
    /// An existing child moves `Unchanged` → `Modified`; a child that is
    /// still `New` stays `New`. Submitting a value structurally equal to the
    /// current one is a no-op and flips nothing.
    pub fn update_child(&mut self, child: C) -> RecordResult<()> {
        let uid = child.uid();
        let Some(existing) = self.children.get(&uid) else {
            return Err(RecordError::not_found(C::record_name(), uid));
        };

        if *existing == child.with_state(existing.state()) {
            return Ok(());
        }

        let state = existing.state().marked_modified();
        self.children.insert(uid, child.with_state(state));
        self.notify_updated();
        Ok(())
    }

    /// Remove a child from the live collection
    ///
    /// A `New` child is dropped outright: it never reached the store, so no
    /// delete command is owed. Any other child flips to `Deleted` and moves
    /// to the pending-removal set.
    pub fn remove_child(&mut self, uid: &EntityId<C::Marker>) -> RecordResult<()> {
        let Some(child) = self.children.shift_remove(uid) else {
            return Err(RecordError::not_found(C::record_name(), *uid));
        };

        if child.state() != StateCode::New {
            self.pending_removal
                .push(child.with_state(StateCode::Deleted));
        }
        self.notify_updated();
        Ok(())
    }

    /// Recompute root-derived fields from the live collection
    ///
    /// Invoked after every mutation. The root is replaced (and marked
    /// modified) only if the derived value actually changed, so a no-op
    /// recompute never flips a clean root.
    pub fn notify_updated(&mut self) {
        let live: Vec<C> = self.children.values().cloned().collect();
        let recomposed = self.composer.recompose(&self.root, &live);
        if recomposed != self.root {
            let state = self.root.state().marked_modified();
            self.root = recomposed.with_state(state);
        }
    }

    /// Whether any record in the aggregate has a pending persistence operation
    pub fn is_dirty(&self) -> bool {
        !self.pending_removal.is_empty()
            || self.root.state().is_mutation()
            || self.children.values().any(|child| child.state().is_mutation())
    }

    /// Mark every record in the aggregate as persisted
    ///
    /// Privileged operation for the persistence layer, called after a
    /// successful save. Live children and the root reset to `Unchanged`;
    /// pending removals are dropped.
    pub fn mark_saved(&mut self) {
        for child in self.children.values_mut() {
            *child = child.with_state(StateCode::Unchanged);
        }
        self.pending_removal.clear();
        self.root = self.root.with_state(StateCode::Unchanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct BasketMarker;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct LineMarker;

    #[derive(Debug, Clone, PartialEq)]
    struct Basket {
        uid: EntityId<BasketMarker>,
        total: i64,
        state: StateCode,
    }

    impl Record for Basket {
        type Marker = BasketMarker;

        fn uid(&self) -> EntityId<BasketMarker> {
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
            "Basket"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        uid: EntityId<LineMarker>,
        amount: i64,
        state: StateCode,
    }

    impl Line {
        fn existing(amount: i64) -> Self {
            Self {
                uid: EntityId::new(),
                amount,
                state: StateCode::Unchanged,
            }
        }
    }

    impl Record for Line {
        type Marker = LineMarker;

        fn uid(&self) -> EntityId<LineMarker> {
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
            "Line"
        }
    }

    struct BasketComposer;

    impl AggregateComposer<Basket, Line> for BasketComposer {
        fn recompose(&self, root: &Basket, live_children: &[Line]) -> Basket {
            Basket {
                total: live_children.iter().map(|line| line.amount).sum(),
                ..root.clone()
            }
        }
    }

    fn basket_with(lines: Vec<Line>) -> Aggregate<Basket, Line, BasketComposer> {
        let total = lines.iter().map(|line| line.amount).sum();
        let root = Basket {
            uid: EntityId::new(),
            total,
            state: StateCode::Unchanged,
        };
        Aggregate::new(root, lines, BasketComposer)
    }

    /// Test a consistent load leaves the root clean
    #[test]
    fn test_consistent_load_is_clean() {
        let aggregate = basket_with(vec![Line::existing(10), Line::existing(20)]);

        assert_eq!(aggregate.root().total, 30);
        assert_eq!(aggregate.root().state(), StateCode::Unchanged);
        assert!(!aggregate.is_dirty());
    }

    /// Test adding a child marks it New and recomputes the total
    #[test]
    fn test_add_child() {
        let mut aggregate = basket_with(vec![Line::existing(10)]);

        aggregate.add_child(Line::existing(5)).unwrap();

        assert_eq!(aggregate.root().total, 15);
        assert_eq!(aggregate.root().state(), StateCode::Modified);
        assert_eq!(aggregate.children_in_state(StateCode::New).len(), 1);
    }

    /// Test duplicate child keys are rejected
    #[test]
    fn test_add_duplicate_child_fails() {
        let line = Line::existing(10);
        let mut aggregate = basket_with(vec![line.clone()]);

        let err = aggregate.add_child(line).unwrap_err();
        assert!(matches!(err, RecordError::RecordAlreadyExists { .. }));
    }

    /// Test editing an existing child flips Unchanged to Modified
    #[test]
    fn test_update_child_transitions() {
        let line = Line::existing(10);
        let mut aggregate = basket_with(vec![line.clone()]);

        let edited = Line {
            amount: 12,
            ..line.clone()
        };
        aggregate.update_child(edited).unwrap();

        assert_eq!(aggregate.child(&line.uid()).unwrap().state(), StateCode::Modified);
        assert_eq!(aggregate.root().total, 12);
    }

    /// Test editing a New child leaves it New
    #[test]
    fn test_update_new_child_stays_new() {
        let mut aggregate = basket_with(vec![]);
        let line = Line::existing(10);
        aggregate.add_child(line.clone()).unwrap();

        let edited = Line {
            amount: 11,
            ..line.clone()
        };
        aggregate.update_child(edited).unwrap();

        assert_eq!(aggregate.child(&line.uid()).unwrap().state(), StateCode::New);
    }

    /// Test an identical update is a no-op and flips nothing
    #[test]
    fn test_update_with_equal_value_is_noop() {
        let line = Line::existing(10);
        let mut aggregate = basket_with(vec![line.clone()]);

        aggregate.update_child(line.clone()).unwrap();

        assert_eq!(aggregate.child(&line.uid()).unwrap().state(), StateCode::Unchanged);
        assert!(!aggregate.is_dirty());
    }

    /// Test removing a New child drops it outright
    ///
    /// ```mermaid
    /// graph LR
    ///     A[add_child New] -->|remove_child| B[gone]
    ///     B -->|deleted_children| C[empty]
    /// ```
    #[test]
    fn test_remove_new_child_drops_it() {
        let mut aggregate = basket_with(vec![Line::existing(10)]);
        let line = Line::existing(5);
        aggregate.add_child(line.clone()).unwrap();

        aggregate.remove_child(&line.uid()).unwrap();

        assert_eq!(aggregate.child_count(), 1);
        assert!(aggregate.deleted_children().is_empty());
        assert_eq!(aggregate.root().total, 10);
    }

    /// Test removing an existing child flips it to Deleted and keeps it pending
    #[test]
    fn test_remove_existing_child_pends_delete() {
        let keep = Line::existing(10);
        let remove = Line::existing(20);
        let mut aggregate = basket_with(vec![keep, remove.clone()]);

        aggregate.remove_child(&remove.uid()).unwrap();

        assert_eq!(aggregate.root().total, 10);
        assert_eq!(aggregate.deleted_children().len(), 1);
        assert_eq!(aggregate.deleted_children()[0].state(), StateCode::Deleted);
        assert_eq!(aggregate.deleted_children()[0].uid(), remove.uid());
    }

    /// Test the derived total is recomputed, never stale
    #[test]
    fn test_total_tracks_live_children() {
        let first = Line::existing(10);
        let mut aggregate = basket_with(vec![first.clone()]);

        let second = Line::existing(20);
        aggregate.add_child(second.clone()).unwrap();
        assert_eq!(aggregate.root().total, 30);

        aggregate
            .update_child(Line {
                amount: 15,
                ..first.clone()
            })
            .unwrap();
        assert_eq!(aggregate.root().total, 35);

        aggregate.remove_child(&second.uid()).unwrap();
        assert_eq!(aggregate.root().total, 15);
    }

    /// Test mark_saved resets every record to Unchanged
    #[test]
    fn test_mark_saved() {
        let remove = Line::existing(20);
        let mut aggregate = basket_with(vec![Line::existing(10), remove.clone()]);
        aggregate.add_child(Line::existing(5)).unwrap();
        aggregate.remove_child(&remove.uid()).unwrap();
        assert!(aggregate.is_dirty());

        aggregate.mark_saved();

        assert!(!aggregate.is_dirty());
        assert!(aggregate.deleted_children().is_empty());
        assert_eq!(aggregate.root().state(), StateCode::Unchanged);
        assert!(aggregate
            .children()
            .all(|child| child.state() == StateCode::Unchanged));
    }
}
