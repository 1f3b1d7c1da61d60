// Copyright 2025 Cowboy AI, LLC.

//! Command handlers
//!
//! A command persists one record according to its state code: New→insert,
//! Modified→update, Deleted→delete, Unchanged→no-op. The handler never
//! infers the state from field comparison; the caller (edit context or
//! aggregate) sets it before the command is issued.
//!
//! The aggregate command handler walks an aggregate's children and root,
//! issuing the matching command per record inside one logical save.

use crate::aggregate::{Aggregate, AggregateComposer};
use crate::entity::Record;
use crate::errors::RecordResult;
use crate::persistence::RecordStore;
use crate::requests::{CommandRequest, CommandResult};
use crate::state_code::StateCode;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handles persistence commands for one record type
#[async_trait]
pub trait CommandHandler<T: Record>: Send + Sync {
    /// Persist the record according to its state code
    ///
    /// Data-level failures (missing key, duplicate key) come back as an
    /// unsuccessful result; `Err` is reserved for configuration errors.
    async fn handle(&self, request: CommandRequest<T>) -> RecordResult<CommandResult>;
}

/// Generic command handler routing on the record's state code
pub struct GenericCommandHandler<T: Record> {
    store: Arc<dyn RecordStore<T>>,
    custom: Option<Arc<dyn CommandHandler<T>>>,
}

impl<T: Record> GenericCommandHandler<T> {
    /// Create a handler over a store
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self {
            store,
            custom: None,
        }
    }

    /// Install an override handler that takes precedence over the generic path
    pub fn with_override(mut self, custom: Arc<dyn CommandHandler<T>>) -> Self {
        self.custom = Some(custom);
        self
    }
}

#[async_trait]
impl<T: Record> CommandHandler<T> for GenericCommandHandler<T> {
    async fn handle(&self, request: CommandRequest<T>) -> RecordResult<CommandResult> {
        if let Some(custom) = &self.custom {
            debug!(record = T::record_name(), "delegating to command override");
            return custom.handle(request).await;
        }

        if request.cancellation.is_cancelled() {
            return Ok(CommandResult::failure("command cancelled"));
        }

        let uid = request.item.uid();
        let state = request.item.state();
        debug!(
            record = T::record_name(),
            %uid,
            state = state.name(),
            "routing command"
        );

        let outcome = match state {
            StateCode::New => self.store.insert(&request.item).await,
            StateCode::Modified => self.store.update(&request.item).await,
            StateCode::Deleted => self.store.delete(&uid).await,
            StateCode::Unchanged => {
                return Ok(CommandResult::success_with_message(
                    Some(*uid.as_uuid()),
                    format!("{} {} is unchanged, nothing to persist", T::record_name(), uid),
                ));
            }
        };

        match outcome {
            Ok(()) => Ok(CommandResult::success(Some(*uid.as_uuid()))),
            Err(err) => Ok(CommandResult::failure(err.to_string())),
        }
    }
}

/// Persists an aggregate as a sequence of per-record commands
///
/// Deletes are issued before updates and inserts, so a deleted key being
/// reused never collides. The root follows its children, and only when it
/// is itself New or Modified.
///
/// The sequence is fail-fast and **not transactional**: the first failing
/// command aborts the remainder and the caller receives one aggregated
/// failure carrying that record's message. Writes already applied are not
/// rolled back, and there is no partial-success reporting.
pub struct AggregateCommandHandler<R: Record, C: Record> {
    root_handler: Arc<dyn CommandHandler<R>>,
    child_handler: Arc<dyn CommandHandler<C>>,
}

impl<R: Record, C: Record> AggregateCommandHandler<R, C> {
    /// Create a handler from the root and child command handlers
    pub fn new(
        root_handler: Arc<dyn CommandHandler<R>>,
        child_handler: Arc<dyn CommandHandler<C>>,
    ) -> Self {
        Self {
            root_handler,
            child_handler,
        }
    }

    /// Save the aggregate's pending changes as one logical operation
    ///
    /// On success the aggregate is marked saved: children reset to
    /// `Unchanged`, pending removals are dropped, and the root is clean.
    pub async fn save<P>(
        &self,
        aggregate: &mut Aggregate<R, C, P>,
        cancellation: CancellationToken,
    ) -> RecordResult<CommandResult>
    where
        P: AggregateComposer<R, C>,
    {
        // Deletes first, then updates, then inserts
        let mut pending: Vec<C> = aggregate.deleted_children().to_vec();
        pending.extend(aggregate.children_in_state(StateCode::Modified));
        pending.extend(aggregate.children_in_state(StateCode::New));

        for child in pending {
            if cancellation.is_cancelled() {
                return Ok(CommandResult::failure("aggregate save cancelled"));
            }

            let result = self
                .child_handler
                .handle(CommandRequest::new(child).with_cancellation(cancellation.clone()))
                .await?;
            if !result.successful {
                let message = result
                    .message
                    .unwrap_or_else(|| "child command failed".to_string());
                debug!(
                    root = R::record_name(),
                    child = C::record_name(),
                    %message,
                    "aggregate save aborted"
                );
                return Ok(CommandResult::failure(message));
            }
        }

        if aggregate.root().state().is_mutation() {
            if cancellation.is_cancelled() {
                return Ok(CommandResult::failure("aggregate save cancelled"));
            }

            let root = aggregate.root().clone();
            let result = self
                .root_handler
                .handle(CommandRequest::new(root).with_cancellation(cancellation))
                .await?;
            if !result.successful {
                let message = result
                    .message
                    .unwrap_or_else(|| "root command failed".to_string());
                return Ok(CommandResult::failure(message));
            }
        }

        aggregate.mark_saved();
        Ok(CommandResult::success(Some(*aggregate.root().uid().as_uuid())))
    }
}
