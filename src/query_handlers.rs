// Copyright 2025 Cowboy AI, LLC.

//! List and item request handlers
//!
//! Both handler kinds follow the same dispatch rule: a per-record-type
//! override handler, injected at construction, takes precedence; otherwise
//! the generic implementation runs. Call sites register bespoke logic per
//! record type without touching the generic path.
//!
//! The generic list path is order-sensitive: filter, then count the
//! filtered-but-unpaginated query, then sort, then page. Counting after
//! paging would silently break total-count correctness.

use crate::entity::Record;
use crate::errors::{RecordError, RecordResult};
use crate::persistence::RecordStore;
use crate::requests::{ItemQueryRequest, ItemQueryResult, ListQueryRequest, ListQueryResult};
use crate::sorting::RecordSorter;
use crate::specification::FilterProvider;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Handles list requests for one record type
#[async_trait]
pub trait ListRequestHandler<T: Record>: Send + Sync {
    /// Run the list query and return the materialized page
    ///
    /// `Err` is reserved for pipeline configuration errors; data-level
    /// outcomes, including an empty result set, come back in the result.
    async fn handle(&self, request: ListQueryRequest) -> RecordResult<ListQueryResult<T>>;
}

/// Handles single-item requests for one record type
#[async_trait]
pub trait ItemRequestHandler<T: Record>: Send + Sync {
    /// Fetch one record by key
    ///
    /// An absent record is an expected outcome reported through the result,
    /// never an error.
    async fn handle(&self, request: ItemQueryRequest<T>) -> RecordResult<ItemQueryResult<T>>;
}

/// Generic list handler composing filter, count, sort, and page over a store
///
/// # Examples
///
/// ```rust
/// use cim_records::{
///     GenericListRequestHandler, InMemoryRecordStore, ListQueryRequest, ListRequestHandler,
///     WeatherForecast, WeatherForecastSorter, WeatherLocationId,
/// };
/// use chrono::NaiveDate;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let location = WeatherLocationId::new();
/// let store = InMemoryRecordStore::seeded(vec![
///     WeatherForecast::new(location, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), 18, "Mild"),
///     WeatherForecast::new(location, NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(), 24, "Warm"),
/// ])
/// .await;
///
/// let handler = GenericListRequestHandler::<WeatherForecast>::new(Arc::new(store))
///     .with_sorter(Arc::new(WeatherForecastSorter));
///
/// let result = handler.handle(ListQueryRequest::new()).await.unwrap();
/// assert_eq!(result.total_count, 2);
/// // Default ordering: date, descending
/// assert_eq!(result.items[0].temperature_c, 24);
/// # });
/// ```
pub struct GenericListRequestHandler<T: Record> {
    store: Arc<dyn RecordStore<T>>,
    filters: Option<Arc<dyn FilterProvider<T>>>,
    sorter: Option<Arc<dyn RecordSorter<T>>>,
    custom: Option<Arc<dyn ListRequestHandler<T>>>,
}

impl<T: Record> GenericListRequestHandler<T> {
    /// Create a handler over a store, with no providers wired
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self {
            store,
            filters: None,
            sorter: None,
            custom: None,
        }
    }

    /// Wire the record type's filter provider
    pub fn with_filter_provider(mut self, filters: Arc<dyn FilterProvider<T>>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Wire the record type's sorter
    pub fn with_sorter(mut self, sorter: Arc<dyn RecordSorter<T>>) -> Self {
        self.sorter = Some(sorter);
        self
    }

    /// Install an override handler that takes precedence over the generic path
    pub fn with_override(mut self, custom: Arc<dyn ListRequestHandler<T>>) -> Self {
        self.custom = Some(custom);
        self
    }
}

#[async_trait]
impl<T: Record> ListRequestHandler<T> for GenericListRequestHandler<T> {
    async fn handle(&self, request: ListQueryRequest) -> RecordResult<ListQueryResult<T>> {
        if let Some(custom) = &self.custom {
            debug!(record = T::record_name(), "delegating to list override");
            return custom.handle(request).await;
        }

        // Filters or sorters on a record type with nothing wired is a
        // wiring bug, not a data condition. Unknown names inside a wired
        // provider stay a no-op.
        if !request.filters.is_empty() && self.filters.is_none() {
            return Err(RecordError::configuration(format!(
                "filters supplied but no filter provider is registered for {}",
                T::record_name()
            )));
        }
        if !request.sorters.is_empty() && self.sorter.is_none() {
            return Err(RecordError::configuration(format!(
                "sorters supplied but no sorter is registered for {}",
                T::record_name()
            )));
        }

        if request.cancellation.is_cancelled() {
            return Ok(ListQueryResult::failure("list query cancelled"));
        }

        let mut query = self.store.query().await?;

        if let Some(filters) = &self.filters {
            query = filters.apply(query, &request.filters);
        }

        // Count before paging: the total must reflect the filters, never
        // the page slice.
        let total_count = query.count();

        if let Some(sorter) = &self.sorter {
            query = sorter.apply(query, &request.sorters);
        }

        if request.cancellation.is_cancelled() {
            return Ok(ListQueryResult::failure("list query cancelled"));
        }

        let query = match request.page_size {
            Some(page_size) if page_size > 0 => query.page(request.start_index, page_size),
            _ => query,
        };

        debug!(
            record = T::record_name(),
            total_count, "list query materialized"
        );
        Ok(ListQueryResult::success(query.into_items(), total_count))
    }
}

/// Generic item handler fetching one record by key
pub struct GenericItemRequestHandler<T: Record> {
    store: Arc<dyn RecordStore<T>>,
    custom: Option<Arc<dyn ItemRequestHandler<T>>>,
}

impl<T: Record> GenericItemRequestHandler<T> {
    /// Create a handler over a store
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self {
            store,
            custom: None,
        }
    }

    /// Install an override handler that takes precedence over the generic path
    pub fn with_override(mut self, custom: Arc<dyn ItemRequestHandler<T>>) -> Self {
        self.custom = Some(custom);
        self
    }
}

#[async_trait]
impl<T: Record> ItemRequestHandler<T> for GenericItemRequestHandler<T> {
    async fn handle(&self, request: ItemQueryRequest<T>) -> RecordResult<ItemQueryResult<T>> {
        if let Some(custom) = &self.custom {
            debug!(record = T::record_name(), "delegating to item override");
            return custom.handle(request).await;
        }

        if request.cancellation.is_cancelled() {
            return Ok(ItemQueryResult::failure("item query cancelled"));
        }

        match self.store.get(&request.uid).await? {
            Some(item) => Ok(ItemQueryResult::success(item)),
            None => Ok(ItemQueryResult::failure(format!(
                "{} {} not found",
                T::record_name(),
                request.uid
            ))),
        }
    }
}
