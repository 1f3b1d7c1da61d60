//! # CIM Records
//!
//! A generic record-access pipeline: list, item, and command request
//! handlers with pluggable filtering, sorting, and pagination, plus the
//! aggregate-root persistence orchestration that keeps a parent record and
//! its owned child records consistent under edit.
//!
//! The building blocks:
//! - **Record**: an immutable value with a typed key and a state code
//! - **StateCode**: per-record lifecycle tag driving persistence
//! - **Specification / FilterProvider**: named, composable predicates
//! - **RecordSorter**: compile-time field-name→comparator dispatch
//! - **Request handlers**: generic list/item/command paths with
//!   per-record-type overrides injected at construction
//! - **EditContext**: dirty tracking against the last-loaded snapshot
//! - **Aggregate**: root + owned children saved as one logical operation
//!
//! ## Design Principles
//!
//! 1. **Type Safety**: phantom-typed keys make cross-type mixups a compile
//!    error
//! 2. **Immutability**: records are values; edits produce new values
//! 3. **Explicit State**: the state code, not field comparison, selects the
//!    persistence operation
//! 4. **Results over Exceptions**: data-level outcomes travel in result
//!    objects; only configuration errors propagate as `Err`
//! 5. **Composition over Lookup**: per-type overrides are injected at
//!    construction, never resolved from a runtime registry
//!
//! ## Query pipeline order
//!
//! The generic list path is filter → count → sort → page. The count is
//! taken over the filtered-but-unpaginated query, so the total always
//! reflects the filters and never the page slice.

#![warn(missing_docs)]

mod aggregate;
mod command_handlers;
mod edit_context;
mod entity;
mod errors;
mod invoice;
mod persistence;
mod query;
mod query_handlers;
mod requests;
mod sorting;
mod specification;
mod state_code;
mod weather;

// Re-export core types
pub use aggregate::{Aggregate, AggregateComposer};
pub use command_handlers::{AggregateCommandHandler, CommandHandler, GenericCommandHandler};
pub use edit_context::EditContext;
pub use entity::{EntityId, Record};
pub use errors::{RecordError, RecordResult};
pub use persistence::{InMemoryRecordStore, RecordStore};
pub use query::RecordQuery;
pub use query_handlers::{
    GenericItemRequestHandler, GenericListRequestHandler, ItemRequestHandler, ListRequestHandler,
};
pub use requests::{
    CommandRequest, CommandResult, FilterDefinition, ItemQueryRequest, ItemQueryResult,
    ListQueryRequest, ListQueryResult, SortDefinition,
};
pub use sorting::{RecordSorter, SortComparer};
pub use specification::{FilterProvider, Specification};
pub use state_code::StateCode;

// Re-export the cancellation token used by requests so callers don't need a
// direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;

pub use invoice::{
    invoice_aggregate, Customer, CustomerId, Invoice, InvoiceAggregate, InvoiceComposer,
    InvoiceFilterProvider, InvoiceId, InvoiceItem, InvoiceItemFilterProvider, InvoiceItemId,
    InvoiceItemSorter, InvoiceSorter, InvoicesByCustomer, ItemsByInvoice, INVOICES_BY_CUSTOMER,
    ITEMS_BY_INVOICE,
};
pub use weather::{
    ForecastsByLocation, ForecastsByMonth, WeatherForecast, WeatherForecastFilterProvider,
    WeatherForecastId, WeatherForecastSorter, WeatherLocationId, FORECASTS_BY_LOCATION,
    FORECASTS_BY_MONTH,
};

// Re-export common marker types
pub mod markers {
    //! Marker types for phantom type parameters
    pub use crate::invoice::{CustomerMarker, InvoiceItemMarker, InvoiceMarker};
    pub use crate::weather::{WeatherForecastMarker, WeatherLocationMarker};
}
