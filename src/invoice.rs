// Copyright 2025 Cowboy AI, LLC.

//! Invoicing demo domain
//!
//! The sample aggregate: an invoice owns its items, and the invoice price
//! is derived from the live item collection.

use crate::aggregate::{Aggregate, AggregateComposer};
use crate::entity::{EntityId, Record};
use crate::requests::{FilterDefinition, SortDefinition};
use crate::sorting::{RecordSorter, SortComparer};
use crate::specification::{FilterProvider, Specification};
use crate::state_code::StateCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker for customer keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerMarker;

/// Marker for invoice keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceMarker;

/// Marker for invoice item keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceItemMarker;

/// Typed key for customers
pub type CustomerId = EntityId<CustomerMarker>;

/// Typed key for invoices
pub type InvoiceId = EntityId<InvoiceMarker>;

/// Typed key for invoice items
pub type InvoiceItemId = EntityId<InvoiceItemMarker>;

/// A customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Stable identity key
    pub uid: CustomerId,
    /// Customer name
    pub name: String,
    /// Persistence lifecycle state
    pub state: StateCode,
}

impl Customer {
    /// Create a new customer, marked `New`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uid: CustomerId::new(),
            name: name.into(),
            state: StateCode::New,
        }
    }

    /// Copy with a different name
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl Record for Customer {
    type Marker = CustomerMarker;

    fn uid(&self) -> CustomerId {
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
        "Customer"
    }
}

/// An invoice root record
///
/// `invoice_price` is derived: the sum of the live items' line prices,
/// maintained by [`InvoiceComposer`] through the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Stable identity key
    pub uid: InvoiceId,
    /// Customer this invoice bills
    pub customer_id: CustomerId,
    /// Invoice date
    pub date: NaiveDate,
    /// Derived total over live items
    pub invoice_price: f64,
    /// Persistence lifecycle state
    pub state: StateCode,
}

impl Invoice {
    /// Create a new empty invoice, marked `New`
    pub fn new(customer_id: CustomerId, date: NaiveDate) -> Self {
        Self {
            uid: InvoiceId::new(),
            customer_id,
            date,
            invoice_price: 0.0,
            state: StateCode::New,
        }
    }

    /// Copy with a different date
    pub fn with_date(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }
}

impl Record for Invoice {
    type Marker = InvoiceMarker;

    fn uid(&self) -> InvoiceId {
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
        "Invoice"
    }
}

/// An invoice line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Stable identity key
    pub uid: InvoiceItemId,
    /// Invoice this item belongs to
    pub invoice_id: InvoiceId,
    /// Line description
    pub description: String,
    /// Quantity ordered
    pub quantity: u32,
    /// Unit price
    pub unit_price: f64,
    /// Persistence lifecycle state
    pub state: StateCode,
}

impl InvoiceItem {
    /// Create a new line item, marked `New`
    pub fn new(
        invoice_id: InvoiceId,
        description: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> Self {
        Self {
            uid: InvoiceItemId::new(),
            invoice_id,
            description: description.into(),
            quantity,
            unit_price,
            state: StateCode::New,
        }
    }

    /// The line price: unit price times quantity
    pub fn line_price(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    /// Copy with a different quantity
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Copy with a different unit price
    pub fn with_unit_price(&self, unit_price: f64) -> Self {
        Self {
            unit_price,
            ..self.clone()
        }
    }
}

impl Record for InvoiceItem {
    type Marker = InvoiceItemMarker;

    fn uid(&self) -> InvoiceItemId {
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
        "InvoiceItem"
    }
}

/// Derives the invoice price from the live item collection
pub struct InvoiceComposer;

impl AggregateComposer<Invoice, InvoiceItem> for InvoiceComposer {
    fn recompose(&self, root: &Invoice, live_children: &[InvoiceItem]) -> Invoice {
        Invoice {
            invoice_price: live_children.iter().map(InvoiceItem::line_price).sum(),
            ..root.clone()
        }
    }
}

/// An invoice with its owned items
pub type InvoiceAggregate = Aggregate<Invoice, InvoiceItem, InvoiceComposer>;

/// Build the invoice aggregate from loaded records
pub fn invoice_aggregate(root: Invoice, items: Vec<InvoiceItem>) -> InvoiceAggregate {
    Aggregate::new(root, items, InvoiceComposer)
}

/// Filter name: invoices billed to one customer, payload is the customer GUID
pub const INVOICES_BY_CUSTOMER: &str = "ByCustomer";

/// Filter name: items belonging to one invoice, payload is the invoice GUID
pub const ITEMS_BY_INVOICE: &str = "ByInvoice";

/// Invoices billed to one customer
pub struct InvoicesByCustomer {
    customer_id: CustomerId,
}

impl InvoicesByCustomer {
    /// Create the specification for a customer key
    pub fn new(customer_id: CustomerId) -> Self {
        Self { customer_id }
    }

    /// Parse the specification from a GUID payload
    pub fn from_data(data: &str) -> Option<Self> {
        let uuid = Uuid::parse_str(data).ok()?;
        Some(Self::new(CustomerId::from_uuid(uuid)))
    }
}

impl Specification<Invoice> for InvoicesByCustomer {
    fn is_satisfied_by(&self, candidate: &Invoice) -> bool {
        candidate.customer_id == self.customer_id
    }
}

/// Items belonging to one invoice
pub struct ItemsByInvoice {
    invoice_id: InvoiceId,
}

impl ItemsByInvoice {
    /// Create the specification for an invoice key
    pub fn new(invoice_id: InvoiceId) -> Self {
        Self { invoice_id }
    }

    /// Parse the specification from a GUID payload
    pub fn from_data(data: &str) -> Option<Self> {
        let uuid = Uuid::parse_str(data).ok()?;
        Some(Self::new(InvoiceId::from_uuid(uuid)))
    }
}

impl Specification<InvoiceItem> for ItemsByInvoice {
    fn is_satisfied_by(&self, candidate: &InvoiceItem) -> bool {
        candidate.invoice_id == self.invoice_id
    }
}

/// Filter provider for invoices
pub struct InvoiceFilterProvider;

impl FilterProvider<Invoice> for InvoiceFilterProvider {
    fn specification(
        &self,
        definition: &FilterDefinition,
    ) -> Option<Box<dyn Specification<Invoice>>> {
        match definition.filter_name.as_str() {
            INVOICES_BY_CUSTOMER => InvoicesByCustomer::from_data(&definition.filter_data)
                .map(|s| Box::new(s) as Box<dyn Specification<Invoice>>),
            _ => None,
        }
    }
}

/// Filter provider for invoice items
pub struct InvoiceItemFilterProvider;

impl FilterProvider<InvoiceItem> for InvoiceItemFilterProvider {
    fn specification(
        &self,
        definition: &FilterDefinition,
    ) -> Option<Box<dyn Specification<InvoiceItem>>> {
        match definition.filter_name.as_str() {
            ITEMS_BY_INVOICE => ItemsByInvoice::from_data(&definition.filter_data)
                .map(|s| Box::new(s) as Box<dyn Specification<InvoiceItem>>),
            _ => None,
        }
    }
}

/// Sorter for invoices: Date (default, descending), InvoicePrice
pub struct InvoiceSorter;

impl RecordSorter<Invoice> for InvoiceSorter {
    fn comparer(&self, field: &str) -> Option<SortComparer<Invoice>> {
        match field {
            "Date" => Some(|a, b| a.date.cmp(&b.date)),
            "InvoicePrice" => Some(|a, b| {
                a.invoice_price
                    .partial_cmp(&b.invoice_price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            _ => None,
        }
    }

    fn default_sort(&self) -> SortDefinition {
        SortDefinition::descending("Date")
    }
}

/// Sorter for invoice items: Description (default, ascending), LinePrice
pub struct InvoiceItemSorter;

impl RecordSorter<InvoiceItem> for InvoiceItemSorter {
    fn comparer(&self, field: &str) -> Option<SortComparer<InvoiceItem>> {
        match field {
            "Description" => Some(|a, b| a.description.cmp(&b.description)),
            "LinePrice" => Some(|a, b| {
                a.line_price()
                    .partial_cmp(&b.line_price())
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            _ => None,
        }
    }

    fn default_sort(&self) -> SortDefinition {
        SortDefinition::ascending("Description")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Test line price arithmetic
    #[test]
    fn test_line_price() {
        let item = InvoiceItem::new(InvoiceId::new(), "Widget", 3, 2.5);
        assert_eq!(item.line_price(), 7.5);
    }

    /// Test the composer sums live item line prices
    #[test]
    fn test_composer_sums_lines() {
        let invoice = Invoice::new(CustomerId::new(), date(2025, 7, 1));
        let items = vec![
            InvoiceItem::new(invoice.uid(), "First", 1, 10.0),
            InvoiceItem::new(invoice.uid(), "Second", 2, 5.0),
        ];

        let recomposed = InvoiceComposer.recompose(&invoice, &items);
        assert_eq!(recomposed.invoice_price, 20.0);
    }

    /// Test customer filter resolution and evaluation
    #[test]
    fn test_invoices_by_customer() {
        let customer = CustomerId::new();
        let mine = Invoice::new(customer, date(2025, 7, 1));
        let theirs = Invoice::new(CustomerId::new(), date(2025, 7, 1));

        let provider = InvoiceFilterProvider;
        let definition = FilterDefinition::new(INVOICES_BY_CUSTOMER, customer.to_string());
        let spec = provider.specification(&definition).unwrap();

        assert!(spec.is_satisfied_by(&mine));
        assert!(!spec.is_satisfied_by(&theirs));
    }

    /// Test item filter resolution and evaluation
    #[test]
    fn test_items_by_invoice() {
        let invoice = InvoiceId::new();
        let mine = InvoiceItem::new(invoice, "Widget", 1, 10.0);
        let theirs = InvoiceItem::new(InvoiceId::new(), "Widget", 1, 10.0);

        let provider = InvoiceItemFilterProvider;
        let definition = FilterDefinition::new(ITEMS_BY_INVOICE, invoice.to_string());
        let spec = provider.specification(&definition).unwrap();

        assert!(spec.is_satisfied_by(&mine));
        assert!(!spec.is_satisfied_by(&theirs));
    }

    /// Test the invoice aggregate recomputes its price on load
    #[test]
    fn test_invoice_aggregate_load() {
        let invoice = Invoice::new(CustomerId::new(), date(2025, 7, 1));
        let items = vec![
            InvoiceItem::new(invoice.uid(), "First", 1, 10.0)
                .with_state(StateCode::Unchanged),
            InvoiceItem::new(invoice.uid(), "Second", 1, 20.0)
                .with_state(StateCode::Unchanged),
        ];

        let aggregate = invoice_aggregate(invoice.with_state(StateCode::Unchanged), items);

        // Root price was stale (0.0), so the load corrects and flags it
        assert_eq!(aggregate.root().invoice_price, 30.0);
        assert_eq!(aggregate.root().state(), StateCode::Modified);
    }
}
