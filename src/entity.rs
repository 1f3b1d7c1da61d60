//! Record identity and the record contract

use crate::state_code::StateCode;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed record key using phantom types for type safety
///
/// Keys are globally unique and persistent. The phantom type parameter
/// ensures that keys for different record types cannot be mixed up at
/// compile time.
///
/// # Examples
///
/// ```rust
/// use cim_records::EntityId;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// struct Customer;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// struct Invoice;
///
/// let customer_id = EntityId::<Customer>::new();
/// let invoice_id = EntityId::<Invoice>::new();
///
/// // These are different types - won't compile if mixed up:
/// // let _: EntityId<Customer> = invoice_id; // ERROR!
///
/// // But you can explicitly cast if needed (use carefully):
/// let casted: EntityId<Invoice> = customer_id.cast();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random key
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create a key from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }

    /// Convert to a different key type (use with caution)
    pub fn cast<U>(self) -> EntityId<U> {
        EntityId {
            id: self.id,
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

impl<T> From<&EntityId<T>> for Uuid {
    fn from(id: &EntityId<T>) -> Self {
        id.id
    }
}

/// The contract every record in the pipeline satisfies
///
/// Records are immutable values: a "mutation" produces a new value with the
/// changed fields (structural `with_*` semantics). Each instance carries a
/// stable typed key and exactly one [`StateCode`], which is authoritative
/// for persistence.
///
/// # Examples
///
/// ```rust
/// use cim_records::{EntityId, Record, StateCode};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// struct CustomerMarker;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Customer {
///     uid: EntityId<CustomerMarker>,
///     name: String,
///     state: StateCode,
/// }
///
/// impl Record for Customer {
///     type Marker = CustomerMarker;
///
///     fn uid(&self) -> EntityId<CustomerMarker> {
///         self.uid
///     }
///
///     fn state(&self) -> StateCode {
///         self.state
///     }
///
///     fn with_state(&self, state: StateCode) -> Self {
///         Self { state, ..self.clone() }
///     }
///
///     fn record_name() -> &'static str {
///         "Customer"
///     }
/// }
///
/// let customer = Customer {
///     uid: EntityId::new(),
///     name: "Acme".to_string(),
///     state: StateCode::New,
/// };
/// let saved = customer.with_state(StateCode::Unchanged);
/// assert_eq!(saved.uid(), customer.uid());
/// assert_eq!(saved.state(), StateCode::Unchanged);
/// ```
pub trait Record: Debug + Clone + PartialEq + Send + Sync + 'static {
    /// Marker type for this record's typed key
    type Marker: Debug + Copy + Eq + Hash + Send + Sync + 'static;

    /// The record's stable identity key
    fn uid(&self) -> EntityId<Self::Marker>;

    /// The record's persistence lifecycle state
    fn state(&self) -> StateCode;

    /// Produce a copy of this record carrying a different state code
    fn with_state(&self, state: StateCode) -> Self;

    /// Record type name, used in messages and logs
    fn record_name() -> &'static str;
}
