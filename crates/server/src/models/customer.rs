//! Customer domain types.

use serde::{Deserialize, Serialize};

use order_desk_core::CustomerId;

/// A customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-generated customer ID.
    pub customer_id: CustomerId,
    /// Display name.
    pub name: String,
    /// Phone number, unique across customers.
    pub phone: String,
}

/// Mutable fields of a customer, used for create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerInput {
    /// Display name.
    pub name: String,
    /// Phone number, unique across customers.
    pub phone: String,
}

impl CustomerInput {
    /// Attach an ID to produce the stored representation.
    #[must_use]
    pub fn with_id(self, customer_id: CustomerId) -> Customer {
        Customer {
            customer_id,
            name: self.name,
            phone: self.phone,
        }
    }
}
