//! Shipping address value type.

use serde::{Deserialize, Serialize};

/// Destination address frozen onto an order at creation time.
///
/// Collected at checkout and stored verbatim on the order; the checkout core
/// never validates postal formats - that is a storefront form concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    /// Second address line (apartment, suite), if any.
    pub address2: Option<String>,
    pub zip: String,
    pub city: String,
    pub country: String,
    pub phone: String,
}

impl ShippingAddress {
    /// Recipient's full name as rendered on the shipping label.
    #[must_use]
    pub fn recipient(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
