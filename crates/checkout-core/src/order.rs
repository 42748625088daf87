//! # Order Types
//!
//! Order request payload sent to the payment processor, in its wire format.

use serde::{Deserialize, Serialize};

/// A monetary amount as a currency code plus a decimal string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// ISO-4217 currency code (e.g. "USD")
    pub currency_code: String,

    /// Decimal value, kept as a string the way the processor expects it
    pub value: String,
}

impl Money {
    pub fn new(currency_code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            currency_code: currency_code.into(),
            value: value.into(),
        }
    }
}

/// Payment intent of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutIntent {
    /// Capture funds immediately after approval
    Capture,
}

impl Default for CheckoutIntent {
    fn default() -> Self {
        CheckoutIntent::Capture
    }
}

/// Kind of fulfilment a shipping option represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingType {
    Shipping,
    Pickup,
}

impl Default for ShippingType {
    fn default() -> Self {
        ShippingType::Shipping
    }
}

/// A shipping option offered to the buyer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
    #[serde(rename = "type", default)]
    pub shipping_type: ShippingType,
    pub amount: Money,
}

/// Shipping details of a purchase unit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ShippingOption>,
}

impl ShippingDetails {
    /// The option currently marked as selected, if any
    pub fn selected_option(&self) -> Option<&ShippingOption> {
        self.options.iter().find(|o| o.selected)
    }
}

/// One purchase unit of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingDetails>,
}

/// Order creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub intent: CheckoutIntent,
    pub purchase_units: Vec<PurchaseUnit>,
}

/// Cart as sent by the browser.
///
/// Kept opaque: the order amount comes from the configured
/// [`OrderTemplate`](crate::OrderTemplate), not from the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(pub serde_json::Value);

impl Cart {
    /// Number of entries when the cart is a JSON array
    pub fn item_count(&self) -> Option<usize> {
        self.0.as_array().map(Vec::len)
    }
}
