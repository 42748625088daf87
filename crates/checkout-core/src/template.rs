//! # Order Template
//!
//! The amount and shipping options used for every created order.
//! Can be loaded from TOML; the built-in default is the demo checkout
//! (USD 100, free or expedited shipping).
//!
//! ```toml
//! currency_code = "USD"
//! value = "100"
//!
//! [[shipping_options]]
//! id = "1"
//! label = "Free Shipping"
//! selected = true
//! value = "0"
//! ```

use crate::error::GatewayError;
use crate::order::{
    Cart, CheckoutIntent, Money, OrderRequest, PurchaseUnit, ShippingDetails, ShippingOption,
    ShippingType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A shipping option in the template (currency comes from the template)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateShippingOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(rename = "type", default)]
    pub shipping_type: ShippingType,
    pub value: String,
}

/// Fixed order payload configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTemplate {
    pub currency_code: String,
    pub value: String,
    #[serde(default)]
    pub shipping_options: Vec<TemplateShippingOption>,
}

impl OrderTemplate {
    /// Parse and validate a template from TOML text
    pub fn from_toml(content: &str) -> Result<Self, GatewayError> {
        let template: OrderTemplate = toml::from_str(content)
            .map_err(|e| GatewayError::Configuration(format!("Invalid order template: {}", e)))?;
        template.validate()?;
        Ok(template)
    }

    /// Check the template can produce a well-formed order
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.currency_code.trim().is_empty() || self.value.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "Order template needs a currency_code and value".to_string(),
            ));
        }

        if self.shipping_options.is_empty() {
            return Err(GatewayError::Configuration(
                "Order template needs at least one shipping option".to_string(),
            ));
        }

        let selected = self.shipping_options.iter().filter(|o| o.selected).count();
        if selected != 1 {
            return Err(GatewayError::Configuration(format!(
                "Order template must select exactly one shipping option, found {}",
                selected
            )));
        }

        let mut ids = HashSet::new();
        for option in &self.shipping_options {
            if option.value.trim().is_empty() {
                return Err(GatewayError::Configuration(format!(
                    "Shipping option {} has no value",
                    option.id
                )));
            }
            if !ids.insert(option.id.as_str()) {
                return Err(GatewayError::Configuration(format!(
                    "Duplicate shipping option id: {}",
                    option.id
                )));
            }
        }

        Ok(())
    }

    /// Build the order creation payload.
    ///
    /// The cart does not influence the amount.
    pub fn build_order(&self, _cart: &Cart) -> OrderRequest {
        let options = self
            .shipping_options
            .iter()
            .map(|o| ShippingOption {
                id: o.id.clone(),
                label: o.label.clone(),
                selected: o.selected,
                shipping_type: o.shipping_type,
                amount: Money::new(&self.currency_code, &o.value),
            })
            .collect();

        OrderRequest {
            intent: CheckoutIntent::Capture,
            purchase_units: vec![PurchaseUnit {
                amount: Money::new(&self.currency_code, &self.value),
                shipping: Some(ShippingDetails { options }),
            }],
        }
    }
}

impl Default for OrderTemplate {
    fn default() -> Self {
        Self {
            currency_code: "USD".to_string(),
            value: "100".to_string(),
            shipping_options: vec![
                TemplateShippingOption {
                    id: "1".to_string(),
                    label: "Free Shipping".to_string(),
                    selected: true,
                    shipping_type: ShippingType::Shipping,
                    value: "0".to_string(),
                },
                TemplateShippingOption {
                    id: "2".to_string(),
                    label: "Expedited Shipping".to_string(),
                    selected: false,
                    shipping_type: ShippingType::Shipping,
                    value: "5".to_string(),
                },
            ],
        }
    }
}
