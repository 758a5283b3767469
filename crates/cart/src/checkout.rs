//! Checkout: order summary, delivery form, and order confirmation.
//!
//! Checkout only reads the cart. Confirming produces an [`OrderDraft`] for
//! whatever places the order; nothing here talks to an order backend or
//! takes payment.

use coffee_delivery_core::{CartLineItem, DeliveryAddress, PaymentMethod, PostalCode, Price};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::CheckoutConfig;
use crate::postal::{LookupError, PostalAddress, PostalCodeLookup};

/// Errors that block order confirmation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Choose a payment method")]
    MissingPaymentMethod,
    #[error("Delivery address is missing {0}")]
    IncompleteAddress(&'static str),
}

/// Totals shown next to the selected coffees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Distinct products.
    pub line_count: usize,
    /// Units across all lines.
    pub total_quantity: u64,
    /// Sum of line totals.
    pub items_total: Price,
    pub delivery_fee: Price,
    /// `items_total + delivery_fee`.
    pub total: Price,
}

impl OrderSummary {
    /// Compute totals for `items`.
    #[must_use]
    pub fn from_items(items: &[CartLineItem], config: &CheckoutConfig) -> Self {
        let items_total: Decimal = items.iter().map(CartLineItem::line_total).sum();
        let total_quantity = items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum();

        Self {
            line_count: items.len(),
            total_quantity,
            items_total: Price::new(items_total, config.currency),
            delivery_fee: Price::new(config.delivery_fee, config.currency),
            total: Price::new(items_total + config.delivery_fee, config.currency),
        }
    }

    /// Orders can only be confirmed with something in the cart.
    #[must_use]
    pub const fn can_confirm(&self) -> bool {
        self.line_count > 0
    }
}

/// Delivery and payment details collected at checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub address: DeliveryAddress,
    pub payment_method: Option<PaymentMethod>,
}

impl CheckoutForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the address with a lookup result.
    ///
    /// Number and complement are cleared because they belong to the
    /// previous address.
    pub fn apply_postal_address(&mut self, found: PostalAddress) {
        self.address = DeliveryAddress {
            postal_code: Some(found.postal_code),
            street: found.street,
            number: String::new(),
            complement: String::new(),
            neighborhood: found.neighborhood,
            city: found.city,
            state: found.state,
        };
    }

    /// Look up `code` and pre-fill the address with the result.
    ///
    /// On failure the form keeps its current address apart from the postal
    /// code, which is set to `code`.
    ///
    /// # Errors
    ///
    /// Returns the lookup's error, e.g. [`LookupError::NotFound`].
    #[instrument(skip_all, fields(cep = %code))]
    pub async fn fill_from_postal_code<L: PostalCodeLookup>(
        &mut self,
        lookup: &L,
        code: PostalCode,
    ) -> Result<(), LookupError> {
        match lookup.lookup(&code).await {
            Ok(found) => {
                tracing::info!("Address filled from postal code");
                self.apply_postal_address(found);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Postal code lookup failed, address left for manual entry");
                self.address.postal_code = Some(code);
                Err(e)
            }
        }
    }

    /// Validate the form against the cart and build the order.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] found, checking the cart, then the
    /// address, then the payment method.
    pub fn confirm(
        &self,
        items: &[CartLineItem],
        config: &CheckoutConfig,
    ) -> Result<OrderDraft, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if let Some(field) = self.address.first_missing_field() {
            return Err(CheckoutError::IncompleteAddress(field));
        }
        let payment_method = self
            .payment_method
            .ok_or(CheckoutError::MissingPaymentMethod)?;

        Ok(OrderDraft {
            items: items.to_vec(),
            address: self.address.clone(),
            payment_method,
            summary: OrderSummary::from_items(items, config),
        })
    }
}

/// A validated order, ready to hand off.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub items: Vec<CartLineItem>,
    pub address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub summary: OrderSummary,
}
