//! Checkout commands.
//!
//! # Usage
//!
//! ```bash
//! coffee-cli checkout summary
//! coffee-cli checkout lookup 01001-000
//! coffee-cli checkout confirm --cep 01001000 --number 42 --payment cash
//! coffee-cli checkout confirm --cep 99999999 --street "Rua A" --neighborhood Centro \
//!     --city Curitiba --state PR --payment credit
//! ```
//!
//! Confirming prints the order as JSON and empties the cart. Address flags
//! fill in for a failed postal code lookup and override what it returned.

use coffee_delivery_cart::{
    CartConfig, CartError, CartStore, CheckoutConfig, CheckoutError, CheckoutForm, KeyValueStore,
    LookupError, OrderDraft, OrderSummary, PostalCodeLookup, ViaCepClient,
};
use coffee_delivery_core::CartLineItem;
use coffee_delivery_core::{PaymentMethod, PostalCode, PostalCodeError};
use thiserror::Error;

use super::money;

/// Errors that can occur during checkout commands.
#[derive(Debug, Error)]
pub enum CheckoutCommandError {
    #[error("Invalid postal code: {0}")]
    InvalidPostalCode(#[from] PostalCodeError),

    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error("Postal code lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Cannot confirm order: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Order confirmed but the cart could not be emptied: {0}")]
    Cart(#[from] CartError),

    #[error("Failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Delivery details given on the command line.
#[derive(Debug, Clone)]
pub struct DeliveryArgs {
    pub cep: String,
    pub number: String,
    pub complement: String,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub payment: String,
}

impl DeliveryArgs {
    /// Copy the address fields given on the command line into `form`.
    fn apply_to(self, form: &mut CheckoutForm) {
        let address = &mut form.address;
        for (field, value) in [
            (&mut address.street, self.street),
            (&mut address.neighborhood, self.neighborhood),
            (&mut address.city, self.city),
            (&mut address.state, self.state),
        ] {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
        address.number = self.number;
        address.complement = self.complement;
    }
}

/// Print item total, delivery fee, and order total.
#[allow(clippy::print_stdout)]
pub fn summary<S: KeyValueStore>(cart: &CartStore<S>, config: &CartConfig) {
    let summary = OrderSummary::from_items(cart.items(), &config.checkout);

    println!(
        "Items ({}):  {}",
        summary.total_quantity,
        money(config, summary.items_total.amount)
    );
    println!("Delivery:   {}", money(config, summary.delivery_fee.amount));
    println!("Total:      {}", money(config, summary.total.amount));
    if !summary.can_confirm() {
        println!("Add a coffee to the cart to place an order");
    }
}

/// Resolve a postal code and print the address.
///
/// # Errors
///
/// Returns `CheckoutCommandError` if the code is malformed or the lookup fails.
#[allow(clippy::print_stdout)]
pub async fn lookup(config: &CartConfig, cep: &str) -> Result<(), CheckoutCommandError> {
    let code = PostalCode::parse(cep)?;
    let client = ViaCepClient::new(&config.postal_lookup)?;
    let address = client.lookup(&code).await?;

    println!("{}", address.postal_code.formatted());
    println!("{}", address.street);
    println!("{}", address.neighborhood);
    println!("{} - {}", address.city, address.state);
    Ok(())
}

/// Build the order from the cart and the delivery details.
///
/// A failed lookup is logged and the address comes from the flags alone;
/// [`CheckoutForm::confirm`] then names any field still missing.
///
/// # Errors
///
/// Returns `CheckoutCommandError` if the postal code or payment method is
/// invalid, or the order fails validation.
pub async fn build_order<L: PostalCodeLookup>(
    items: &[CartLineItem],
    config: &CheckoutConfig,
    details: DeliveryArgs,
    lookup: &L,
) -> Result<OrderDraft, CheckoutCommandError> {
    let code = PostalCode::parse(&details.cep)?;
    let payment: PaymentMethod = details
        .payment
        .parse()
        .map_err(CheckoutCommandError::InvalidPaymentMethod)?;

    let mut form = CheckoutForm::new();
    if let Err(e) = form.fill_from_postal_code(lookup, code).await {
        tracing::warn!(error = %e, "Using the address given on the command line");
    }
    details.apply_to(&mut form);
    form.payment_method = Some(payment);

    Ok(form.confirm(items, config)?)
}

/// Fill the delivery form, confirm the order, and empty the cart.
///
/// # Errors
///
/// Returns `CheckoutCommandError` if any detail is invalid, the order fails
/// validation, or the cart cannot be emptied.
#[allow(clippy::print_stdout)]
pub async fn confirm<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    config: &CartConfig,
    details: DeliveryArgs,
) -> Result<(), CheckoutCommandError> {
    let client = ViaCepClient::new(&config.postal_lookup)?;
    let order = build_order(cart.items(), &config.checkout, details, &client).await?;
    println!("{}", serde_json::to_string_pretty(&order)?);

    cart.clear()?;
    tracing::info!(
        lines = order.summary.line_count,
        total = %order.summary.total,
        "Order confirmed"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffee_delivery_cart::PostalAddress;
    use coffee_delivery_core::{Product, ProductId, Quantity};
    use rust_decimal::Decimal;

    use super::*;

    /// Resolves only 01001-000.
    struct SeOnly;

    impl PostalCodeLookup for SeOnly {
        async fn lookup(&self, code: &PostalCode) -> Result<PostalAddress, LookupError> {
            if code.as_str() != "01001000" {
                return Err(LookupError::NotFound(code.clone()));
            }
            Ok(PostalAddress {
                postal_code: code.clone(),
                street: "Praça da Sé".to_string(),
                neighborhood: "Sé".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
            })
        }
    }

    fn items() -> Vec<CartLineItem> {
        let product = Product::new(
            ProductId::parse("a1").unwrap(),
            "Expresso",
            Decimal::new(990, 2),
            "a1.png",
        )
        .unwrap();
        vec![CartLineItem::new(product, Quantity::new(2).unwrap())]
    }

    fn details(cep: &str) -> DeliveryArgs {
        DeliveryArgs {
            cep: cep.to_string(),
            number: "42".to_string(),
            complement: String::new(),
            street: None,
            neighborhood: None,
            city: None,
            state: None,
            payment: "credit".to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_order_from_lookup() {
        let order = build_order(&items(), &CheckoutConfig::default(), details("01001-000"), &SeOnly)
            .await
            .unwrap();

        assert_eq!(order.address.city, "São Paulo");
        assert_eq!(order.address.number, "42");
        assert_eq!(order.payment_method, PaymentMethod::CreditCard);
    }

    #[tokio::test]
    async fn test_failed_lookup_uses_manual_address() {
        let mut args = details("99999999");
        args.street = Some("Rua das Flores".to_string());
        args.neighborhood = Some("Centro".to_string());
        args.city = Some("Curitiba".to_string());
        args.state = Some("PR".to_string());

        let order = build_order(&items(), &CheckoutConfig::default(), args, &SeOnly)
            .await
            .unwrap();

        assert_eq!(order.address.postal_code.unwrap().as_str(), "99999999");
        assert_eq!(order.address.street, "Rua das Flores");
        assert_eq!(order.address.city, "Curitiba");
    }

    #[tokio::test]
    async fn test_failed_lookup_without_address_names_missing_field() {
        let err = build_order(&items(), &CheckoutConfig::default(), details("99999999"), &SeOnly)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutCommandError::Checkout(CheckoutError::IncompleteAddress("street"))
        ));
    }

    #[tokio::test]
    async fn test_manual_flags_override_lookup() {
        let mut args = details("01001000");
        args.street = Some("Rua Direita".to_string());
        args.city = Some("   ".to_string());

        let order = build_order(&items(), &CheckoutConfig::default(), args, &SeOnly)
            .await
            .unwrap();

        assert_eq!(order.address.street, "Rua Direita");
        assert_eq!(order.address.city, "São Paulo");
    }
}
