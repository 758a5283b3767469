//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! coffee-cli cart add a1 --name "Expresso Tradicional" --price 9.90 --quantity 2
//! coffee-cli cart update a1 5
//! coffee-cli cart remove a1
//! coffee-cli cart list
//! coffee-cli cart clear
//! ```

use coffee_delivery_cart::{CartConfig, CartError, CartStore, KeyValueStore};
use coffee_delivery_core::{
    PriceError, Product, ProductId, ProductIdError, Quantity, QuantityError,
};
use rust_decimal::Decimal;
use thiserror::Error;

use super::money;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Product id argument was blank.
    #[error("Invalid product id: {0}")]
    InvalidId(#[from] ProductIdError),

    /// Price argument is not a decimal.
    #[error("Invalid price {0}: {1}")]
    InvalidPrice(String, String),

    /// Price argument is negative.
    #[error("Invalid price: {0}")]
    NegativePrice(#[from] PriceError),

    /// Quantity argument is zero, negative, or too large.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// The store rejected the change; the message is meant for the shopper.
    #[error("{0}")]
    Rejected(String),

    /// The store could not save the change.
    #[error(transparent)]
    Cart(CartError),
}

impl From<CartError> for CartCommandError {
    fn from(err: CartError) -> Self {
        if err.is_duplicate() {
            Self::Rejected(err.notice())
        } else {
            Self::Cart(err)
        }
    }
}

/// Product fields as given on the command line.
#[derive(Debug, Clone)]
pub struct ProductArgs {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl ProductArgs {
    /// Validate the arguments into a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `CartCommandError` for a blank id or a bad price.
    pub fn into_product(self) -> Result<Product, CartCommandError> {
        let id = ProductId::parse(&self.id)?;
        let price: Decimal = self.price.trim().parse().map_err(|e: rust_decimal::Error| {
            CartCommandError::InvalidPrice(self.price.clone(), e.to_string())
        })?;

        Ok(Product::new(id, self.name, price, self.image)?
            .with_description(self.description)
            .with_tags(self.tags))
    }
}

/// Print every line item with its total.
#[allow(clippy::print_stdout)]
pub fn list<S: KeyValueStore>(cart: &CartStore<S>, config: &CartConfig) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in cart.items() {
        let product = item.product();
        println!(
            "{:<16} {:<28} {:>4} x {:>10} = {:>10}",
            product.id(),
            product.name(),
            item.quantity(),
            money(config, product.price()),
            money(config, item.line_total()),
        );
    }
    println!(
        "{} item(s), subtotal {}",
        cart.total_quantity(),
        money(config, cart.subtotal())
    );
}

/// Add a product.
///
/// # Errors
///
/// Returns `CartCommandError` if the arguments are invalid, the product is
/// already in the cart, or the cart cannot be saved.
pub fn add<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    product: ProductArgs,
    quantity: i64,
) -> Result<(), CartCommandError> {
    let quantity = Quantity::try_from(quantity)?;
    let product = product.into_product()?;
    cart.add_product(&product, quantity)?;
    tracing::info!(product_id = %product.id(), %quantity, "Product added");
    Ok(())
}

/// Remove a product; absent products are ignored.
///
/// # Errors
///
/// Returns `CartCommandError` if the id is blank or the cart cannot be saved.
pub fn remove<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    id: &str,
) -> Result<(), CartCommandError> {
    let id = ProductId::parse(id)?;
    cart.remove_product(&id)?;
    Ok(())
}

/// Change a product's quantity; absent products are ignored.
///
/// # Errors
///
/// Returns `CartCommandError` if the arguments are invalid or the cart
/// cannot be saved.
pub fn update<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    id: &str,
    quantity: i64,
) -> Result<(), CartCommandError> {
    let id = ProductId::parse(id)?;
    let quantity = Quantity::try_from(quantity)?;
    if !cart.contains(&id) {
        tracing::warn!(product_id = %id, "Product is not in the cart");
    }
    cart.update_quantity(&id, quantity)?;
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CartCommandError` if the cart cannot be saved.
pub fn clear<S: KeyValueStore>(cart: &mut CartStore<S>) -> Result<(), CartCommandError> {
    cart.clear()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffee_delivery_cart::{CartPersistence, MemoryStore};

    use super::*;

    fn args(id: &str, price: &str) -> ProductArgs {
        ProductArgs {
            id: id.to_string(),
            name: "Expresso".to_string(),
            price: price.to_string(),
            image: "expresso.png".to_string(),
            description: String::new(),
            tags: vec!["tradicional".to_string()],
        }
    }

    fn cart() -> CartStore<MemoryStore> {
        CartStore::open(CartPersistence::with_default_key(MemoryStore::new()))
    }

    #[test]
    fn test_into_product() {
        let product = args("a1", " 9.90 ").into_product().unwrap();
        assert_eq!(product.price(), Decimal::new(990, 2));
        assert_eq!(product.tags(), ["tradicional"]);
    }

    #[test]
    fn test_into_product_bad_price() {
        assert!(matches!(
            args("a1", "nine").into_product(),
            Err(CartCommandError::InvalidPrice(..))
        ));
        assert!(matches!(
            args("a1", "-1").into_product(),
            Err(CartCommandError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = cart();
        assert!(matches!(
            add(&mut cart, args("a1", "9.90"), 0),
            Err(CartCommandError::InvalidQuantity(QuantityError::Zero))
        ));
        assert!(matches!(
            add(&mut cart, args("a1", "9.90"), -2),
            Err(CartCommandError::InvalidQuantity(QuantityError::Negative(-2)))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_duplicate_add_is_shopper_notice() {
        let mut cart = cart();
        add(&mut cart, args("a1", "9.90"), 2).unwrap();

        let err = add(&mut cart, args("a1", "9.90"), 1).unwrap_err();

        assert!(matches!(err, CartCommandError::Rejected(ref msg) if msg.contains("already in your cart")));
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_update_and_remove() {
        let mut cart = cart();
        add(&mut cart, args("a1", "9.90"), 2).unwrap();

        update(&mut cart, "a1", 5).unwrap();
        assert_eq!(cart.total_quantity(), 5);

        remove(&mut cart, "a1").unwrap();
        assert!(cart.is_empty());

        remove(&mut cart, "a1").unwrap();
        update(&mut cart, "a1", 3).unwrap();
        assert!(cart.is_empty());
    }
}
