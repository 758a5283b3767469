//! CLI command implementations.
//!
//! The CLI is the composition root: it builds the one [`CartStore`] for the
//! process and hands it to each command by reference.

pub mod cart;
pub mod checkout;

use coffee_delivery_cart::{CartConfig, CartPersistence, CartStore, FileStore, StorageError};
use coffee_delivery_core::Price;
use rust_decimal::Decimal;

/// Open the file-backed cart described by `config`.
///
/// # Errors
///
/// Returns `StorageError` if the storage directory cannot be created.
pub fn open_cart(config: &CartConfig) -> Result<CartStore<FileStore>, StorageError> {
    let backend = FileStore::open(&config.storage_dir)?;
    Ok(CartStore::open(CartPersistence::new(
        backend,
        config.cart_key.clone(),
    )))
}

/// Format an amount in the checkout currency.
fn money(config: &CartConfig, amount: Decimal) -> String {
    Price::new(amount, config.checkout.currency).to_string()
}
