//! Integration tests for Coffee Delivery.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coffee-delivery-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Store operations, ordering, and uniqueness properties
//! - `cart_persistence` - Snapshots on disk across restarts
//! - `checkout_flow` - Cart to summary to confirmed order
//!
//! This library holds the fixtures shared by those test files.

#![cfg_attr(not(test), forbid(unsafe_code))]

use coffee_delivery_cart::{CartPersistence, CartStore, MemoryStore};
use coffee_delivery_core::{Product, ProductId, Quantity};
use rust_decimal::Decimal;

/// A catalog product priced in cents.
///
/// # Panics
///
/// Panics if `id` is blank or `cents` is negative.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: &str, cents: i64) -> Product {
    Product::new(
        ProductId::parse(id).expect("fixture id"),
        format!("Coffee {id}"),
        Decimal::new(cents, 2),
        format!("{id}.png"),
    )
    .expect("fixture price")
}

/// # Panics
///
/// Panics if `n` is zero.
#[must_use]
#[allow(clippy::expect_used)]
pub fn qty(n: u32) -> Quantity {
    Quantity::new(n).expect("fixture quantity")
}

/// # Panics
///
/// Panics if `s` is blank.
#[must_use]
#[allow(clippy::expect_used)]
pub fn id(s: &str) -> ProductId {
    ProductId::parse(s).expect("fixture id")
}

/// An empty cart over an unbounded in-memory backend.
#[must_use]
pub fn memory_cart() -> CartStore<MemoryStore> {
    CartStore::open(CartPersistence::with_default_key(MemoryStore::new()))
}

/// Product IDs in cart order.
#[must_use]
pub fn ids<S: coffee_delivery_cart::KeyValueStore>(cart: &CartStore<S>) -> Vec<String> {
    cart.items()
        .iter()
        .map(|item| item.id().to_string())
        .collect()
}
