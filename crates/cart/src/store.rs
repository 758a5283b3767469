//! The cart store: single owner and mutator of the shopper's line items.
//!
//! # Write-through
//!
//! Every mutation builds the next state, writes it to persistence, and only
//! then commits it in memory and publishes it to subscribers. A failed write
//! leaves both the in-memory cart and the stored snapshot as they were.
//!
//! # Example
//!
//! ```
//! use coffee_delivery_cart::{CartPersistence, CartStore, MemoryStore};
//! use coffee_delivery_core::{Product, ProductId, Quantity};
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::open(CartPersistence::with_default_key(MemoryStore::new()));
//! let expresso = Product::new(
//!     ProductId::parse("a1").unwrap(),
//!     "Expresso",
//!     Decimal::new(990, 2),
//!     "expresso.png",
//! )
//! .unwrap();
//!
//! cart.add_product(&expresso, Quantity::new(2).unwrap()).unwrap();
//! assert!(cart.add_product(&expresso, Quantity::ONE).unwrap_err().is_duplicate());
//! assert_eq!(cart.total_quantity(), 2);
//! ```

use std::sync::Arc;

use coffee_delivery_core::{CartLineItem, Product, ProductId, Quantity};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::instrument;

use crate::error::{CartError, Result};
use crate::persistence::{CartPersistence, KeyValueStore};

/// Immutable view of the cart as of one committed mutation.
pub type CartSnapshot = Arc<[CartLineItem]>;

/// Ordered, write-through cart of unique line items.
pub struct CartStore<S> {
    persistence: CartPersistence<S>,
    items: CartSnapshot,
    updates: watch::Sender<CartSnapshot>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Hydrate a store from its persisted snapshot.
    ///
    /// Falls back to an empty cart if nothing usable is stored.
    pub fn open(persistence: CartPersistence<S>) -> Self {
        let items: CartSnapshot = persistence.load().into();
        tracing::info!(key = persistence.key(), lines = items.len(), "Cart opened");

        let (updates, _) = watch::channel(Arc::clone(&items));
        Self {
            persistence,
            items,
            updates,
        }
    }

    /// Current line items, in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Shared handle to the current line items.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        Arc::clone(&self.items)
    }

    /// Receiver that always holds the latest committed cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Append `product` with `quantity` to the end of the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateProduct`] if the product is already in the
    ///   cart; nothing changes and [`CartError::notice`] holds the message
    ///   for the shopper.
    /// - [`CartError::Persistence`] if the snapshot cannot be written.
    #[instrument(skip_all, fields(product_id = %product.id(), quantity = %quantity))]
    pub fn add_product(&mut self, product: &Product, quantity: Quantity) -> Result<()> {
        if self.contains(product.id()) {
            tracing::warn!("Rejected add of product already in cart");
            return Err(CartError::DuplicateProduct {
                id: product.id().clone(),
                name: product.name().to_owned(),
            });
        }

        let mut next = self.items.to_vec();
        next.push(CartLineItem::new(product.clone(), quantity));
        self.commit(next)?;

        tracing::info!("Added product to cart");
        Ok(())
    }

    /// Remove the line item for `id`. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the snapshot cannot be written.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn remove_product(&mut self, id: &ProductId) -> Result<()> {
        if !self.contains(id) {
            tracing::debug!("Product not in cart, nothing to remove");
            return Ok(());
        }

        let next = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        self.commit(next)?;

        tracing::info!("Removed product from cart");
        Ok(())
    }

    /// Set the quantity of the line item for `id`, keeping its position.
    /// Updating an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the snapshot cannot be written.
    #[instrument(skip_all, fields(product_id = %id, quantity = %quantity))]
    pub fn update_quantity(&mut self, id: &ProductId, quantity: Quantity) -> Result<()> {
        match self.get(id) {
            None => {
                tracing::debug!("Product not in cart, nothing to update");
                return Ok(());
            }
            Some(item) if item.quantity() == quantity => return Ok(()),
            Some(_) => {}
        }

        let next = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    item.with_quantity(quantity)
                } else {
                    item.clone()
                }
            })
            .collect();
        self.commit(next)?;

        tracing::info!("Updated product quantity");
        Ok(())
    }

    /// Empty the cart, e.g. once an order has been placed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the snapshot cannot be written.
    #[instrument(skip_all, fields(lines = self.items.len()))]
    pub fn clear(&mut self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        self.commit(Vec::new())?;
        tracing::info!("Cleared cart");
        Ok(())
    }

    #[must_use]
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    /// Direct access to persistence, e.g. to adjust a backend's limits.
    pub const fn persistence_mut(&mut self) -> &mut CartPersistence<S> {
        &mut self.persistence
    }

    /// Tear the store down, keeping its persistence for a later session.
    pub fn into_persistence(self) -> CartPersistence<S> {
        self.persistence
    }

    fn commit(&mut self, next: Vec<CartLineItem>) -> Result<()> {
        if let Err(e) = self.persistence.save(&next) {
            tracing::error!(error = %e, "Cart write-through failed, keeping previous state");
            return Err(e.into());
        }

        self.items = next.into();
        self.updates.send_replace(Arc::clone(&self.items));
        Ok(())
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("subscribers", &self.updates.receiver_count())
            .finish_non_exhaustive()
    }
}
