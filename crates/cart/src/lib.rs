//! Coffee Delivery cart library.
//!
//! The cart store is the single source of truth for the products a shopper
//! intends to buy. It is constructed explicitly by the application and
//! passed to its consumers; there is no global cart.
//!
//! # Modules
//!
//! - [`store`] - Write-through cart store with change subscriptions
//! - [`persistence`] - Snapshot encoding and key-value backends
//! - [`checkout`] - Order summary, delivery form, and confirmation
//! - [`postal`] - Postal code lookup for address pre-fill
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Cart error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod persistence;
pub mod postal;
pub mod store;

pub use checkout::{CheckoutError, CheckoutForm, OrderDraft, OrderSummary};
pub use config::{CartConfig, CheckoutConfig, ConfigError, PostalLookupConfig};
pub use error::CartError;
pub use persistence::{
    CartPersistence, DEFAULT_CART_KEY, FileStore, KeyValueStore, MemoryStore, PersistenceError,
    StorageError,
};
pub use postal::{LookupError, PostalAddress, PostalCodeLookup, ViaCepClient};
pub use store::{CartSnapshot, CartStore};
