//! Core types for Coffee Delivery.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod payment;
pub mod price;
pub mod product;
pub mod quantity;

pub use address::{DeliveryAddress, PostalCode, PostalCodeError};
pub use id::{ProductId, ProductIdError};
pub use payment::PaymentMethod;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{CartLineItem, Product};
pub use quantity::{Quantity, QuantityError};
