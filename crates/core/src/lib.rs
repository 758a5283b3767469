//! Coffee Delivery domain types.
//!
//! Everything the cart and checkout pass around is defined here and
//! validated on construction: a [`ProductId`] is never blank, a [`Quantity`]
//! is never zero, a [`Product`] never has a negative unit price, and a
//! [`PostalCode`] always has eight digits. [`Price`] itself is a plain
//! amount for totals and fees.
//!
//! The crate does no I/O. Storage, HTTP, and configuration live in
//! `coffee-delivery-cart`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
