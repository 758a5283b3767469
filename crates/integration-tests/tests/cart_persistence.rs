//! Integration tests for cart snapshots on disk.
//!
//! Each test gets its own temporary directory so the file-backed store
//! behaves like a fresh install.

#![allow(clippy::unwrap_used)]

use std::fs;

use coffee_delivery_cart::{CartPersistence, CartStore, DEFAULT_CART_KEY, FileStore};
use coffee_delivery_integration_tests::{id, ids, product, qty};
use tempfile::TempDir;

fn open(dir: &TempDir) -> CartStore<FileStore> {
    let backend = FileStore::open(dir.path()).unwrap();
    CartStore::open(CartPersistence::with_default_key(backend))
}

fn snapshot_path(dir: &TempDir) -> std::path::PathBuf {
    FileStore::open(dir.path())
        .unwrap()
        .path_for(DEFAULT_CART_KEY)
        .unwrap()
}

// =============================================================================
// Restart Tests
// =============================================================================

#[test]
fn test_fresh_directory_starts_empty() {
    let dir = TempDir::new().unwrap();
    let cart = open(&dir);

    assert!(cart.is_empty());
    assert!(!snapshot_path(&dir).exists());
}

#[test]
fn test_cart_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut cart = open(&dir);
        cart.add_product(&product("a1", 990), qty(2)).unwrap();
        cart.add_product(&product("b2", 350), qty(1)).unwrap();
        cart.update_quantity(&id("b2"), qty(4)).unwrap();
    }

    let cart = open(&dir);

    assert_eq!(ids(&cart), ["a1", "b2"]);
    assert_eq!(cart.get(&id("b2")).unwrap().quantity(), qty(4));
    assert_eq!(cart.total_quantity(), 6);
}

#[test]
fn test_clear_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut cart = open(&dir);
        cart.add_product(&product("a1", 990), qty(2)).unwrap();
        cart.clear().unwrap();
    }

    assert!(open(&dir).is_empty());
}

#[test]
fn test_duplicate_rejected_after_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut cart = open(&dir);
        cart.add_product(&product("a1", 990), qty(2)).unwrap();
    }

    let mut cart = open(&dir);
    let err = cart.add_product(&product("a1", 990), qty(1)).unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(cart.total_quantity(), 2);
}

// =============================================================================
// Snapshot Format Tests
// =============================================================================

#[test]
fn test_snapshot_is_flat_json_array() {
    let dir = TempDir::new().unwrap();
    let mut cart = open(&dir);
    cart.add_product(
        &product("a1", 990).with_tags(["tradicional"]),
        qty(2),
    )
    .unwrap();

    let raw = fs::read_to_string(snapshot_path(&dir)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let line = &json.as_array().unwrap()[0];
    assert_eq!(line["id"], "a1");
    assert_eq!(line["name"], "Coffee a1");
    assert_eq!(line["price"], "9.90");
    assert_eq!(line["quantity"], 2);
    assert_eq!(line["tags"][0], "tradicional");
}

#[test]
fn test_snapshot_written_elsewhere_is_loaded() {
    let dir = TempDir::new().unwrap();
    let raw = r#"[
        {"id":"a1","name":"Expresso Tradicional","price":"9.90","image":"a1.png","quantity":3},
        {"id":"b2","name":"Latte","description":"Espresso with milk","tags":["com leite"],"price":"9.90","image":"b2.png","quantity":1}
    ]"#;
    fs::write(snapshot_path(&dir), raw).unwrap();

    let cart = open(&dir);

    assert_eq!(ids(&cart), ["a1", "b2"]);
    assert_eq!(cart.get(&id("a1")).unwrap().product().name(), "Expresso Tradicional");
    assert_eq!(cart.get(&id("b2")).unwrap().product().tags(), ["com leite"]);
}

// =============================================================================
// Cold Start Tests
// =============================================================================

#[test]
fn test_corrupted_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(snapshot_path(&dir), "{not json").unwrap();

    let mut cart = open(&dir);
    assert!(cart.is_empty());

    cart.add_product(&product("a1", 990), qty(1)).unwrap();
    assert_eq!(ids(&open(&dir)), ["a1"]);
}

#[test]
fn test_invalid_quantity_in_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();
    let raw = r#"[{"id":"a1","name":"Expresso","price":"9.90","image":"a1.png","quantity":0}]"#;
    fs::write(snapshot_path(&dir), raw).unwrap();

    assert!(open(&dir).is_empty());
}

#[test]
fn test_negative_price_in_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();
    let raw = r#"[{"id":"a1","name":"Expresso","price":"-5.00","image":"a1.png","quantity":2}]"#;
    fs::write(snapshot_path(&dir), raw).unwrap();

    let cart = open(&dir);

    assert!(cart.is_empty());
    assert_eq!(cart.subtotal(), rust_decimal::Decimal::ZERO);
}

#[test]
fn test_repeated_ids_in_snapshot_keep_first() {
    let dir = TempDir::new().unwrap();
    let raw = r#"[
        {"id":"a1","name":"Expresso","price":"9.90","image":"a1.png","quantity":2},
        {"id":"a1","name":"Expresso","price":"9.90","image":"a1.png","quantity":7}
    ]"#;
    fs::write(snapshot_path(&dir), raw).unwrap();

    let cart = open(&dir);

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(&id("a1")).unwrap().quantity(), qty(2));
}
