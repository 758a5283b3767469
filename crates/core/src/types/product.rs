//! Catalog products and cart line items.
//!
//! A [`Product`] is owned by the catalog; the cart only ever copies it into a
//! [`CartLineItem`] and never changes the product's own fields. The snapshot
//! layout flattens the product fields next to `quantity`:
//!
//! ```json
//! {"id":"a1","name":"Expresso","description":"","tags":[],"price":"9.90","image":"expresso.png","quantity":2}
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, PriceError};
use super::quantity::Quantity;

/// A product as listed in the catalog.
///
/// Deserialization checks the price the same way [`Product::new`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    tags: Vec<String>,
    price: Decimal,
    image: String,
}

impl Product {
    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `price` is below zero.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Result<Self, PriceError> {
        Ok(Self {
            id,
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            price: Price::validate_amount(price)?,
            image: image.into(),
        })
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach catalog tags (e.g. "tradicional", "com leite").
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Unit price in the store currency.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Image reference (path or URL).
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }
}

/// Wire form of a [`Product`] before its price is checked.
#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    price: Decimal,
    image: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = PriceError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Self::new(record.id, record.name, record.price, record.image)?
            .with_description(record.description)
            .with_tags(record.tags))
    }
}

/// A product paired with the quantity the shopper wants.
///
/// Identity is the product ID: the cart never holds two line items for the
/// same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    product: Product,
    quantity: Quantity,
}

impl CartLineItem {
    #[must_use]
    pub const fn new(product: Product, quantity: Quantity) -> Self {
        Self { product, quantity }
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        self.product.id()
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Same product, different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            product: self.product.clone(),
            quantity,
        }
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price() * Decimal::from(self.quantity.get())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn expresso() -> Product {
        Product::new(
            ProductId::parse("a1").unwrap(),
            "Expresso Tradicional",
            Decimal::new(990, 2),
            "expresso.png",
        )
        .unwrap()
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Product::new(
            ProductId::parse("a1").unwrap(),
            "Broken",
            Decimal::new(-100, 2),
            "x.png",
        );
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_line_total() {
        let item = CartLineItem::new(expresso(), Quantity::new(3).unwrap());
        assert_eq!(item.line_total(), Decimal::new(2970, 2));
    }

    #[test]
    fn test_with_quantity_keeps_product() {
        let item = CartLineItem::new(expresso(), Quantity::ONE);
        let updated = item.with_quantity(Quantity::new(5).unwrap());
        assert_eq!(updated.product(), item.product());
        assert_eq!(updated.quantity().get(), 5);
    }

    #[test]
    fn test_snapshot_layout_is_flat() {
        let item = CartLineItem::new(
            expresso().with_tags(["tradicional"]),
            Quantity::new(2).unwrap(),
        );
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["id"], "a1");
        assert_eq!(value["name"], "Expresso Tradicional");
        assert_eq!(value["price"], "9.90");
        assert_eq!(value["image"], "expresso.png");
        assert_eq!(value["tags"][0], "tradicional");
        assert_eq!(value["quantity"], 2);
        assert!(value.get("product").is_none());
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"id":"b2","name":"Latte","price":"12.50","image":"latte.png","quantity":1}"#;
        let item: CartLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id().as_str(), "b2");
        assert!(item.product().tags().is_empty());
        assert_eq!(item.product().description(), "");
    }

    #[test]
    fn test_deserialize_rejects_negative_price() {
        let json = r#"{"id":"b2","name":"Latte","price":"-5.00","image":"latte.png","quantity":2}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let json = r#"{"id":"b2","name":"Latte","price":"12.50","image":"latte.png","quantity":0}"#;
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }
}
