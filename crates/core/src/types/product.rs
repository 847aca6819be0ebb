//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{CartItem, ItemId, Price};

/// A product as listed in the static catalog file.
///
/// Only `id`, `name`, `price` and the first image are carried into a cart
/// line; the remaining fields are for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Clamp a requested quantity into `1..=stock`.
    ///
    /// Out-of-stock products still allow a quantity of one; the catalog is
    /// not authoritative about availability.
    #[must_use]
    pub fn clamp_quantity(&self, requested: u32) -> u32 {
        requested.clamp(1, self.stock.max(1))
    }

    /// Build a cart line for this product with a clamped quantity.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.images.first().cloned().unwrap_or_default(),
            quantity: self.clamp_quantity(quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mug() -> Product {
        Product {
            id: ItemId::Number(1),
            name: "Mug".to_string(),
            price: Price::from_whole(1000),
            images: vec!["mug-front.png".to_string(), "mug-back.png".to_string()],
            stock: 5,
            color: Some("Black".to_string()),
            category: Some("Kitchen".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_clamp_quantity_bounds() {
        let product = mug();
        assert_eq!(product.clamp_quantity(0), 1);
        assert_eq!(product.clamp_quantity(3), 3);
        assert_eq!(product.clamp_quantity(9), 5);
    }

    #[test]
    fn test_clamp_quantity_out_of_stock() {
        let product = Product { stock: 0, ..mug() };
        assert_eq!(product.clamp_quantity(4), 1);
    }

    #[test]
    fn test_to_cart_item_uses_first_image() {
        let item = mug().to_cart_item(2);
        assert_eq!(item.id, ItemId::Number(1));
        assert_eq!(item.image, "mug-front.png");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Price::from_whole(1000));
    }

    #[test]
    fn test_to_cart_item_without_images() {
        let product = Product {
            images: Vec::new(),
            ..mug()
        };
        assert_eq!(product.to_cart_item(1).image, "");
    }

    #[test]
    fn test_product_parses_catalog_record() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 4,
                "name": "Tote",
                "price": 4500,
                "images": ["/images/tote.jpg"],
                "stock": 12,
                "color": "Beige",
                "category": "Bags",
                "description": "Canvas tote"
            }"#,
        )
        .unwrap();
        assert_eq!(product.stock, 12);
        assert_eq!(product.category.as_deref(), Some("Bags"));
    }
}
