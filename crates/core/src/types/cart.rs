//! Cart line type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ItemId, Price};

/// One line in a shopping cart.
///
/// This is exactly the shape stored in the durable `cart` slot: a JSON
/// object with `id`, `name`, `price`, `image` and `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog id of the purchased item.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Display image URI.
    pub image: String,
    /// Number of units on this line.
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line.
    #[must_use]
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        price: Price,
        image: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
            quantity,
        }
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_wire_shape() {
        let item = CartItem::new(1, "Mug", Price::from_whole(1000), "x.png", 2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Mug",
                "price": 1000,
                "image": "x.png",
                "quantity": 2
            })
        );
    }

    #[test]
    fn test_cart_item_parses_string_id() {
        let item: CartItem = serde_json::from_str(
            r#"{"id":"pen-1","name":"Pen","price":50,"image":"p.png","quantity":3}"#,
        )
        .unwrap();
        assert_eq!(item.id, ItemId::Text("pen-1".to_string()));
        assert_eq!(item.line_total(), Decimal::from(150));
    }

    #[test]
    fn test_cart_item_rejects_missing_fields() {
        let result = serde_json::from_str::<CartItem>(r#"{"id":1,"name":"Mug"}"#);
        assert!(result.is_err());
    }
}
