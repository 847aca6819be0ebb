//! Generated carts checked against the store and codec laws.

use proptest::prelude::*;
use rust_decimal::Decimal;
use storefront::persistence::{decode_items, encode_items};
use storefront::{CartError, CartStore};
use storefront_core::{CartItem, ItemId, Price};

// Small id space so generated carts contain duplicate ids
fn item_id() -> impl Strategy<Value = ItemId> {
    prop_oneof![
        (0i64..8).prop_map(ItemId::Number),
        "[a-c]{1,2}".prop_map(ItemId::Text),
    ]
}

fn shop_price() -> impl Strategy<Value = Price> {
    (0i64..10_000_000, 0u32..=2).prop_filter_map("representable price", |(mantissa, scale)| {
        Price::new(Decimal::new(mantissa, scale)).ok()
    })
}

// Up to 15 significant digits at any scale, the most a JSON number keeps
fn wide_price() -> impl Strategy<Value = Price> {
    (0i64..1_000_000_000_000_000, 0u32..=12).prop_filter_map(
        "representable price",
        |(mantissa, scale)| Price::new(Decimal::new(mantissa, scale)).ok(),
    )
}

fn cart_item(price: impl Strategy<Value = Price>) -> impl Strategy<Value = CartItem> {
    (item_id(), "\\PC{0,12}", price, "[a-z/.]{0,10}", 1u32..1000).prop_map(
        |(id, name, price, image, quantity)| CartItem::new(id, name, price, image, quantity),
    )
}

proptest! {
    #[test]
    fn prop_total_is_sum_of_line_totals(
        items in prop::collection::vec(cart_item(shop_price()), 0..20)
    ) {
        let mut cart = CartStore::new();
        for item in &items {
            cart.add_item(item.clone());
        }

        let expected: Decimal = items
            .iter()
            .map(|item| item.price.amount() * Decimal::from(item.quantity))
            .sum();
        prop_assert_eq!(cart.total(), expected);
        prop_assert_eq!(cart.items(), items.as_slice());
    }

    #[test]
    fn prop_quantity_below_one_changes_nothing(
        items in prop::collection::vec(cart_item(shop_price()), 0..10),
        id in item_id(),
        quantity in i64::MIN..1,
    ) {
        let mut cart = CartStore::from(items.clone());

        let err = cart.update_quantity(&id, quantity).unwrap_err();
        prop_assert_eq!(err, CartError::InvalidQuantity { requested: quantity });
        prop_assert_eq!(cart.items(), items.as_slice());
    }

    #[test]
    fn prop_encoded_items_restore_equal_cart(
        items in prop::collection::vec(cart_item(wide_price()), 0..10)
    ) {
        let raw = encode_items(&items).unwrap();

        let mut cart = CartStore::new();
        cart.set_cart(decode_items(&raw).unwrap());
        prop_assert_eq!(cart.items(), items.as_slice());
    }
}
