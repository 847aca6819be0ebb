//! Human-readable command output on stdout.

#![allow(clippy::print_stdout)]

use storefront::CartStore;
use storefront_core::{CurrencyCode, Price, Product};

/// Print the cart lines, badge count and total.
pub fn cart(store: &CartStore, currency: CurrencyCode) {
    if store.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in store.items() {
        let line_total = Price::new(item.line_total()).unwrap_or(Price::ZERO);
        println!(
            "{:>8}  {:<24} {:>4} x {:>12} = {:>14}",
            item.id,
            item.name,
            item.quantity,
            item.price.display(currency),
            line_total.display(currency),
        );
    }

    let total = Price::new(store.total()).unwrap_or(Price::ZERO);
    println!("Items: {}", store.item_count());
    println!("Total: {}", total.display(currency));
}

/// Print the catalog.
pub fn products(products: &[Product], currency: CurrencyCode) {
    for product in products {
        println!(
            "{:>8}  {:<24} {:>12}  stock {:>4}  {}",
            product.id,
            product.name,
            product.price.display(currency),
            product.stock,
            product.category.as_deref().unwrap_or("-"),
        );
    }
}
