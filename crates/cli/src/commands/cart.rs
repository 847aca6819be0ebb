//! Cart commands.
//!
//! Store mutations are in-memory; each command persists explicitly once
//! the mutation succeeded. Rejected mutations leave the slot untouched.

use tracing::{info, warn};

use storefront::{AppError, CartError, CartSession, PersistenceError};
use storefront_core::ItemId;

use super::Context;
use crate::output;

/// Print the cart as hydrated from storage.
pub fn show(ctx: &Context) {
    output::cart(ctx.session.store(), ctx.config.currency);
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns an error if the product does not exist, the catalog cannot be
/// loaded or storage fails.
pub async fn add(mut ctx: Context, product_id: &str, quantity: u32) -> storefront::Result<()> {
    let product = ctx
        .catalog
        .find(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let item = ctx.session.add_product(&product, quantity)?;
    if item.quantity != quantity {
        warn!(
            requested = quantity,
            added = item.quantity,
            stock = product.stock,
            "Quantity adjusted to stock"
        );
    }

    output::cart(ctx.session.store(), ctx.config.currency);
    Ok(())
}

/// Change an item's quantity.
///
/// A quantity below one, or an item that is not in the cart, leaves the
/// cart as it was. Neither is an error.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn update(mut ctx: Context, item_id: &str, quantity: i64) -> storefront::Result<()> {
    let id = parse_item_id(item_id);
    apply_update(&mut ctx.session, &id, quantity)?;

    output::cart(ctx.session.store(), ctx.config.currency);
    Ok(())
}

/// Update and persist. Returns whether the cart changed.
fn apply_update(
    session: &mut CartSession,
    id: &ItemId,
    quantity: i64,
) -> Result<bool, PersistenceError> {
    match session.update_quantity(id, quantity) {
        Ok(()) => {
            session.persist()?;
            info!(%id, quantity, "Updated quantity");
            Ok(true)
        }
        Err(CartError::InvalidQuantity { requested }) => {
            warn!(%id, requested, "Quantity must be at least 1, cart unchanged");
            Ok(false)
        }
        Err(CartError::ItemNotFound { .. }) => {
            info!(%id, "Item not in cart, nothing to update");
            Ok(false)
        }
    }
}

/// Remove an item.
///
/// Removing an item that is not in the cart is not an error.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn remove(mut ctx: Context, item_id: &str) -> storefront::Result<()> {
    let id = parse_item_id(item_id);
    match ctx.session.remove_item(&id) {
        Ok(item) => {
            ctx.session.persist()?;
            info!(%id, name = %item.name, "Removed from cart");
        }
        Err(CartError::ItemNotFound { .. }) => {
            info!(%id, "Item not in cart, nothing to remove");
        }
        Err(e) => return Err(e.into()),
    }

    output::cart(ctx.session.store(), ctx.config.currency);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn clear(mut ctx: Context) -> storefront::Result<()> {
    ctx.session.clear();
    ctx.session.persist()?;

    info!("Cart cleared");
    output::cart(ctx.session.store(), ctx.config.currency);
    Ok(())
}

/// Item ids on the command line are integers when they parse as one.
fn parse_item_id(raw: &str) -> ItemId {
    match raw.parse::<ItemId>() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}
