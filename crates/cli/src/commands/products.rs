//! Catalog listing.

use super::Context;
use crate::output;

/// Print every catalog product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(ctx: &Context) -> storefront::Result<()> {
    let products = ctx.catalog.products().await?;
    output::products(&products, ctx.config.currency);
    Ok(())
}
