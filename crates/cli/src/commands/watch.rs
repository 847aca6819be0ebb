//! Follow cart changes made by other processes.
//!
//! Separate processes share only the storage directory, so this polls the
//! raw slot and re-hydrates whenever its content changes. Within one
//! process the storage area's notifications do this without polling.
//!
//! Hydration never empties the store, so a slot deleted out from under the
//! watcher keeps showing the last cart it read.

use std::time::Duration;

use tracing::{info, warn};

use storefront::{CartSession, HydrationOutcome, PersistenceError};

use super::Context;
use crate::output;

/// Print the cart, then re-print it after every external change until
/// Ctrl+C.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub async fn run(mut ctx: Context, interval_ms: u64) -> storefront::Result<()> {
    let key = ctx.config.cart_key.clone();
    let mut last_seen = ctx.session.bridge().storage().get_item(&key)?;
    output::cart(ctx.session.store(), ctx.config.currency);

    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(50)));
    info!(%key, interval_ms, "Watching cart for changes");

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopped watching");
                return Ok(());
            }
        }

        let current = ctx.session.bridge().storage().get_item(&key)?;
        if current == last_seen {
            continue;
        }

        follow(&mut ctx.session)?;

        // Re-read: hydration may have erased a malformed slot
        last_seen = ctx.session.bridge().storage().get_item(&key)?;
        output::cart(ctx.session.store(), ctx.config.currency);
    }
}

/// Re-hydrate after an external change.
fn follow(session: &mut CartSession) -> Result<HydrationOutcome, PersistenceError> {
    let outcome = session.mount()?;
    match &outcome {
        HydrationOutcome::Discarded { reason } => {
            warn!(%reason, "Another process wrote a malformed cart");
        }
        HydrationOutcome::Absent => {
            info!("Cart slot was removed, keeping last known cart");
        }
        HydrationOutcome::Restored { .. } => {}
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use storefront::persistence::{MemoryBackend, StorageArea};
    use storefront_core::{CartItem, Price};

    use super::*;

    #[test]
    fn test_follow_keeps_cart_when_slot_removed() {
        let area = StorageArea::new(MemoryBackend::new());
        let writer = CartSession::new(area.handle(), "cart");
        let mut watcher = CartSession::new(area.handle(), "cart");

        let pen = CartItem::new(2, "Pen", Price::from_whole(50), "p.png", 3);
        writer.bridge().persist(std::slice::from_ref(&pen)).unwrap();
        assert!(matches!(
            follow(&mut watcher).unwrap(),
            HydrationOutcome::Restored { items: 1 }
        ));

        writer.bridge().erase().unwrap();
        assert_eq!(follow(&mut watcher).unwrap(), HydrationOutcome::Absent);
        assert_eq!(watcher.store().items(), &[pen]);
    }
}
