//! Storefront cart CLI.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! sf-cart products
//!
//! # Add two of product 1 to the cart
//! sf-cart add 1 -q 2
//!
//! # Change the quantity of item 1
//! sf-cart update 1 3
//!
//! # Show the cart and its total
//! sf-cart show
//!
//! # Follow changes made by other sf-cart processes
//! sf-cart watch
//! ```
//!
//! # Commands
//!
//! - `products` - List the product catalog
//! - `show` - Show the cart
//! - `add` - Add a catalog product to the cart
//! - `update` - Change an item's quantity
//! - `remove` - Remove an item
//! - `clear` - Empty the cart
//! - `watch` - Re-display the cart whenever another process changes it
//!
//! Configuration comes from `STOREFRONT_*` environment variables, see
//! [`storefront::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "sf-cart")]
#[command(author, version, about = "Storefront cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// Show the cart
    Show,
    /// Add a catalog product to the cart
    Add {
        /// Catalog product id
        product_id: String,

        /// Quantity, clamped to available stock
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change the quantity of a cart item
    Update {
        /// Cart item id
        item_id: String,

        /// New quantity (must be at least 1)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove an item from the cart
    Remove {
        /// Cart item id
        item_id: String,
    },
    /// Empty the cart
    Clear,
    /// Re-display the cart whenever another process changes it
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront=info,sf_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> storefront::Result<()> {
    let ctx = commands::Context::load()?;

    match cli.command {
        Commands::Products => commands::products::list(&ctx).await?,
        Commands::Show => commands::cart::show(&ctx),
        Commands::Add {
            product_id,
            quantity,
        } => commands::cart::add(ctx, &product_id, quantity).await?,
        Commands::Update { item_id, quantity } => {
            commands::cart::update(ctx, &item_id, quantity)?;
        }
        Commands::Remove { item_id } => commands::cart::remove(ctx, &item_id)?,
        Commands::Clear => commands::cart::clear(ctx)?,
        Commands::Watch { interval_ms } => commands::watch::run(ctx, interval_ms).await?,
    }
    Ok(())
}
