//! GPM CLI - browse the catalog and manage a cart, wishlist and orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse apparel, cheapest first
//! gpm products --category APPAREL --sort price-low
//!
//! # Add two tees in size M of the first color
//! gpm cart add prd-001 --variant 0 --size M --quantity 2
//!
//! # Save a product, then move it to the cart
//! gpm wishlist toggle prd-003
//! gpm wishlist move-to-cart prd-003
//!
//! # Check out
//! gpm checkout --first-name Ayu --last-name Lestari --email ayu@example.id \
//!     --phone 081234567890 --address "Jl. Sudirman 1" --city Jakarta \
//!     --state "DKI Jakarta" --postal-code 10220 --shipping express
//! ```
//!
//! # Commands
//!
//! - `products` / `categories` / `gallery` - Browse listings
//! - `cart` - Add, remove, update and show cart lines
//! - `wishlist` - Save products and move them to the cart
//! - `checkout` - Show totals and place an order
//! - `orders` - List and show placed orders
//!
//! Cart, wishlist and orders persist between runs under `GPM_STORAGE_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gpm_storefront::{
    FileStorage, KeyValueStorage, LogFormat, MemoryStorage, StorageBackend, StoreConfig,
    StoreSession, load_catalog, load_gallery,
};

mod commands;

use commands::CommandError;
use commands::browse::{GalleryArgs, ProductsArgs};
use commands::cart::CartAction;
use commands::checkout::{CheckoutArgs, OrdersAction};
use commands::wishlist::WishlistAction;

#[derive(Parser)]
#[command(name = "gpm")]
#[command(author, version, about = "GPM running store")]
struct Cli {
    /// Directory for cart, wishlist and order snapshots (overrides `GPM_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Catalog file (overrides `GPM_CATALOG_PATH`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Gallery file (overrides `GPM_GALLERY_PATH`)
    #[arg(long, global = true)]
    gallery: Option<PathBuf>,

    /// Keep state in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products(ProductsArgs),
    /// List categories and their subcategories
    Categories,
    /// List gallery images
    Gallery(GalleryArgs),
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Show totals and place an order for the cart
    Checkout(CheckoutArgs),
    /// Show placed orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = StoreConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map_or(LogFormat::default(), |config| config.log_format),
    );

    let result = config
        .map_err(CommandError::from)
        .and_then(|config| run(cli, config));

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gpm=info,gpm_storefront=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
    }
}

fn run(cli: Cli, mut config: StoreConfig) -> Result<(), CommandError> {
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }
    if let Some(path) = cli.gallery {
        config.gallery_path = path;
    }
    if cli.ephemeral {
        config.storage = StorageBackend::Memory;
    }

    let catalog = load_catalog(&config.catalog_path)?;
    let gallery = load_gallery(&config.gallery_path)?;

    let storage: Box<dyn KeyValueStorage> = match config.storage {
        StorageBackend::File => Box::new(FileStorage::new(config.storage_dir.clone())),
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
    };
    let mut session = StoreSession::open(storage, catalog, gallery);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Products(args) => commands::browse::products(&session, &args, &mut out),
        Commands::Categories => commands::browse::categories(&session, &mut out),
        Commands::Gallery(args) => commands::browse::gallery(&session, &args, &mut out),
        Commands::Cart { action } => commands::cart::run(&mut session, action, &mut out),
        Commands::Wishlist { action } => commands::wishlist::run(&mut session, action, &mut out),
        Commands::Checkout(args) => commands::checkout::checkout(&mut session, args, &mut out),
        Commands::Orders { action } => commands::checkout::orders(&session, &action, &mut out),
    };

    session.close();
    result
}
