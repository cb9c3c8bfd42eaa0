//! `gpm wishlist` - saved products.

use std::io::Write;

use clap::Subcommand;
use tracing::info;

use gpm_core::ProductId;
use gpm_storefront::{KeyValueStorage, StoreSession};

use super::{CommandError, bad_request, not_found};

#[derive(Subcommand, Debug)]
pub enum WishlistAction {
    /// Save a product
    Add { product: String },
    /// Remove a saved product
    Remove { product: String },
    /// Save the product if it is not saved, otherwise remove it
    Toggle { product: String },
    /// Remove every saved product
    Clear,
    /// List saved products
    Show,
    /// Add one unit of the first in-stock size to the cart
    MoveToCart { product: String },
}

/// Run a wishlist subcommand.
///
/// # Errors
///
/// Returns `CommandError` for products missing from the catalog, sold-out
/// products, or a failed write to `out`.
pub fn run<S: KeyValueStorage>(
    session: &mut StoreSession<S>,
    action: WishlistAction,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match action {
        WishlistAction::Add { product } => {
            let id = known_product(session, &product)?;
            session.add_to_wishlist(id);
            info!(product_id = %product, "Saved to wishlist");
        }
        WishlistAction::Remove { product } => {
            session.remove_from_wishlist(&ProductId::new(product.as_str()));
            info!(product_id = %product, "Removed from wishlist");
        }
        WishlistAction::Toggle { product } => {
            let id = known_product(session, &product)?;
            if session.toggle_wishlist(id) {
                info!(product_id = %product, "Saved to wishlist");
            } else {
                info!(product_id = %product, "Removed from wishlist");
            }
        }
        WishlistAction::Clear => {
            session.clear_wishlist();
            info!("Wishlist cleared");
        }
        WishlistAction::Show => show(session, out)?,
        WishlistAction::MoveToCart { product } => {
            let id = known_product(session, &product)?;
            if !session.quick_add_to_cart(&id) {
                return Err(bad_request(format!("{product} is sold out")));
            }
            info!(product_id = %product, "Added to cart from wishlist");
        }
    }
    Ok(())
}

fn known_product<S: KeyValueStorage>(
    session: &StoreSession<S>,
    product: &str,
) -> Result<ProductId, CommandError> {
    let id = ProductId::new(product);
    if session.catalog().product(&id).is_none() {
        return Err(not_found(format!("product {product}")));
    }
    Ok(id)
}

fn show<S: KeyValueStorage>(
    session: &StoreSession<S>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let products = session.wishlist_products();
    if products.is_empty() {
        writeln!(out, "Your wishlist is empty")?;
        return Ok(());
    }

    for product in products {
        let availability = if product.is_available() {
            ""
        } else {
            "  (sold out)"
        };
        writeln!(
            out,
            "{:<8} {}  {}{}",
            product.id.as_str(),
            product.name,
            product.price,
            availability
        )?;
    }
    writeln!(out, "Saved: {}", session.wishlist_count())?;
    Ok(())
}
