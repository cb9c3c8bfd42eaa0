//! `gpm cart` - cart lines.

use std::io::Write;

use clap::{Args, Subcommand};
use tracing::{info, warn};

use gpm_core::{LineKey, NewLineItem, ProductId, clamp_requested_quantity};
use gpm_storefront::{KeyValueStorage, StoreSession};

use super::{CommandError, bad_request, not_found};

/// Identifies one cart line.
#[derive(Args, Debug)]
pub struct LineArgs {
    /// Product ID, e.g. `prd-001`
    product: String,

    /// Color variant index (0 is the first color)
    #[arg(short, long, default_value_t = 0)]
    variant: usize,

    /// Size label, e.g. `M` or `ONE SIZE`
    #[arg(short, long)]
    size: String,
}

impl LineArgs {
    fn key(&self) -> LineKey {
        LineKey::new(self.product.as_str(), self.variant, self.size.as_str())
    }
}

#[derive(Subcommand, Debug)]
pub enum CartAction {
    /// Add units of one size to the cart
    Add {
        #[command(flatten)]
        line: LineArgs,

        /// Units to add (capped by stock)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        #[command(flatten)]
        line: LineArgs,
    },
    /// Set a line's quantity; zero or less removes it
    SetQty {
        #[command(flatten)]
        line: LineArgs,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show cart lines and the total
    Show,
}

/// Run a cart subcommand.
///
/// # Errors
///
/// Returns `CommandError` for unknown products or variants, sold-out sizes,
/// or a failed write to `out`.
pub fn run<S: KeyValueStorage>(
    session: &mut StoreSession<S>,
    action: CartAction,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match action {
        CartAction::Add { line, quantity } => add(session, &line, quantity),
        CartAction::Remove { line } => {
            let key = line.key();
            if !session.is_in_cart(&key) {
                return Err(not_found(format!("cart line {} / {}", line.product, line.size)));
            }
            session.remove_from_cart(&key);
            info!(product_id = %line.product, size = %line.size, "Removed from cart");
            Ok(())
        }
        CartAction::SetQty { line, quantity } => {
            let key = line.key();
            if !session.is_in_cart(&key) {
                return Err(not_found(format!("cart line {} / {}", line.product, line.size)));
            }
            session.update_quantity(&key, quantity);
            info!(product_id = %line.product, size = %line.size, quantity, "Updated quantity");
            Ok(())
        }
        CartAction::Clear => {
            session.clear_cart();
            info!("Cart cleared");
            Ok(())
        }
        CartAction::Show => show(session, out),
    }
}

fn add<S: KeyValueStorage>(
    session: &mut StoreSession<S>,
    line: &LineArgs,
    requested: u32,
) -> Result<(), CommandError> {
    let product = session
        .catalog()
        .product(&ProductId::new(line.product.as_str()))
        .ok_or_else(|| not_found(format!("product {}", line.product)))?;
    let variant = product.variant(line.variant).ok_or_else(|| {
        bad_request(format!(
            "{} has no color variant {}",
            product.name, line.variant
        ))
    })?;
    let stock = variant.stock_for(&line.size);
    let quantity = clamp_requested_quantity(requested, stock).ok_or_else(|| {
        bad_request(format!(
            "{} in {} / {} is sold out",
            product.name, variant.color.name, line.size
        ))
    })?;

    if quantity != requested {
        warn!(requested, quantity, stock, "Requested quantity adjusted to what is available");
    }

    session.add_to_cart(NewLineItem::new(line.key(), quantity));
    info!(product_id = %line.product, size = %line.size, quantity, "Added to cart");
    Ok(())
}

fn show<S: KeyValueStorage>(
    session: &StoreSession<S>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let lines = session.cart_lines();
    if lines.is_empty() && session.orphaned_lines().is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    for line in &lines {
        let stock_note = if line.can_increment() {
            String::new()
        } else {
            format!(" (max {})", line.stock)
        };
        writeln!(
            out,
            "{:<8} {} / {} / {}  {} x {} = {}{}",
            line.product.id.as_str(),
            line.product.name,
            line.variant.color.name,
            line.item.size,
            line.item.quantity,
            line.unit_price(),
            line.line_total(),
            stock_note,
        )?;
    }
    for orphan in session.orphaned_lines() {
        writeln!(
            out,
            "{:<8} (no longer available) / {}  x {}",
            orphan.product_id.as_str(),
            orphan.size,
            orphan.quantity
        )?;
    }
    writeln!(
        out,
        "Items: {}  Total: {}",
        session.cart_count(),
        session.cart_total()
    )?;
    Ok(())
}
