//! `gpm checkout` and `gpm orders`.

use std::io::Write;

use clap::{Args, Subcommand};

use gpm_core::{
    CheckoutRequest, Money, Order, OrderId, OrderSummary, PaymentMethod, ShippingInfo,
    ShippingMethod,
};
use gpm_storefront::{KeyValueStorage, StoreSession};

use super::{CommandError, not_found};

#[derive(Args, Debug, Default)]
pub struct CheckoutArgs {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    postal_code: String,
    #[arg(long, default_value = ShippingInfo::DEFAULT_COUNTRY)]
    country: String,

    /// credit-card, e-wallet or bank-transfer
    #[arg(long, default_value_t = PaymentMethod::CreditCard)]
    payment: PaymentMethod,

    /// standard, express or overnight
    #[arg(long, default_value_t = ShippingMethod::Standard)]
    shipping: ShippingMethod,

    /// Only show the order summary
    #[arg(long)]
    dry_run: bool,
}

impl CheckoutArgs {
    fn into_request(self) -> CheckoutRequest {
        CheckoutRequest {
            shipping_info: ShippingInfo {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
                address: self.address,
                city: self.city,
                state: self.state,
                postal_code: self.postal_code,
                country: self.country,
            },
            payment_method: self.payment,
            shipping_method: self.shipping,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum OrdersAction {
    /// List placed orders
    List,
    /// Show one order
    Show { id: String },
}

/// Print the order summary and, unless `--dry-run`, place the order.
///
/// # Errors
///
/// Returns `CommandError` for an empty cart, invalid shipping details, or a
/// failed write to `out`.
pub fn checkout<S: KeyValueStorage>(
    session: &mut StoreSession<S>,
    args: CheckoutArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    if args.dry_run {
        write_summary(out, &session.checkout_summary(args.shipping))?;
        return Ok(());
    }

    let order = session.place_order(args.into_request())?;
    write_summary(out, &order.summary())?;
    writeln!(
        out,
        "Order {} placed: {} item(s), pay by {}",
        order.id,
        order.item_count(),
        order.payment_method
    )?;
    Ok(())
}

/// List orders or show one.
///
/// # Errors
///
/// Returns `CommandError` for an unknown order ID or a failed write to `out`.
pub fn orders<S: KeyValueStorage>(
    session: &StoreSession<S>,
    action: &OrdersAction,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match action {
        OrdersAction::List => {
            if session.orders().is_empty() {
                writeln!(out, "No orders yet")?;
            }
            for order in session.orders().orders() {
                writeln!(
                    out,
                    "{}  {}  {} item(s)  {}",
                    order.id,
                    order.created_at.format("%Y-%m-%d %H:%M"),
                    order.item_count(),
                    order.total
                )?;
            }
        }
        OrdersAction::Show { id } => {
            let order = session
                .find_order(&OrderId::new(id.as_str()))
                .ok_or_else(|| not_found(format!("order {id}")))?;
            write_order(out, order)?;
        }
    }
    Ok(())
}

fn shipping_label(cost: Money) -> String {
    if cost == Money::ZERO {
        "FREE".to_string()
    } else {
        cost.to_string()
    }
}

fn write_summary(out: &mut dyn Write, summary: &OrderSummary) -> std::io::Result<()> {
    writeln!(out, "Subtotal:  {}", summary.subtotal)?;
    writeln!(out, "Shipping:  {}", shipping_label(summary.shipping_cost))?;
    writeln!(out, "Tax (11%): {}", summary.tax)?;
    writeln!(out, "Total:     {}", summary.total)
}

fn write_order(out: &mut dyn Write, order: &Order) -> std::io::Result<()> {
    let info = &order.shipping_info;
    writeln!(out, "Order {}", order.id)?;
    writeln!(out, "Placed:    {}", order.created_at.to_rfc3339())?;
    writeln!(out, "Ship to:   {} {}", info.first_name, info.last_name)?;
    writeln!(
        out,
        "           {}, {}, {} {}, {}",
        info.address, info.city, info.state, info.postal_code, info.country
    )?;
    writeln!(
        out,
        "Shipping:  {}  Payment: {}",
        order.shipping_method, order.payment_method
    )?;
    for line in &order.items {
        writeln!(
            out,
            "  {} / {} / {}  {} x {} = {}",
            line.product.name,
            line.product.color_name,
            line.size,
            line.quantity,
            line.product.price,
            line.line_total()
        )?;
    }
    write_summary(out, &order.summary())
}
