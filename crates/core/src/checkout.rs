//! Checkout: order summary, shipping details and order placement.
//!
//! # Pricing
//!
//! | Line       | Rule                                         |
//! |------------|----------------------------------------------|
//! | subtotal   | cart total against the catalog               |
//! | shipping   | standard free, express 50 000, overnight 100 000 |
//! | tax        | 11% of subtotal (PPN), rounded half away from zero |
//! | total      | subtotal + shipping + tax                    |

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLineView};
use crate::catalog::Catalog;
use crate::types::{Email, EmailError, Money, OrderId, ProductId};

/// Value-added tax rate applied to the subtotal.
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(11, 2)
}

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::Overnight];

    #[must_use]
    pub const fn cost(self) -> Money {
        match self {
            Self::Standard => Money::ZERO,
            Self::Express => Money::new(50_000),
            Self::Overnight => Money::new(100_000),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
        }
    }
}

/// How the shopper pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    EWallet,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [Self; 3] = [Self::CreditCard, Self::EWallet, Self::BankTransfer];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::EWallet => "e-wallet",
            Self::BankTransfer => "bank-transfer",
        }
    }
}

macro_rules! impl_slug_enum {
    ($name:ident, $what:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| format!(concat!("invalid ", $what, ": {}"), s))
            }
        }
    };
}

impl_slug_enum!(ShippingMethod, "shipping method");
impl_slug_enum!(PaymentMethod, "payment method");

/// Subtotal, shipping, tax and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderSummary {
    #[must_use]
    pub fn compute(subtotal: Money, shipping: ShippingMethod) -> Self {
        let shipping_cost = shipping.cost();
        let tax = subtotal.apply_rate(tax_rate());
        Self {
            subtotal,
            shipping_cost,
            tax,
            total: subtotal + shipping_cost + tax,
        }
    }
}

/// Why shipping details were rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShippingInfoError {
    #[error("please fill in {0}")]
    MissingField(&'static str),
    #[error("please enter a valid email address: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("please enter a valid phone number (at least {min} characters)")]
    InvalidPhone { min: usize },
}

/// Delivery and contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: Self::DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl ShippingInfo {
    pub const DEFAULT_COUNTRY: &'static str = "Indonesia";
    pub const MIN_PHONE_LENGTH: usize = 10;

    /// Check required fields in form order, then email and phone.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<Email, ShippingInfoError> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("postal code", &self.postal_code),
        ];
        if let Some((label, _)) = required.into_iter().find(|(_, value)| value.is_empty()) {
            return Err(ShippingInfoError::MissingField(label));
        }

        let email = Email::parse(&self.email)?;

        if self.phone.chars().count() < Self::MIN_PHONE_LENGTH {
            return Err(ShippingInfoError::InvalidPhone {
                min: Self::MIN_PHONE_LENGTH,
            });
        }

        Ok(email)
    }
}

/// Why an order could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,
    #[error(transparent)]
    ShippingInfo(#[from] ShippingInfoError),
}

/// What the shopper submits at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
}

/// Product details frozen into an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub color_name: String,
    pub color_hex: String,
    pub tech: String,
    pub stock: u32,
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub variant_index: usize,
    pub size: String,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
    pub product: OrderProduct,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

impl From<&CartLineView<'_>> for OrderLine {
    fn from(view: &CartLineView<'_>) -> Self {
        Self {
            product_id: view.item.product_id.clone(),
            variant_index: view.item.variant_index,
            size: view.item.size.clone(),
            quantity: view.item.quantity,
            added_at: view.item.added_at,
            product: OrderProduct {
                id: view.product.id.clone(),
                name: view.product.name.clone(),
                price: view.product.price,
                image: view.image().to_string(),
                color_name: view.variant.color.name.clone(),
                color_hex: view.variant.color.hex.clone(),
                tech: view.product.tech.clone(),
                stock: view.stock,
            },
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderLine>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax: Money,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub const fn summary(&self) -> OrderSummary {
        OrderSummary {
            subtotal: self.subtotal,
            shipping_cost: self.shipping_cost,
            tax: self.tax,
            total: self.total,
        }
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// Build an order from the cart.
///
/// Shipping details are checked before the cart, matching the checkout form.
/// Lines whose product is missing from `catalog` are left out of both the
/// items and the subtotal. The cart itself is not modified; clearing it is
/// the caller's post-order step.
///
/// # Errors
///
/// Returns [`CheckoutError`] for invalid shipping details or an empty cart.
pub fn place_order(
    cart: &Cart,
    catalog: &Catalog,
    request: CheckoutRequest,
    id: OrderId,
    now: DateTime<Utc>,
) -> Result<Order, CheckoutError> {
    request.shipping_info.validate()?;

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let items: Vec<OrderLine> = cart
        .lines_with_products(catalog)
        .iter()
        .map(OrderLine::from)
        .collect();
    let summary = OrderSummary::compute(cart.total(catalog), request.shipping_method);

    Ok(Order {
        id,
        items,
        shipping_info: request.shipping_info,
        payment_method: request.payment_method,
        shipping_method: request.shipping_method,
        subtotal: summary.subtotal,
        shipping_cost: summary.shipping_cost,
        tax: summary.tax,
        total: summary.total,
        created_at: now,
    })
}

/// Orders placed from this device, oldest first.
///
/// Persisted as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// An unused order ID derived from `now` (`ORD-<millis>`).
    ///
    /// Bumps the millisecond component until it no longer collides.
    #[must_use]
    pub fn next_id(&self, now: DateTime<Utc>) -> OrderId {
        let mut millis = now.timestamp_millis();
        loop {
            let id = OrderId::from_millis(millis);
            if self.find(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
