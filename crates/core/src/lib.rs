//! GPM Core - cart, wishlist and catalog logic for the GPM store.
//!
//! This crate provides the state used by every GPM store front end:
//! - `storefront` - Session container with persistence to key-value storage
//! - `cli` - Command-line tool driving a storefront session
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no clock. Callers pass in the current time and decide
//! when to persist, which keeps every transition testable on its own.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money and emails
//! - [`catalog`] - Read-only products, variants and stock
//! - [`cart`] - Cart line items and their transitions
//! - [`wishlist`] - Saved products
//! - [`listing`] - Filter/sort pipeline for products and gallery images
//! - [`gallery`] - Photo gallery entries
//! - [`checkout`] - Order summary, shipping details and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod gallery;
pub mod listing;
pub mod types;
pub mod wishlist;

pub use cart::{
    Cart, CartLineItem, CartLineView, LineKey, MAX_REQUESTED_QUANTITY, NewLineItem,
    clamp_requested_quantity,
};
pub use catalog::{Catalog, Color, PLACEHOLDER_IMAGE, Product, SizeStock, Variant};
pub use checkout::{
    CheckoutError, CheckoutRequest, Order, OrderHistory, OrderLine, OrderProduct, OrderSummary,
    PaymentMethod, ShippingInfo, ShippingInfoError, ShippingMethod, place_order,
};
pub use gallery::{GalleryCategory, GalleryImage};
pub use listing::{
    Listing, ListingQuery, ParseSortOrderError, SortOrder, filter_listings, sort_listings,
};
pub use types::*;
pub use wishlist::{Wishlist, WishlistEntry};
