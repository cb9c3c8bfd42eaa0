//! Store session: the cart, wishlist and order history for one shopper.
//!
//! A [`StoreSession`] is created when a front end starts and torn down with
//! [`StoreSession::close`]. Every mutating operation applies a pure
//! transition from `gpm-core` and then commits a snapshot of the changed
//! store. Storage failures are logged and never surface to the caller; the
//! in-memory state stays authoritative for the rest of the session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use gpm_core::{
    Cart, CartLineItem, CartLineView, Catalog, CheckoutError, CheckoutRequest, GalleryImage,
    LineKey, ListingQuery, Money, NewLineItem, Order, OrderHistory, OrderId, OrderSummary,
    Product, ProductId, ShippingMethod, Wishlist,
};

use crate::snapshot;
use crate::storage::KeyValueStorage;

/// Source of the current time.
pub type Clock = fn() -> DateTime<Utc>;

/// Cart, wishlist and order history bound to a storage backend.
pub struct StoreSession<S: KeyValueStorage> {
    storage: S,
    catalog: Arc<Catalog>,
    gallery: Arc<[GalleryImage]>,
    cart: Cart,
    wishlist: Wishlist,
    orders: OrderHistory,
    clock: Clock,
    persisted: bool,
}

impl<S: KeyValueStorage> StoreSession<S> {
    /// Open a session, rehydrating every store from `storage`.
    ///
    /// Missing or unreadable snapshots start empty.
    pub fn open(
        storage: S,
        catalog: impl Into<Arc<Catalog>>,
        gallery: impl Into<Arc<[GalleryImage]>>,
    ) -> Self {
        let cart: Cart = snapshot::rehydrate(&storage);
        let wishlist: Wishlist = snapshot::rehydrate(&storage);
        let orders: OrderHistory = snapshot::rehydrate(&storage);

        let session = Self {
            storage,
            catalog: catalog.into(),
            gallery: gallery.into(),
            cart,
            wishlist,
            orders,
            clock: Utc::now,
            persisted: true,
        };

        debug!(
            cart_lines = session.cart.len(),
            wishlist = session.wishlist.count(),
            orders = session.orders.len(),
            "Opened store session"
        );
        session.report_orphans();
        session
    }

    /// Replace the clock used to stamp new lines and orders.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Tear down the session, handing back the storage backend.
    pub fn close(self) -> S {
        debug!("Closed store session");
        self.storage
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn gallery(&self) -> &[GalleryImage] {
        &self.gallery
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderHistory {
        &self.orders
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Whether the most recent commit reached storage.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.persisted
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a line to the cart, merging with an existing line for the same key.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, size = %item.size, quantity = item.quantity))]
    pub fn add_to_cart(&mut self, item: NewLineItem) {
        self.update_cart(|cart, now| cart.add(item, now));
    }

    #[instrument(skip(self), fields(product_id = %key.product_id))]
    pub fn remove_from_cart(&mut self, key: &LineKey) {
        self.update_cart(|cart, _| cart.remove(key));
    }

    /// Set a line's quantity. Zero or negative removes the line.
    #[instrument(skip(self), fields(product_id = %key.product_id))]
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) {
        self.update_cart(|cart, _| cart.update_quantity(key, quantity));
    }

    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.update_cart(|cart, _| cart.clear());
    }

    #[must_use]
    pub fn is_in_cart(&self, key: &LineKey) -> bool {
        self.cart.contains(key)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    /// Sum of price times quantity. Lines for unknown products count as zero.
    #[must_use]
    pub fn cart_total(&self) -> Money {
        self.cart.total(&self.catalog)
    }

    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLineView<'_>> {
        self.cart.lines_with_products(&self.catalog)
    }

    /// Cart lines whose product or variant is not in the catalog.
    #[must_use]
    pub fn orphaned_lines(&self) -> Vec<&CartLineItem> {
        self.cart.orphaned_lines(&self.catalog)
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn add_to_wishlist(&mut self, product_id: ProductId) {
        self.update_wishlist(|wishlist, now| wishlist.add(product_id, now));
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) {
        self.update_wishlist(|wishlist, _| wishlist.remove(product_id));
    }

    /// Add the product if absent, remove it if present. Returns the new membership.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn toggle_wishlist(&mut self, product_id: ProductId) -> bool {
        let mut saved = false;
        self.update_wishlist(|wishlist, now| {
            saved = wishlist.toggle(product_id, now);
            true
        });
        saved
    }

    #[instrument(skip(self))]
    pub fn clear_wishlist(&mut self) {
        self.update_wishlist(|wishlist, _| wishlist.clear());
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.wishlist.contains(product_id)
    }

    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.wishlist.count()
    }

    /// Saved products that exist in the catalog, in the order they were saved.
    #[must_use]
    pub fn wishlist_products(&self) -> Vec<&Product> {
        self.wishlist.products(&self.catalog)
    }

    /// Put one unit of the product's first in-stock size into the cart.
    ///
    /// Returns `false` when the product is unknown or sold out.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn quick_add_to_cart(&mut self, product_id: &ProductId) -> bool {
        let Some((variant_index, size)) = self
            .catalog
            .product(product_id)
            .and_then(Product::first_available)
            .map(|(index, size)| (index, size.to_string()))
        else {
            debug!("Nothing in stock to quick-add");
            return false;
        };

        let key = LineKey::new(product_id.clone(), variant_index, size);
        self.add_to_cart(NewLineItem::new(key, 1));
        true
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// Products matching `query`, sorted by its sort order.
    #[must_use]
    pub fn browse_products(&self, query: &ListingQuery) -> Vec<&Product> {
        query.apply(self.catalog.products())
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    #[must_use]
    pub fn subcategories(&self, category: &str) -> Vec<&str> {
        self.catalog.subcategories(category)
    }

    /// Gallery images matching `query`, sorted by its sort order.
    #[must_use]
    pub fn browse_gallery(&self, query: &ListingQuery) -> Vec<&GalleryImage> {
        query.apply(&self.gallery)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Totals for the current cart with the given shipping method.
    #[must_use]
    pub fn checkout_summary(&self, shipping: ShippingMethod) -> OrderSummary {
        OrderSummary::compute(self.cart_total(), shipping)
    }

    /// Place an order for the current cart.
    ///
    /// On success the order is appended to the history and persisted, and
    /// the cart is cleared. The cleared cart is only persisted once the
    /// order is, so a failed order write leaves the stored cart intact.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] for invalid shipping details or an empty
    /// cart. Nothing is modified in that case.
    #[instrument(skip(self, request), fields(payment = %request.payment_method, shipping = %request.shipping_method))]
    pub fn place_order(&mut self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        let now = (self.clock)();
        let id = self.orders.next_id(now);
        let order = gpm_core::place_order(&self.cart, &self.catalog, request, id, now)?;

        self.orders.push(order.clone());
        self.cart.clear();
        // A stored empty cart without the stored order would lose both on reload.
        self.persisted = snapshot::commit(&mut self.storage, &self.orders)
            && snapshot::commit(&mut self.storage, &self.cart);

        info!(order_id = %order.id, total = %order.total, items = order.item_count(), "Order placed");
        Ok(order)
    }

    #[must_use]
    pub fn find_order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.find(id)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Apply a cart transition and persist the cart if it changed.
    fn update_cart(&mut self, transition: impl FnOnce(&mut Cart, DateTime<Utc>) -> bool) {
        let now = (self.clock)();
        if transition(&mut self.cart, now) {
            self.persisted = snapshot::commit(&mut self.storage, &self.cart);
            self.report_orphans();
        }
    }

    /// Apply a wishlist transition and persist the wishlist if it changed.
    fn update_wishlist(&mut self, transition: impl FnOnce(&mut Wishlist, DateTime<Utc>) -> bool) {
        let now = (self.clock)();
        if transition(&mut self.wishlist, now) {
            self.persisted = snapshot::commit(&mut self.storage, &self.wishlist);
        }
    }

    fn report_orphans(&self) {
        for line in self.orphaned_lines() {
            warn!(
                product_id = %line.product_id,
                variant_index = line.variant_index,
                size = %line.size,
                "Cart line refers to a product or variant missing from the catalog"
            );
        }
    }
}
