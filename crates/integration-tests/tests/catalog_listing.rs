//! Integration tests for filtering and sorting the bundled catalog and gallery.

use gpm_core::{
    GalleryCategory, Listing, ListingQuery, Money, Product, SortOrder, filter_listings,
    sort_listings,
};
use gpm_integration_tests::{catalog, gallery, open_session};
use gpm_storefront::MemoryStorage;

fn ids(products: &[&Product]) -> Vec<String> {
    products.iter().map(|p| p.id.to_string()).collect()
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn test_bundled_catalog_shape() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 12);
    assert_eq!(catalog.categories(), vec!["APPAREL", "ACCESSORIES", "GEAR"]);
    assert_eq!(catalog.subcategories("APPAREL"), vec!["COMPRESSION", "OUTWEAR"]);
    assert_eq!(catalog.subcategories("GEAR"), vec!["STORAGE", "SAFETY"]);
    assert!(catalog.subcategories("SHOES").is_empty());
}

#[test]
fn test_apparel_price_low_is_non_decreasing() {
    let catalog = catalog();
    let query = ListingQuery::new().category("APPAREL").sort(SortOrder::PriceLow);
    let products = query.apply(catalog.products());

    assert_eq!(products.len(), 8);
    assert!(products.iter().all(|p| p.category == "APPAREL"));
    assert!(
        products.windows(2).all(|w| w[0].price <= w[1].price),
        "prices should be non-decreasing"
    );
    assert_eq!(products.first().map(|p| p.price), Some(Money::new(250_000)));
    assert_eq!(
        ids(&products),
        vec!["prd-005", "prd-001", "prd-002", "prd-011", "prd-004", "prd-012", "prd-006", "prd-003"]
    );
}

#[test]
fn test_subcategory_and_name_sort() {
    let catalog = catalog();
    let query = ListingQuery::new()
        .category("APPAREL")
        .subcategory("OUTWEAR")
        .sort(SortOrder::Name);

    assert_eq!(
        ids(&query.apply(catalog.products())),
        vec!["prd-003", "prd-006", "prd-012"]
    );
}

#[test]
fn test_search_matches_tech_case_insensitively() {
    let catalog = catalog();
    let query = ListingQuery::new().search("water").sort(SortOrder::PriceHigh);

    assert_eq!(
        ids(&query.apply(catalog.products())),
        vec!["prd-003", "prd-006", "prd-009"]
    );
}

#[test]
fn test_newest_keeps_catalog_order_for_ties() {
    let catalog = catalog();
    let sorted = sort_listings(catalog.products().iter().collect(), SortOrder::Newest);

    assert_eq!(
        ids(&sorted),
        vec![
            "prd-006", "prd-007", "prd-008", "prd-009", "prd-010", "prd-011", "prd-012",
            "prd-005", "prd-004", "prd-003", "prd-002", "prd-001",
        ]
    );
}

#[test]
fn test_filter_does_not_touch_input() {
    let catalog = catalog();
    let before: Vec<String> = catalog.products().iter().map(|p| p.id.to_string()).collect();

    let gear = filter_listings(catalog.products(), |p| p.category() == "GEAR");
    let _ = sort_listings(gear, SortOrder::Name);

    let after: Vec<String> = catalog.products().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_unknown_category_is_empty() {
    let catalog = catalog();
    assert!(
        ListingQuery::new()
            .category("SHOES")
            .apply(catalog.products())
            .is_empty()
    );
}

// =============================================================================
// Gallery
// =============================================================================

#[test]
fn test_gallery_by_category_newest_first() {
    let images = gallery();
    let query = ListingQuery::new().category(GalleryCategory::Training.as_str());
    let titles: Vec<&str> = query.apply(&images).iter().map(|i| i.title()).collect();

    assert_eq!(
        titles,
        vec!["INTERVAL NIGHT AT THE TRACK", "SUNRISE TEMPO SESSION"]
    );
}

#[test]
fn test_gallery_search_covers_tags_and_location() {
    let images = gallery();

    let night: Vec<String> = ListingQuery::new()
        .search("NIGHT-RUN")
        .apply(&images)
        .iter()
        .map(|i| i.id.to_string())
        .collect();
    assert_eq!(night, vec!["img-006", "img-001"]);

    let bali = ListingQuery::new().search("bali").apply(&images);
    assert_eq!(bali.len(), 1);
    assert_eq!(bali[0].category, GalleryCategory::Race);
}

#[test]
fn test_gallery_price_sort_keeps_order() {
    let images = gallery();
    let by_price = ListingQuery::new().sort(SortOrder::PriceLow).apply(&images);
    let original: Vec<_> = images.iter().map(|i| &i.id).collect();
    let sorted: Vec<_> = by_price.iter().map(|i| &i.id).collect();
    assert_eq!(original, sorted, "unpriced listings compare equal");
}

#[test]
fn test_session_browse_matches_query() {
    let session = open_session(MemoryStorage::new());
    let query = ListingQuery::new().category("ACCESSORIES").sort(SortOrder::PriceLow);
    assert_eq!(
        ids(&session.browse_products(&query)),
        vec!["prd-008", "prd-007"]
    );
    assert_eq!(session.browse_gallery(&ListingQuery::new()).len(), 8);
}
