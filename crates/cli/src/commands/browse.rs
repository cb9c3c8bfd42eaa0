//! `gpm products`, `gpm categories` and `gpm gallery` - listings.

use std::io::Write;

use clap::Args;

use gpm_core::{GalleryCategory, ListingQuery, SortOrder};
use gpm_storefront::{KeyValueStorage, StoreSession};

use super::CommandError;

#[derive(Args, Debug, Default)]
pub struct ProductsArgs {
    /// Only this category, e.g. `APPAREL`
    #[arg(long)]
    category: Option<String>,

    /// Only this subcategory, e.g. `COMPRESSION`
    #[arg(long)]
    subcategory: Option<String>,

    /// Case-insensitive text in name, subcategory or tech
    #[arg(long, default_value = "")]
    search: String,

    /// newest, price-low, price-high or name
    #[arg(long, default_value_t = SortOrder::Newest)]
    sort: SortOrder,
}

#[derive(Args, Debug, Default)]
pub struct GalleryArgs {
    /// event, training, race, community or location
    #[arg(long)]
    category: Option<GalleryCategory>,

    /// Case-insensitive text in title, location or tags
    #[arg(long, default_value = "")]
    search: String,

    /// newest or name
    #[arg(long, default_value_t = SortOrder::Newest)]
    sort: SortOrder,
}

/// List products matching the filters.
///
/// # Errors
///
/// Returns `CommandError::Output` if writing to `out` fails.
pub fn products<S: KeyValueStorage>(
    session: &StoreSession<S>,
    args: &ProductsArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let mut query = ListingQuery::new().search(args.search.as_str()).sort(args.sort);
    query.category.clone_from(&args.category);
    query.subcategory.clone_from(&args.subcategory);

    let products = session.browse_products(&query);
    for product in &products {
        let availability = if product.is_available() {
            ""
        } else {
            "  (sold out)"
        };
        writeln!(
            out,
            "{:<8} {:<32} {:>12}  {}/{}{}",
            product.id.as_str(),
            product.name,
            product.price.to_string(),
            product.category,
            product.subcategory,
            availability
        )?;
    }
    writeln!(out, "{} product(s), {}", products.len(), args.sort.label())?;
    Ok(())
}

/// List categories with their subcategories.
///
/// # Errors
///
/// Returns `CommandError::Output` if writing to `out` fails.
pub fn categories<S: KeyValueStorage>(
    session: &StoreSession<S>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    for category in session.categories() {
        writeln!(
            out,
            "{category}: {}",
            session.subcategories(category).join(", ")
        )?;
    }
    Ok(())
}

/// List gallery images matching the filters.
///
/// # Errors
///
/// Returns `CommandError::Output` if writing to `out` fails.
pub fn gallery<S: KeyValueStorage>(
    session: &StoreSession<S>,
    args: &GalleryArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let mut query = ListingQuery::new().search(args.search.as_str()).sort(args.sort);
    if let Some(category) = args.category {
        query = query.category(category.as_str());
    }

    let images = session.browse_gallery(&query);
    for image in &images {
        writeln!(
            out,
            "{}  {:<10} {}  ({}, {})",
            image.date,
            image.category.label(),
            image.title,
            image.location,
            image.id
        )?;
    }
    writeln!(out, "{} image(s)", images.len())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    #[test]
    fn test_products_price_low() {
        let session = fixtures::session();
        let args = ProductsArgs {
            sort: SortOrder::PriceLow,
            ..ProductsArgs::default()
        };

        let mut out = Vec::new();
        products(&session, &args, &mut out).unwrap();
        let text = fixtures::output(out);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("prd-002"));
        assert!(lines[0].ends_with("(sold out)"));
        assert!(lines[1].starts_with("prd-001"));
        assert_eq!(lines[2], "2 product(s), Price: Low to High");
    }

    #[test]
    fn test_products_category_filter() {
        let session = fixtures::session();
        let args = ProductsArgs {
            category: Some("APPAREL".to_string()),
            search: "void".to_string(),
            ..ProductsArgs::default()
        };

        let mut out = Vec::new();
        products(&session, &args, &mut out).unwrap();
        assert!(fixtures::output(out).ends_with("1 product(s), Newest First\n"));
    }

    #[test]
    fn test_categories() {
        let session = fixtures::session();
        let mut out = Vec::new();
        categories(&session, &mut out).unwrap();
        assert_eq!(
            fixtures::output(out),
            "APPAREL: COMPRESSION\nACCESSORIES: COMPRESSION\n"
        );
    }

    #[test]
    fn test_empty_gallery() {
        let session = fixtures::session();
        let mut out = Vec::new();
        gallery(&session, &GalleryArgs::default(), &mut out).unwrap();
        assert_eq!(fixtures::output(out), "0 image(s)\n");
    }
}
