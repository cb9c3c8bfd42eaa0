//! Loading the product catalog and gallery from data files.
//!
//! Files are YAML (`.yaml`, `.yml`) or JSON (`.json`), chosen by extension.
//! The catalog file has a top-level `products:` list and the gallery file a
//! top-level `images:` list.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use gpm_core::{Catalog, GalleryImage, Product};

/// Errors that can occur while loading a data file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported data file format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct GalleryFile {
    #[serde(default)]
    images: Vec<GalleryImage>,
}

/// Load the product catalog.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file is missing, unreadable, or malformed.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let file: CatalogFile = load_document(path)?;
    let catalog = Catalog::new(file.products);
    info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
    Ok(catalog)
}

/// Load the gallery. A missing file yields an empty gallery.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file exists but cannot be read or parsed.
pub fn load_gallery(path: &Path) -> Result<Vec<GalleryImage>, CatalogLoadError> {
    if !path.exists() {
        warn!(path = %path.display(), "Gallery file does not exist; gallery is empty");
        return Ok(Vec::new());
    }

    let file: GalleryFile = load_document(path)?;
    info!(path = %path.display(), images = file.images.len(), "Loaded gallery");
    Ok(file.images)
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogLoadError> {
    enum Format {
        Yaml,
        Json,
    }

    let format = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => Format::Yaml,
        Some("json") => Format::Json,
        _ => return Err(CatalogLoadError::UnsupportedFormat(path.to_path_buf())),
    };

    let content = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        Format::Yaml => serde_yaml::from_str(&content).map_err(|source| CatalogLoadError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Json => serde_json::from_str(&content).map_err(|source| CatalogLoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use gpm_core::{GalleryCategory, Money, ProductId};

    use super::*;

    const CATALOG_YAML: &str = r##"
products:
  - id: prd-001
    name: GPM Compression Tee
    price: 300000
    category: APPAREL
    subcategory: COMPRESSION
    tech: DRY-FIT / 140GSM
    createdAt: '2026-01-10T00:00:00Z'
    variants:
      - color: { id: blk, name: Black, hex: "#000000" }
        images: [/images/products/tee-black.png]
        sizes:
          - { size: M, stock: 4 }
          - { size: L, stock: 0 }
"##;

    #[test]
    fn test_load_catalog_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.yaml");
        fs::write(&path, CATALOG_YAML).unwrap();

        let catalog = load_catalog(&path).unwrap();
        let product = catalog.product(&ProductId::new("prd-001")).unwrap();
        assert_eq!(product.price, Money::new(300_000));
        assert_eq!(product.variants[0].stock_for("M"), 4);
        assert_eq!(product.variants[0].stock_for("L"), 0);
    }

    #[test]
    fn test_load_catalog_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"products":[{"id":"prd-009","name":"Race Belt","price":150000,
                "category":"GEAR","subcategory":"STORAGE",
                "createdAt":"2026-01-05T00:00:00Z",
                "variants":[{"color":{"id":"red","name":"Red","hex":"FF0000"},
                "sizes":[{"size":"ONE SIZE","stock":10}]}]}]}"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.categories(), vec!["GEAR"]);
    }

    #[test]
    fn test_load_catalog_errors() {
        let tmp = tempfile::tempdir().unwrap();

        let missing = load_catalog(&tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, CatalogLoadError::Io { .. }));

        let toml = tmp.path().join("catalog.toml");
        fs::write(&toml, "").unwrap();
        assert!(matches!(
            load_catalog(&toml).unwrap_err(),
            CatalogLoadError::UnsupportedFormat(_)
        ));

        let bad = tmp.path().join("catalog.yml");
        fs::write(&bad, "products: [ {id: ").unwrap();
        assert!(matches!(
            load_catalog(&bad).unwrap_err(),
            CatalogLoadError::Yaml { .. }
        ));
    }

    #[test]
    fn test_missing_gallery_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let images = load_gallery(&tmp.path().join("gallery.yaml")).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_load_gallery_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gallery.yaml");
        fs::write(
            &path,
            r"
images:
  - id: img-001
    title: Sunday long run
    url: /images/gallery/long-run.jpg
    category: community
    location: Sudirman
    date: 2026-01-11
    tags: [long-run, sunday]
    width: 1600
    height: 1067
",
        )
        .unwrap();

        let images = load_gallery(&path).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].category, GalleryCategory::Community);
    }
}
