//! JSON file output for feed documents.
//!
//! `serde_json::to_string_pretty` produces the 2-space-indented UTF-8
//! documents the feed contract requires.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use feedgen_core::{CategoryFeed, FeedIndex, FlatFeed};

const CATEGORIES_SUBDIR: &str = "categories";
const INDEX_FILENAME: &str = "index.json";

/// Write one category feed to `<output_dir>/categories/<slug>.json`,
/// creating directories as needed. Returns the written path.
pub(crate) fn write_category_feed(
    output_dir: &Path,
    slug: &str,
    feed: &CategoryFeed,
) -> anyhow::Result<PathBuf> {
    let dir = output_dir.join(CATEGORIES_SUBDIR);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join(format!("{slug}.json"));
    let body = serde_json::to_string_pretty(feed)?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Write the run's index document to `<output_dir>/index.json`.
pub(crate) fn write_index(output_dir: &Path, index: &FeedIndex) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;

    let path = output_dir.join(INDEX_FILENAME);
    let body = serde_json::to_string_pretty(index)?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Write the flat feed to an explicit path, creating parent directories as
/// needed.
pub(crate) fn write_flat_feed(path: &Path, feed: &FlatFeed) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(feed)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedgen_core::{
        build_feed_product, CategoryRef, FeedMetadata, IndexEntry, ProductSource,
        FEED_FORMAT_CATEGORY, FEED_FORMAT_FLAT,
    };
    use rust_decimal::Decimal;

    const BASE: &str = "https://shop.example.com";

    /// Unique per-test output root under the system temp dir.
    fn temp_output_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("feedgen-writer-{tag}-{}", std::process::id()))
    }

    fn make_source(sku: &str) -> ProductSource {
        ProductSource {
            sku: Some(sku.to_string()),
            name: Some("Stainless Travel Mug".to_string()),
            description: Some("<p>Keeps drinks hot.</p>".to_string()),
            short_description: None,
            price: Some(Decimal::new(2400, 2)),
            url_key: Some("stainless-travel-mug".to_string()),
            image: None,
        }
    }

    fn make_category_feed(product_skus: &[&str]) -> CategoryFeed {
        let products: Vec<_> = product_skus
            .iter()
            .map(|sku| build_feed_product(make_source(sku), BASE))
            .collect();
        CategoryFeed {
            category: CategoryRef {
                id: 42,
                name: "Drinkware".to_string(),
            },
            metadata: FeedMetadata::now(products.len(), FEED_FORMAT_CATEGORY),
            products,
        }
    }

    #[test]
    fn category_feed_lands_under_categories_subdir() {
        let out = temp_output_dir("category-path");
        let feed = make_category_feed(&["MUG-01", "MUG-02"]);

        let path = write_category_feed(&out, "drinkware", &feed).unwrap();
        assert_eq!(path, out.join("categories").join("drinkware.json"));
        assert!(path.is_file());

        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn category_feed_round_trips_two_products() {
        let out = temp_output_dir("category-roundtrip");
        let feed = make_category_feed(&["MUG-01", "MUG-02"]);

        let path = write_category_feed(&out, "drinkware", &feed).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(parsed["category"]["id"], 42);
        assert_eq!(parsed["products"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["metadata"]["count"], 2);
        assert_eq!(parsed["metadata"]["format"], FEED_FORMAT_CATEGORY);
        assert_eq!(parsed["products"][0]["id"], "MUG-01");
        assert_eq!(parsed["products"][0]["price"], "24.00 USD");
        assert!(parsed["products"][0].get("images").is_none());

        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn output_uses_two_space_indentation() {
        let out = temp_output_dir("indent");
        let feed = make_category_feed(&["MUG-01"]);

        let path = write_category_feed(&out, "drinkware", &feed).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("{\n  \""));

        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn index_reports_per_category_counts() {
        let out = temp_output_dir("index");
        let index = FeedIndex::from_entries(vec![IndexEntry {
            id: 42,
            name: "Drinkware".to_string(),
            filename: "categories/drinkware.json".to_string(),
            product_count: 2,
        }]);

        let path = write_index(&out, &index).unwrap();
        assert_eq!(path, out.join("index.json"));
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(parsed["categories"][0]["product_count"], 2);
        assert_eq!(parsed["metadata"]["total_categories"], 1);
        assert_eq!(parsed["metadata"]["total_products"], 2);

        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn flat_feed_creates_parent_directories() {
        let out = temp_output_dir("flat");
        let products = vec![build_feed_product(make_source("MUG-01"), BASE)];
        let feed = FlatFeed {
            metadata: FeedMetadata::now(products.len(), FEED_FORMAT_FLAT),
            products,
        };

        let path = out.join("nested").join("feed.json");
        write_flat_feed(&path, &feed).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(parsed["products"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["metadata"]["format"], FEED_FORMAT_FLAT);

        fs::remove_dir_all(&out).unwrap();
    }
}
