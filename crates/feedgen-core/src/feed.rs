use chrono::{DateTime, Utc};
use serde::Serialize;

/// Format tag stamped into per-category feed metadata.
pub const FEED_FORMAT_CATEGORY: &str = "commerce_feed_v1";
/// Format tag stamped into the flat single-file feed metadata.
pub const FEED_FORMAT_FLAT: &str = "openai_commerce_v1";

pub const AVAILABILITY_IN_STOCK: &str = "in_stock";
pub const CONDITION_NEW: &str = "new";

/// A single normalized product entry as it appears in a feed document.
///
/// Field order matches the wire format consumed downstream; `images` is
/// omitted entirely when the product has no usable image.
#[derive(Debug, Clone, Serialize)]
pub struct FeedProduct {
    /// Merchant SKU, used as the feed-level product identifier.
    pub id: String,
    pub title: String,
    /// HTML-stripped, truncated description.
    pub description: String,
    /// Canonical storefront URL.
    pub link: String,
    /// Fixed two-decimal amount plus currency code, e.g. `"12.99 USD"`.
    pub price: String,
    pub availability: String,
    pub enable_search: bool,
    pub enable_checkout: bool,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Category identity embedded in a per-category feed document.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: u32,
    pub name: String,
}

/// Generation metadata attached to every feed document.
#[derive(Debug, Clone, Serialize)]
pub struct FeedMetadata {
    pub generated: DateTime<Utc>,
    pub count: usize,
    pub format: String,
}

impl FeedMetadata {
    /// Metadata stamped with the current UTC time.
    #[must_use]
    pub fn now(count: usize, format: &str) -> Self {
        Self {
            generated: Utc::now(),
            count,
            format: format.to_string(),
        }
    }
}

/// One feed document scoped to a single category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryFeed {
    pub category: CategoryRef,
    pub products: Vec<FeedProduct>,
    pub metadata: FeedMetadata,
}

/// A single flat feed document containing every qualifying product.
#[derive(Debug, Clone, Serialize)]
pub struct FlatFeed {
    pub products: Vec<FeedProduct>,
    pub metadata: FeedMetadata,
}

/// Reference to one written category feed, as recorded in the index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub id: u32,
    pub name: String,
    /// Path relative to the output directory, e.g. `"categories/drinks.json"`.
    pub filename: String,
    pub product_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexMetadata {
    pub generated: DateTime<Utc>,
    pub total_categories: usize,
    pub total_products: usize,
    pub format: String,
}

/// Index document summarizing every category feed written by a run.
#[derive(Debug, Clone, Serialize)]
pub struct FeedIndex {
    pub categories: Vec<IndexEntry>,
    pub metadata: IndexMetadata,
}

impl FeedIndex {
    /// Assemble the index for a finished category run.
    #[must_use]
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        let total_products = entries.iter().map(|e| e.product_count).sum();
        Self {
            metadata: IndexMetadata {
                generated: Utc::now(),
                total_categories: entries.len(),
                total_products,
                format: FEED_FORMAT_CATEGORY.to_string(),
            },
            categories: entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: &str, images: Option<Vec<String>>) -> FeedProduct {
        FeedProduct {
            id: id.to_string(),
            title: "Stainless Travel Mug".to_string(),
            description: "Keeps drinks hot for 12 hours.".to_string(),
            link: "https://shop.example.com/stainless-travel-mug".to_string(),
            price: "24.00 USD".to_string(),
            availability: AVAILABILITY_IN_STOCK.to_string(),
            enable_search: true,
            enable_checkout: true,
            condition: CONDITION_NEW.to_string(),
            images,
        }
    }

    #[test]
    fn product_without_image_omits_images_key() {
        let json = serde_json::to_value(make_product("MUG-01", None)).unwrap();
        assert!(json.get("images").is_none());
    }

    #[test]
    fn product_with_image_serializes_single_url() {
        let product = make_product(
            "MUG-01",
            Some(vec![
                "https://shop.example.com/media/catalog/product/m/u/mug.jpg".to_string(),
            ]),
        );
        let json = serde_json::to_value(product).unwrap();
        let images = json["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn category_feed_serializes_expected_top_level_keys() {
        let feed = CategoryFeed {
            category: CategoryRef {
                id: 42,
                name: "Drinkware".to_string(),
            },
            products: vec![make_product("MUG-01", None), make_product("MUG-02", None)],
            metadata: FeedMetadata::now(2, FEED_FORMAT_CATEGORY),
        };
        let json = serde_json::to_value(feed).unwrap();

        assert_eq!(json["category"]["id"], 42);
        assert_eq!(json["products"].as_array().unwrap().len(), 2);
        assert_eq!(json["metadata"]["count"], 2);
        assert_eq!(json["metadata"]["format"], FEED_FORMAT_CATEGORY);
        assert!(json["metadata"]["generated"].is_string());
    }

    #[test]
    fn flat_feed_serializes_products_and_metadata() {
        let feed = FlatFeed {
            products: vec![make_product("MUG-01", None)],
            metadata: FeedMetadata::now(1, FEED_FORMAT_FLAT),
        };
        let json = serde_json::to_value(feed).unwrap();
        assert_eq!(json["products"].as_array().unwrap().len(), 1);
        assert_eq!(json["metadata"]["format"], FEED_FORMAT_FLAT);
    }

    #[test]
    fn index_totals_sum_per_category_counts() {
        let index = FeedIndex::from_entries(vec![
            IndexEntry {
                id: 3,
                name: "Drinkware".to_string(),
                filename: "categories/drinkware.json".to_string(),
                product_count: 2,
            },
            IndexEntry {
                id: 5,
                name: "Apparel".to_string(),
                filename: "categories/apparel.json".to_string(),
                product_count: 7,
            },
        ]);

        assert_eq!(index.metadata.total_categories, 2);
        assert_eq!(index.metadata.total_products, 9);
        assert_eq!(index.metadata.format, FEED_FORMAT_CATEGORY);
    }
}
