//! Feed generation runs: validate the attribute dictionary, read the
//! catalog, normalize, write files, summarize to the console.
//!
//! Any query or I/O error propagates and aborts the run; there is no
//! partial-result recovery, so a failed run leaves whatever files it wrote
//! so far and exits non-zero.

pub(crate) mod writer;

use feedgen_core::normalize::category_slug;
use feedgen_core::{
    build_feed_product, AppConfig, CategoryFeed, CategoryRef, FeedIndex, FeedMetadata,
    FeedProduct, FlatFeed, IndexEntry, FEED_FORMAT_CATEGORY, FEED_FORMAT_FLAT,
};
use sqlx::MySqlPool;

/// Category run: one feed file per named category plus an index document.
///
/// Categories with no qualifying products are skipped and do not appear in
/// the index. `category_filter` restricts the run to a single entity id.
///
/// # Errors
///
/// Returns an error if the attribute dictionary is invalid, a query fails,
/// the filter matches no category, or a feed file cannot be written.
pub(crate) async fn run_category_feeds(
    pool: &MySqlPool,
    config: &AppConfig,
    category_filter: Option<u32>,
) -> anyhow::Result<()> {
    feedgen_db::validate_attribute_dictionary(pool).await?;

    let mut categories = feedgen_db::list_categories(pool).await?;
    if let Some(id) = category_filter {
        categories.retain(|c| c.entity_id == id);
        if categories.is_empty() {
            anyhow::bail!("category {id} not found or has no display name");
        }
    }
    println!("found {} categories", categories.len());

    let mut entries: Vec<IndexEntry> = Vec::new();
    for category in &categories {
        let rows =
            feedgen_db::list_products(pool, Some(category.entity_id), config.row_limit).await?;
        if rows.is_empty() {
            tracing::info!(
                category = %category.name,
                id = category.entity_id,
                "no qualifying products, skipping"
            );
            continue;
        }

        let products: Vec<FeedProduct> = rows
            .into_iter()
            .map(|row| build_feed_product(row.into(), &config.base_url))
            .collect();
        let count = products.len();
        let slug = category_slug(&category.name, category.entity_id);

        let feed = CategoryFeed {
            category: CategoryRef {
                id: category.entity_id,
                name: category.name.clone(),
            },
            products,
            metadata: FeedMetadata::now(count, FEED_FORMAT_CATEGORY),
        };
        let path = writer::write_category_feed(&config.output_dir, &slug, &feed)?;
        tracing::info!(
            category = %category.name,
            count,
            path = %path.display(),
            "category feed written"
        );

        entries.push(IndexEntry {
            id: category.entity_id,
            name: category.name.clone(),
            filename: format!("categories/{slug}.json"),
            product_count: count,
        });
    }

    let index = FeedIndex::from_entries(entries);
    let index_path = writer::write_index(&config.output_dir, &index)?;

    println!(
        "feed generation complete: {} categories, {} products, index at {}",
        index.metadata.total_categories,
        index.metadata.total_products,
        index_path.display()
    );
    Ok(())
}

/// Flat run: a single feed document containing every qualifying product.
///
/// Prints the first product entry afterwards as a quick shape check.
///
/// # Errors
///
/// Returns an error if the attribute dictionary is invalid, the product
/// query fails, or the feed file cannot be written.
pub(crate) async fn run_flat_feed(pool: &MySqlPool, config: &AppConfig) -> anyhow::Result<()> {
    feedgen_db::validate_attribute_dictionary(pool).await?;

    let rows = feedgen_db::list_products(pool, None, config.row_limit).await?;
    println!("found {} products", rows.len());

    let products: Vec<FeedProduct> = rows
        .into_iter()
        .map(|row| build_feed_product(row.into(), &config.base_url))
        .collect();
    let feed = FlatFeed {
        metadata: FeedMetadata::now(products.len(), FEED_FORMAT_FLAT),
        products,
    };

    let path = config.flat_feed_path();
    writer::write_flat_feed(&path, &feed)?;
    println!("feed saved to {}", path.display());

    if let Some(sample) = feed.products.first() {
        println!("\nsample product:\n{}", serde_json::to_string_pretty(sample)?);
    }
    Ok(())
}
