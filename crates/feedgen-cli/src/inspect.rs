//! Console dump of one product's raw attribute rows, for chasing
//! data-quality issues behind a bad feed entry.

use feedgen_core::normalize::truncate_chars;
use sqlx::MySqlPool;

const PREVIEW_CHARS: usize = 100;

/// Resolve `term` (SKU or URL key) and print every stored attribute value.
///
/// # Errors
///
/// Returns an error if no product matches or a query fails.
pub(crate) async fn run(pool: &MySqlPool, term: &str) -> anyhow::Result<()> {
    let Some(identity) = feedgen_db::find_product(pool, term).await? else {
        anyhow::bail!("product not found: {term}");
    };

    println!(
        "found product: entity_id={}, sku={}",
        identity.entity_id,
        identity.sku.as_deref().unwrap_or("<none>")
    );
    println!("{}", "-".repeat(60));

    let values = feedgen_db::list_attribute_values(pool, identity.entity_id).await?;
    if values.is_empty() {
        println!("no stored attribute values");
        return Ok(());
    }
    for row in &values {
        println!(
            "  [{}] {} (store {}): {}",
            row.attribute_id,
            row.attribute_code,
            row.store_id,
            preview(row.value.as_deref())
        );
    }
    Ok(())
}

/// First [`PREVIEW_CHARS`] characters of a stored value, with an ellipsis
/// when cut; `NULL` for absent values.
fn preview(value: Option<&str>) -> String {
    match value {
        None => "NULL".to_string(),
        Some(v) => {
            let cut = truncate_chars(v, PREVIEW_CHARS);
            if cut.len() < v.len() {
                format!("{cut}...")
            } else {
                v.to_string()
            }
        }
    }
}
