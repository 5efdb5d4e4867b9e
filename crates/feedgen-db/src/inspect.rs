//! Raw attribute dumps for a single product, used by the diagnostic
//! `inspect` command to chase data-quality issues in the value tables.

use sqlx::MySqlPool;

use crate::attributes::{ProductAttribute, PRODUCT_ENTITY_TYPE_ID};
use crate::DbError;

/// The base entity row a lookup term resolved to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductIdentity {
    pub entity_id: u32,
    pub sku: Option<String>,
}

/// One stored attribute value, joined with its dictionary entry.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttributeValueRow {
    pub attribute_id: u16,
    pub attribute_code: String,
    pub store_id: u16,
    pub value: Option<String>,
}

/// Resolve a SKU or URL key to a product entity.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the lookup fails.
pub async fn find_product(
    pool: &MySqlPool,
    term: &str,
) -> Result<Option<ProductIdentity>, DbError> {
    let sql = format!(
        "SELECT p.entity_id, p.sku \
         FROM catalog_product_entity p \
         LEFT JOIN catalog_product_entity_varchar pu \
            ON pu.entity_id = p.entity_id \
           AND pu.attribute_id = {id} \
           AND pu.store_id = {store} \
         WHERE pu.value = ? OR p.sku = ? \
         LIMIT 1",
        id = ProductAttribute::UrlKey.id(),
        store = ProductAttribute::UrlKey.store_id(),
    );
    let row = sqlx::query_as::<_, ProductIdentity>(&sql)
        .bind(term)
        .bind(term)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Every varchar, text, and decimal attribute value stored for an entity,
/// across all store scopes, ordered by attribute id then store id.
///
/// Decimal values are cast to text so the three value tables union into a
/// single row shape.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_attribute_values(
    pool: &MySqlPool,
    entity_id: u32,
) -> Result<Vec<AttributeValueRow>, DbError> {
    let sql = format!(
        "SELECT ea.attribute_id, ea.attribute_code, v.store_id, v.value \
         FROM catalog_product_entity_varchar v \
         JOIN eav_attribute ea ON ea.attribute_id = v.attribute_id \
         WHERE v.entity_id = ? AND ea.entity_type_id = {etype} \
         UNION ALL \
         SELECT ea.attribute_id, ea.attribute_code, v.store_id, v.value \
         FROM catalog_product_entity_text v \
         JOIN eav_attribute ea ON ea.attribute_id = v.attribute_id \
         WHERE v.entity_id = ? AND ea.entity_type_id = {etype} \
         UNION ALL \
         SELECT ea.attribute_id, ea.attribute_code, v.store_id, CAST(v.value AS CHAR) \
         FROM catalog_product_entity_decimal v \
         JOIN eav_attribute ea ON ea.attribute_id = v.attribute_id \
         WHERE v.entity_id = ? AND ea.entity_type_id = {etype} \
         ORDER BY attribute_id, store_id",
        etype = PRODUCT_ENTITY_TYPE_ID,
    );
    let rows = sqlx::query_as::<_, AttributeValueRow>(&sql)
        .bind(entity_id)
        .bind(entity_id)
        .bind(entity_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
