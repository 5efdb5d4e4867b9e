//! Category reads against the catalog's EAV tables.

use sqlx::MySqlPool;

use crate::attributes::{CATEGORY_NAME_ATTRIBUTE_ID, DEFAULT_STORE_ID};
use crate::DbError;

// Entity 1 is the global root, entity 2 the default store root; neither is a
// merchandisable category.
const LAST_ROOT_CATEGORY_ID: u32 = 2;

/// A category with a resolved display name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub entity_id: u32,
    pub name: String,
}

/// SQL for [`list_categories`].
///
/// Duplicate name rows for the same (entity, attribute, store) are resolved
/// by the lowest `value_id`, keeping the result deterministic regardless of
/// join order.
pub(crate) fn build_category_query() -> String {
    format!(
        "SELECT c.entity_id, cv.value AS name \
         FROM catalog_category_entity c \
         LEFT JOIN catalog_category_entity_varchar cv \
            ON cv.entity_id = c.entity_id \
           AND cv.attribute_id = {attr} \
           AND cv.store_id = {store} \
           AND cv.value_id = ( \
               SELECT MIN(dup.value_id) \
               FROM catalog_category_entity_varchar dup \
               WHERE dup.entity_id = c.entity_id \
                 AND dup.attribute_id = {attr} \
                 AND dup.store_id = {store}) \
         WHERE c.entity_id > {root} \
           AND cv.value IS NOT NULL \
         ORDER BY c.entity_id",
        attr = CATEGORY_NAME_ATTRIBUTE_ID,
        store = DEFAULT_STORE_ID,
        root = LAST_ROOT_CATEGORY_ID,
    )
}

/// List every named category, in entity-id order.
///
/// Categories without a name attribute value in the default store scope are
/// excluded; they cannot produce a feed file.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &MySqlPool) -> Result<Vec<CategoryRow>, DbError> {
    let sql = build_category_query();
    let rows = sqlx::query_as::<_, CategoryRow>(&sql).fetch_all(pool).await?;
    Ok(rows)
}
