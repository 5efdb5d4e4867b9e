//! Product reads: one left join per feed attribute over the EAV value tables.
//!
//! The query joins the base entity row to each attribute's value table by
//! (entity, attribute, store). A product qualifies for a feed only when its
//! name and price values are non-null in the relevant scope.

use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::attributes::ProductAttribute;
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A denormalized product row: base entity columns plus one value per feed
/// attribute.
///
/// The query's non-null filter guarantees `name` and `price` in practice;
/// they stay optional here so a schema drift degrades to defaults instead of
/// a decode failure.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub entity_id: u32,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Decimal>,
    pub url_key: Option<String>,
    pub image: Option<String>,
}

impl From<ProductRow> for feedgen_core::ProductSource {
    fn from(row: ProductRow) -> Self {
        Self {
            sku: row.sku,
            name: row.name,
            description: row.description,
            short_description: row.short_description,
            price: row.price,
            url_key: row.url_key,
            image: row.image,
        }
    }
}

// ---------------------------------------------------------------------------
// Query construction
// ---------------------------------------------------------------------------

/// One `LEFT JOIN` clause for an attribute's value table.
///
/// The correlated `MIN(value_id)` subquery pins the join to a single
/// deterministic row when data-quality issues leave duplicates for the same
/// (entity, attribute, store) triple.
fn value_join(attr: ProductAttribute) -> String {
    let table = attr.value_table();
    let alias = attr.alias();
    format!(
        "LEFT JOIN {table} {alias} \
            ON {alias}.entity_id = p.entity_id \
           AND {alias}.attribute_id = {id} \
           AND {alias}.store_id = {store} \
           AND {alias}.value_id = ( \
               SELECT MIN(dup.value_id) \
               FROM {table} dup \
               WHERE dup.entity_id = p.entity_id \
                 AND dup.attribute_id = {id} \
                 AND dup.store_id = {store})",
        id = attr.id(),
        store = attr.store_id(),
    )
}

/// SQL for [`list_products`].
///
/// `with_category_filter` adds the inner join against the category-product
/// association table and a `category_id` placeholder; `with_limit` appends a
/// `LIMIT` placeholder. Placeholders bind in that order.
pub(crate) fn build_product_query(with_category_filter: bool, with_limit: bool) -> String {
    let select = ProductAttribute::ALL
        .iter()
        .map(|attr| format!("{}.value AS {}", attr.alias(), attr.output_column()))
        .collect::<Vec<_>>()
        .join(", ");
    let joins = ProductAttribute::ALL
        .iter()
        .map(|attr| value_join(*attr))
        .collect::<Vec<_>>()
        .join(" ");

    let mut sql = format!(
        "SELECT p.entity_id, p.sku, {select} \
         FROM catalog_product_entity p "
    );
    if with_category_filter {
        sql.push_str("INNER JOIN catalog_category_product ccp ON ccp.product_id = p.entity_id ");
    }
    sql.push_str(&joins);
    sql.push_str(" WHERE p.type_id = 'simple'");
    if with_category_filter {
        sql.push_str(" AND ccp.category_id = ?");
    }
    sql.push_str(&format!(
        " AND {name}.value IS NOT NULL AND {price}.value IS NOT NULL",
        name = ProductAttribute::Name.alias(),
        price = ProductAttribute::Price.alias(),
    ));
    sql.push_str(" ORDER BY p.entity_id");
    if with_limit {
        sql.push_str(" LIMIT ?");
    }
    sql
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// List qualifying simple products in entity-id order.
///
/// `category_id` restricts the result to members of one category via the
/// association table; `limit` caps the row count.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &MySqlPool,
    category_id: Option<u32>,
    limit: Option<u32>,
) -> Result<Vec<ProductRow>, DbError> {
    let sql = build_product_query(category_id.is_some(), limit.is_some());
    let mut query = sqlx::query_as::<_, ProductRow>(&sql);
    if let Some(id) = category_id {
        query = query.bind(id);
    }
    if let Some(n) = limit {
        query = query.bind(n);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_selects_every_feed_attribute() {
        let sql = build_product_query(false, false);
        for column in [
            "name",
            "description",
            "short_description",
            "price",
            "url_key",
            "image",
        ] {
            assert!(sql.contains(&format!("AS {column}")), "missing {column}");
        }
    }

    #[test]
    fn query_filters_to_simple_products_with_name_and_price() {
        let sql = build_product_query(false, false);
        assert!(sql.contains("p.type_id = 'simple'"));
        assert!(sql.contains("pn.value IS NOT NULL"));
        assert!(sql.contains("pp.value IS NOT NULL"));
    }

    #[test]
    fn query_orders_by_entity_id() {
        let sql = build_product_query(false, false);
        assert!(sql.ends_with("ORDER BY p.entity_id"));
    }

    #[test]
    fn category_filter_adds_association_join_and_placeholder() {
        let sql = build_product_query(true, false);
        assert!(sql.contains("INNER JOIN catalog_category_product ccp"));
        assert!(sql.contains("ccp.category_id = ?"));

        let without = build_product_query(false, false);
        assert!(!without.contains("catalog_category_product"));
    }

    #[test]
    fn limit_appends_placeholder_last() {
        let sql = build_product_query(false, true);
        assert!(sql.ends_with("LIMIT ?"));
    }

    #[test]
    fn joins_pin_duplicates_to_lowest_value_id() {
        let sql = build_product_query(false, false);
        assert_eq!(sql.matches("MIN(dup.value_id)").count(), 6);
    }

    #[test]
    fn description_joins_read_store_view_one() {
        let sql = build_product_query(false, false);
        assert!(sql.contains("pd.attribute_id = 75"));
        assert!(sql.contains("pd.store_id = 1"));
        assert!(sql.contains("psd.attribute_id = 76"));
        assert!(sql.contains("psd.store_id = 1"));
        assert!(sql.contains("pn.store_id = 0"));
    }

    #[test]
    fn product_row_converts_to_source() {
        let row = ProductRow {
            entity_id: 7,
            sku: Some("MUG-01".to_string()),
            name: Some("Stainless Travel Mug".to_string()),
            description: None,
            short_description: Some("Hot drinks.".to_string()),
            price: Some(Decimal::new(2400, 2)),
            url_key: None,
            image: Some("/m/u/mug.jpg".to_string()),
        };
        let source: feedgen_core::ProductSource = row.into();
        assert_eq!(source.sku.as_deref(), Some("MUG-01"));
        assert_eq!(source.short_description.as_deref(), Some("Hot drinks."));
        assert!(source.url_key.is_none());
    }
}
