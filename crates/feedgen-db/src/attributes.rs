//! Named registry for the EAV attribute ids the feed depends on.
//!
//! The numeric ids come from the platform's attribute dictionary
//! (`eav_attribute`) and encode business meaning the bare integers hide.
//! [`validate_attribute_dictionary`] checks every id against the live
//! dictionary before a run touches product data, so a reinstalled or
//! customized store fails loudly instead of exporting the wrong fields.

use sqlx::MySqlPool;

use crate::DbError;

/// `eav_entity_type.entity_type_id` for catalog products.
pub const PRODUCT_ENTITY_TYPE_ID: u16 = 4;
/// `eav_entity_type.entity_type_id` for catalog categories.
pub const CATEGORY_ENTITY_TYPE_ID: u16 = 3;

/// Attribute id of the category display name.
pub const CATEGORY_NAME_ATTRIBUTE_ID: u16 = 45;

/// The admin/default store scope.
pub const DEFAULT_STORE_ID: u16 = 0;
/// Store view carrying the description text attributes.
pub const TEXT_STORE_ID: u16 = 1;

/// Product attributes the feed reads, each tied to its dictionary id, value
/// table, and store scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAttribute {
    Name,
    Description,
    ShortDescription,
    Price,
    UrlKey,
    Image,
}

impl ProductAttribute {
    /// Every attribute the product query joins, in select-list order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Description,
        Self::ShortDescription,
        Self::Price,
        Self::UrlKey,
        Self::Image,
    ];

    /// Numeric id in the platform's attribute dictionary.
    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Self::Name => 73,
            Self::Description => 75,
            Self::ShortDescription => 76,
            Self::Price => 77,
            Self::UrlKey => 121,
            Self::Image => 87,
        }
    }

    /// `eav_attribute.attribute_code` this id must map to.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::ShortDescription => "short_description",
            Self::Price => "price",
            Self::UrlKey => "url_key",
            Self::Image => "image",
        }
    }

    /// EAV value table holding this attribute's rows.
    #[must_use]
    pub const fn value_table(self) -> &'static str {
        match self {
            Self::Description | Self::ShortDescription => "catalog_product_entity_text",
            Self::Price => "catalog_product_entity_decimal",
            Self::Name | Self::UrlKey | Self::Image => "catalog_product_entity_varchar",
        }
    }

    /// Store scope the feed reads this attribute from.
    #[must_use]
    pub const fn store_id(self) -> u16 {
        match self {
            Self::Description | Self::ShortDescription => TEXT_STORE_ID,
            _ => DEFAULT_STORE_ID,
        }
    }

    /// Join alias used in query construction.
    pub(crate) const fn alias(self) -> &'static str {
        match self {
            Self::Name => "pn",
            Self::Description => "pd",
            Self::ShortDescription => "psd",
            Self::Price => "pp",
            Self::UrlKey => "pu",
            Self::Image => "pi",
        }
    }

    /// Column name the attribute's value is selected as.
    pub(crate) const fn output_column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::ShortDescription => "short_description",
            Self::Price => "price",
            Self::UrlKey => "url_key",
            Self::Image => "image",
        }
    }
}

/// Check every attribute id the feed depends on against the live
/// `eav_attribute` dictionary.
///
/// # Errors
///
/// Returns [`DbError::AttributeDictionary`] listing every missing or
/// mismatched attribute, or [`DbError::Sqlx`] if the dictionary cannot be
/// queried.
pub async fn validate_attribute_dictionary(pool: &MySqlPool) -> Result<(), DbError> {
    let expected: Vec<(u16, u16, &'static str)> = ProductAttribute::ALL
        .iter()
        .map(|attr| (PRODUCT_ENTITY_TYPE_ID, attr.id(), attr.code()))
        .chain(std::iter::once((
            CATEGORY_ENTITY_TYPE_ID,
            CATEGORY_NAME_ATTRIBUTE_ID,
            "name",
        )))
        .collect();

    let product_ids = ProductAttribute::ALL
        .iter()
        .map(|attr| attr.id().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT entity_type_id, attribute_id, attribute_code \
         FROM eav_attribute \
         WHERE (entity_type_id = {PRODUCT_ENTITY_TYPE_ID} AND attribute_id IN ({product_ids})) \
            OR (entity_type_id = {CATEGORY_ENTITY_TYPE_ID} \
                AND attribute_id = {CATEGORY_NAME_ATTRIBUTE_ID})"
    );
    let live: Vec<(u16, u16, String)> = sqlx::query_as(&sql).fetch_all(pool).await?;

    let mut problems = Vec::new();
    for (entity_type_id, attribute_id, code) in &expected {
        match live
            .iter()
            .find(|(et, id, _)| et == entity_type_id && id == attribute_id)
        {
            None => problems.push(format!(
                "attribute {attribute_id} ({code}) missing for entity type {entity_type_id}"
            )),
            Some((_, _, live_code)) if live_code != code => problems.push(format!(
                "attribute {attribute_id} maps to '{live_code}', expected '{code}'"
            )),
            Some(_) => {}
        }
    }

    if problems.is_empty() {
        tracing::debug!("attribute dictionary validated");
        Ok(())
    } else {
        Err(DbError::AttributeDictionary(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_ids_match_dictionary_contract() {
        assert_eq!(ProductAttribute::Name.id(), 73);
        assert_eq!(ProductAttribute::Description.id(), 75);
        assert_eq!(ProductAttribute::ShortDescription.id(), 76);
        assert_eq!(ProductAttribute::Price.id(), 77);
        assert_eq!(ProductAttribute::Image.id(), 87);
        assert_eq!(ProductAttribute::UrlKey.id(), 121);
        assert_eq!(CATEGORY_NAME_ATTRIBUTE_ID, 45);
    }

    #[test]
    fn price_lives_in_the_decimal_table() {
        assert_eq!(
            ProductAttribute::Price.value_table(),
            "catalog_product_entity_decimal"
        );
    }

    #[test]
    fn descriptions_live_in_the_text_table_at_store_one() {
        for attr in [
            ProductAttribute::Description,
            ProductAttribute::ShortDescription,
        ] {
            assert_eq!(attr.value_table(), "catalog_product_entity_text");
            assert_eq!(attr.store_id(), TEXT_STORE_ID);
        }
    }

    #[test]
    fn remaining_attributes_use_default_store() {
        for attr in [
            ProductAttribute::Name,
            ProductAttribute::Price,
            ProductAttribute::UrlKey,
            ProductAttribute::Image,
        ] {
            assert_eq!(attr.store_id(), DEFAULT_STORE_ID);
        }
    }

    #[test]
    fn aliases_and_ids_are_distinct() {
        let mut aliases: Vec<&str> = ProductAttribute::ALL.iter().map(|a| a.alias()).collect();
        aliases.sort_unstable();
        aliases.dedup();
        assert_eq!(aliases.len(), ProductAttribute::ALL.len());

        let mut ids: Vec<u16> = ProductAttribute::ALL.iter().map(|a| a.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ProductAttribute::ALL.len());
    }
}
