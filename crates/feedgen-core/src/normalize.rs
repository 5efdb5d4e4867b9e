//! Field-level normalization rules for feed entries.
//!
//! Everything here is pure: raw attribute values in, feed-ready strings out.
//! [`build_feed_product`] ties the individual rules together into a
//! [`FeedProduct`].

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::feed::{FeedProduct, AVAILABILITY_IN_STOCK, CONDITION_NEW};

pub const TITLE_MAX_CHARS: usize = 150;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Currency code appended to every formatted price.
pub const CURRENCY_CODE: &str = "USD";

/// Magento's sentinel for "no image selected".
pub const NO_SELECTION: &str = "no_selection";

/// Media path segment between the base URL and the stored image path.
pub const MEDIA_BASE_PATH: &str = "/media/catalog/product";

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX]?[0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex"));

static SLUG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

static SLUG_SEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Raw attribute values for one product, as read from the catalog.
///
/// All fields except the entity identity are nullable in the EAV value
/// tables; normalization supplies the defaults.
#[derive(Debug, Clone, Default)]
pub struct ProductSource {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Decimal>,
    pub url_key: Option<String>,
    pub image: Option<String>,
}

/// Strip HTML tags from a string, decode character references, and normalize
/// whitespace.
///
/// Tags act as separators (`"a<br>b"` → `"a b"`), so adjacent text runs never
/// fuse together. Whitespace runs collapse to a single space and the result
/// is trimmed.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    let decoded = decode_entities(&out);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode numeric character references and the common named entities.
///
/// Unrecognized references are left untouched.
fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Hard cut after `max` characters, never splitting a code point.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Render a price as a fixed two-decimal amount plus currency code.
///
/// A missing value formats as `"0.00 USD"`.
#[must_use]
pub fn format_price(price: Option<Decimal>) -> String {
    let amount = price.unwrap_or(Decimal::ZERO).round_dp(2);
    format!("{amount:.2} {CURRENCY_CODE}")
}

/// Canonical product URL: the url-key path when present and non-empty,
/// otherwise a `/product/<sku>` fallback.
#[must_use]
pub fn product_link(base_url: &str, url_key: Option<&str>, sku: &str) -> String {
    match url_key {
        Some(key) if !key.is_empty() => format!("{base_url}/{key}"),
        _ => format!("{base_url}/product/{sku}"),
    }
}

/// Resolve a stored image path to a full media URL.
///
/// Returns `None` for empty values and the [`NO_SELECTION`] sentinel. The
/// stored path already begins with `/`, so it concatenates directly onto the
/// media base path.
#[must_use]
pub fn image_url(base_url: &str, image: &str) -> Option<String> {
    if image.is_empty() || image == NO_SELECTION {
        return None;
    }
    Some(format!("{base_url}{MEDIA_BASE_PATH}{image}"))
}

/// Derive a filesystem/URL-safe slug from a display name.
///
/// Lowercases, strips everything outside word characters, whitespace, and
/// hyphens, then collapses whitespace/hyphen runs into single hyphens.
/// Idempotent: slugifying a slug returns it unchanged.
#[must_use]
pub fn slugify(name: &str) -> String {
    let cleaned = SLUG_STRIP_RE.replace_all(name, "");
    let cleaned = cleaned.trim().to_lowercase();
    SLUG_SEP_RE.replace_all(&cleaned, "-").into_owned()
}

/// Slug used for a category's feed filename.
///
/// Names made entirely of stripped characters would slugify to the empty
/// string; those fall back to `category-<id>`.
#[must_use]
pub fn category_slug(name: &str, id: u32) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        format!("category-{id}")
    } else {
        slug
    }
}

/// Assemble a [`FeedProduct`] from raw catalog values.
///
/// The description prefers the full description, falling back to the short
/// description when the full one is missing or empty, then to the empty
/// string. Missing SKUs and names coalesce to empty strings rather than
/// failing the run.
#[must_use]
pub fn build_feed_product(source: ProductSource, base_url: &str) -> FeedProduct {
    let sku = source.sku.unwrap_or_default();
    let title = truncate_chars(source.name.as_deref().unwrap_or(""), TITLE_MAX_CHARS).to_string();

    let raw_description = [source.description, source.short_description]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default();
    let stripped = strip_html(&raw_description);
    let description = truncate_chars(&stripped, DESCRIPTION_MAX_CHARS).to_string();

    let link = product_link(base_url, source.url_key.as_deref(), &sku);
    let price = format_price(source.price);
    let images = source
        .image
        .as_deref()
        .and_then(|img| image_url(base_url, img))
        .map(|url| vec![url]);

    FeedProduct {
        id: sku,
        title,
        description,
        link,
        price,
        availability: AVAILABILITY_IN_STOCK.to_string(),
        enable_search: true,
        enable_checkout: true,
        condition: CONDITION_NEW.to_string(),
        images,
    }
}
