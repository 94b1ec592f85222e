//! Common in-memory representation produced by both input adapters.

use bigdecimal::BigDecimal;

/// A (minimum, maximum) pair of optional values.
///
/// Each bound coerces independently; malformed input collapses to `None`
/// rather than surviving as a bogus number or poisoning its partner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range<T> {
    pub minimum: Option<T>,
    pub maximum: Option<T>,
}

/// One BJCP style, normalized from either source schema.
///
/// Text fields are `None` when absent or empty in the source; numeric
/// ranges carry fixed-scale decimals (ABV at 2 places, gravities at 3).
#[derive(Debug, Clone, Default)]
pub struct StyleRecord {
    pub bjcp_number: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub category_description: Option<String>,
    pub overall_impression: Option<String>,
    pub appearance: Option<String>,
    pub aroma: Option<String>,
    pub flavor: Option<String>,
    pub mouthfeel: Option<String>,
    pub comments: Option<String>,
    pub history: Option<String>,
    pub ingredients: Option<String>,
    pub style_comparison: Option<String>,
    pub examples: Option<String>,
    pub tags: Option<String>,
    pub abv: Range<BigDecimal>,
    pub ibu: Range<i32>,
    pub srm: Range<i32>,
    pub og: Range<BigDecimal>,
    pub fg: Range<BigDecimal>,
}
