//! Nested BeerJSON input schema: `{"beerjson": {"styles": [...]}}` with
//! every range bound wrapped as `{"minimum": {"value": X}, "maximum":
//! {"value": Y}}`.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};

use crate::input::text;
use crate::model::{Range, StyleRecord};
use crate::normalization::numeric;

#[derive(Debug, Deserialize)]
struct Document {
    beerjson: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    styles: Vec<BeerJsonStyle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BeerJsonStyle {
    style_id: Option<Value>,
    name: Option<Value>,
    category: Option<Value>,
    category_id: Option<Value>,
    category_description: Option<Value>,
    overall_impression: Option<Value>,
    appearance: Option<Value>,
    aroma: Option<Value>,
    flavor: Option<Value>,
    mouthfeel: Option<Value>,
    comments: Option<Value>,
    history: Option<Value>,
    ingredients: Option<Value>,
    style_comparison: Option<Value>,
    examples: Option<Value>,
    tags: Option<Value>,
    alcohol_by_volume: Option<RangeNode>,
    international_bitterness_units: Option<RangeNode>,
    color: Option<RangeNode>,
    original_gravity: Option<RangeNode>,
    final_gravity: Option<RangeNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RangeNode {
    minimum: Option<BoundNode>,
    maximum: Option<BoundNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BoundNode {
    value: Option<Value>,
}

impl RangeNode {
    fn minimum_value(&self) -> Option<&Value> {
        self.minimum.as_ref()?.value.as_ref()
    }

    fn maximum_value(&self) -> Option<&Value> {
        self.maximum.as_ref()?.value.as_ref()
    }
}

fn bounds(node: Option<&RangeNode>) -> (Option<&Value>, Option<&Value>) {
    match node {
        Some(node) => (node.minimum_value(), node.maximum_value()),
        None => (None, None),
    }
}

/// Load and adapt a BeerJSON document.
pub fn load(path: &Path) -> Result<Vec<StyleRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading BeerJSON data from {}", path.display()))?;
    let doc: Document = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a BeerJSON document", path.display()))?;
    Ok(doc.beerjson.styles.iter().map(adapt).collect())
}

fn adapt(style: &BeerJsonStyle) -> StyleRecord {
    let (abv_min, abv_max) = bounds(style.alcohol_by_volume.as_ref());
    let (ibu_min, ibu_max) = bounds(style.international_bitterness_units.as_ref());
    let (srm_min, srm_max) = bounds(style.color.as_ref());
    let (og_min, og_max) = bounds(style.original_gravity.as_ref());
    let (fg_min, fg_max) = bounds(style.final_gravity.as_ref());

    StyleRecord {
        bjcp_number: text(style.style_id.as_ref()),
        name: text(style.name.as_ref()),
        category: text(style.category.as_ref()),
        category_id: text(style.category_id.as_ref()),
        category_description: text(style.category_description.as_ref()),
        overall_impression: text(style.overall_impression.as_ref()),
        appearance: text(style.appearance.as_ref()),
        aroma: text(style.aroma.as_ref()),
        flavor: text(style.flavor.as_ref()),
        mouthfeel: text(style.mouthfeel.as_ref()),
        comments: text(style.comments.as_ref()),
        history: text(style.history.as_ref()),
        ingredients: text(style.ingredients.as_ref()),
        style_comparison: text(style.style_comparison.as_ref()),
        examples: text(style.examples.as_ref()),
        tags: text(style.tags.as_ref()),
        abv: Range {
            minimum: numeric::decimal(abv_min, 2),
            maximum: numeric::decimal(abv_max, 2),
        },
        ibu: Range {
            minimum: numeric::int(ibu_min),
            maximum: numeric::int(ibu_max),
        },
        srm: Range {
            minimum: numeric::int(srm_min),
            maximum: numeric::int(srm_max),
        },
        og: Range {
            minimum: numeric::gravity(og_min),
            maximum: numeric::gravity(og_max),
        },
        fg: Range {
            minimum: numeric::gravity(fg_min),
            maximum: numeric::gravity(fg_max),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn style(json: serde_json::Value) -> BeerJsonStyle {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn adapts_nested_ranges() {
        let record = adapt(&style(serde_json::json!({
            "style_id": "4B",
            "name": "Festbier",
            "category": "Pale Malty European Lager",
            "category_id": "4",
            "tags": "standard-strength, pale-color, bottom-fermented",
            "alcohol_by_volume": {
                "minimum": { "value": "5.8" },
                "maximum": { "value": "6.3" }
            },
            "original_gravity": {
                "minimum": { "value": 1054 },
                "maximum": { "value": "1.057" }
            },
            "color": {
                "minimum": { "value": "4" }
            }
        })));

        assert_eq!(record.bjcp_number.as_deref(), Some("4B"));
        assert_eq!(record.category_id.as_deref(), Some("4"));
        assert_eq!(record.abv.minimum, Some(BigDecimal::from_str("5.80").unwrap()));
        // integer and decimal gravity spellings land on the same scale
        assert_eq!(record.og.minimum, Some(BigDecimal::from_str("1.054").unwrap()));
        assert_eq!(record.og.maximum, Some(BigDecimal::from_str("1.057").unwrap()));
        assert_eq!(record.srm.minimum, Some(4));
        assert_eq!(record.srm.maximum, None);
        assert_eq!(record.fg, Range::default());
    }

    #[test]
    fn missing_styles_array_is_an_error() {
        let doc: Result<Document, _> = serde_json::from_str(r#"{"beerjson": {}}"#);
        assert!(doc.is_err());
    }
}
