//! Flat-list input schema: a JSON array of style objects with flat,
//! lowercased field names and stringly-typed range bounds. This is the
//! shape the hand-maintained `bjcp-data.json` uses.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};

use crate::input::text;
use crate::model::{Range, StyleRecord};
use crate::normalization::numeric;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FlatStyle {
    number: Option<Value>,
    name: Option<Value>,
    category: Option<Value>,
    overallimpression: Option<Value>,
    appearance: Option<Value>,
    aroma: Option<Value>,
    flavor: Option<Value>,
    mouthfeel: Option<Value>,
    comments: Option<Value>,
    history: Option<Value>,
    characteristicingredients: Option<Value>,
    stylecomparison: Option<Value>,
    commercialexamples: Option<Value>,
    abvmin: Option<Value>,
    abvmax: Option<Value>,
    ibumin: Option<Value>,
    ibumax: Option<Value>,
    srmmin: Option<Value>,
    srmmax: Option<Value>,
    ogmin: Option<Value>,
    ogmax: Option<Value>,
    fgmin: Option<Value>,
    fgmax: Option<Value>,
}

/// Load and adapt a flat-list document.
pub fn load(path: &Path) -> Result<Vec<StyleRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading flat style data from {}", path.display()))?;
    let styles: Vec<FlatStyle> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a flat style list", path.display()))?;
    Ok(styles.iter().map(adapt).collect())
}

fn adapt(style: &FlatStyle) -> StyleRecord {
    StyleRecord {
        bjcp_number: text(style.number.as_ref()),
        name: text(style.name.as_ref()),
        category: text(style.category.as_ref()),
        category_id: None,
        category_description: None,
        overall_impression: text(style.overallimpression.as_ref()),
        appearance: text(style.appearance.as_ref()),
        aroma: text(style.aroma.as_ref()),
        flavor: text(style.flavor.as_ref()),
        mouthfeel: text(style.mouthfeel.as_ref()),
        comments: text(style.comments.as_ref()),
        history: text(style.history.as_ref()),
        ingredients: text(style.characteristicingredients.as_ref()),
        style_comparison: text(style.stylecomparison.as_ref()),
        examples: text(style.commercialexamples.as_ref()),
        tags: None,
        abv: Range {
            minimum: numeric::decimal(style.abvmin.as_ref(), 2),
            maximum: numeric::decimal(style.abvmax.as_ref(), 2),
        },
        ibu: Range {
            minimum: numeric::int(style.ibumin.as_ref()),
            maximum: numeric::int(style.ibumax.as_ref()),
        },
        srm: Range {
            minimum: numeric::int(style.srmmin.as_ref()),
            maximum: numeric::int(style.srmmax.as_ref()),
        },
        og: Range {
            minimum: numeric::gravity(style.ogmin.as_ref()),
            maximum: numeric::gravity(style.ogmax.as_ref()),
        },
        fg: Range {
            minimum: numeric::gravity(style.fgmin.as_ref()),
            maximum: numeric::gravity(style.fgmax.as_ref()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn adapts_flat_fields_and_ranges() {
        let style: FlatStyle = serde_json::from_value(serde_json::json!({
            "number": "21A",
            "name": "American IPA",
            "category": "IPA",
            "overallimpression": "A decidedly hoppy and bitter beer.",
            "abvmin": "5.5",
            "abvmax": "7.5",
            "ibumin": "40",
            "ibumax": "70",
            "ogmin": "1.056",
            "ogmax": "1.070",
            "fgmin": "-",
            "fgmax": ""
        }))
        .unwrap();

        let record = adapt(&style);
        assert_eq!(record.bjcp_number.as_deref(), Some("21A"));
        assert_eq!(record.name.as_deref(), Some("American IPA"));
        assert_eq!(record.abv.minimum, Some(BigDecimal::from_str("5.50").unwrap()));
        assert_eq!(record.ibu.maximum, Some(70));
        assert_eq!(record.og.minimum, Some(BigDecimal::from_str("1.056").unwrap()));
        assert_eq!(record.fg.minimum, None);
        assert_eq!(record.fg.maximum, None);
        assert_eq!(record.tags, None);
    }

    #[test]
    fn empty_text_fields_are_absent() {
        let style: FlatStyle =
            serde_json::from_value(serde_json::json!({ "name": "", "history": "Brewed since 1842." }))
                .unwrap();
        let record = adapt(&style);
        assert_eq!(record.name, None);
        assert_eq!(record.history.as_deref(), Some("Brewed since 1842."));
    }
}
