//! SQL migration-script generation for the flat BJCP dataset.
//!
//! The whole script is rendered in memory and written in one shot; given
//! the same input and generation timestamp the output is byte-identical.

use anyhow::{bail, Context, Result};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::{fs, path::Path};
use tracing::info;

use crate::input::flat;
use crate::model::StyleRecord;

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Render an optional string as a quoted SQL literal, doubling embedded
/// single quotes. Absent values render as NULL.
fn sql_string(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("'{}'", v.replace('\'', "''")),
        _ => "NULL".to_string(),
    }
}

fn sql_decimal(value: Option<&BigDecimal>) -> String {
    value.map_or_else(|| "NULL".to_string(), |d| d.to_string())
}

fn sql_int(value: Option<i32>) -> String {
    value.map_or_else(|| "NULL".to_string(), |n| n.to_string())
}

/// Build the complete migration text for the given styles.
pub fn render(styles: &[StyleRecord], generated_at: DateTime<Utc>, source: &str) -> String {
    let mut sql = String::new();

    writeln!(
        sql,
        "-- Migration: Populate BeerStyle table with complete BJCP 2021 guidelines data"
    )
    .ok();
    writeln!(sql, "-- Date: {}", generated_at.format("%Y-%m-%d")).ok();
    writeln!(
        sql,
        "-- Description: Imports all {} BJCP beer styles with complete characteristics and ranges",
        styles.len()
    )
    .ok();
    writeln!(sql, "-- Generated from: {source}").ok();
    writeln!(sql).ok();
    writeln!(sql, "BEGIN;").ok();
    writeln!(sql).ok();
    writeln!(sql, "-- Clear any existing BeerStyle data to avoid conflicts").ok();
    writeln!(sql, "DELETE FROM \"BeerStyle\";").ok();
    writeln!(sql).ok();
    writeln!(sql, "-- Insert all BJCP beer styles").ok();
    writeln!(sql).ok();

    for (i, style) in styles.iter().enumerate() {
        render_insert(&mut sql, style);
        writeln!(sql).ok();

        if (i + 1) % 10 == 0 {
            info!(
                processed = i + 1,
                total = styles.len(),
                "generate-script: styles rendered"
            );
        }
    }

    writeln!(sql, "-- Create indexes for optimal query performance").ok();
    writeln!(
        sql,
        "CREATE INDEX IF NOT EXISTS \"IX_BeerStyle_BJCPNumber\" ON \"BeerStyle\"(\"BJCPNumber\");"
    )
    .ok();
    writeln!(
        sql,
        "CREATE INDEX IF NOT EXISTS \"IX_BeerStyle_Category\" ON \"BeerStyle\"(\"Category\");"
    )
    .ok();
    writeln!(
        sql,
        "CREATE INDEX IF NOT EXISTS \"IX_BeerStyle_StyleName\" ON \"BeerStyle\"(\"StyleName\");"
    )
    .ok();
    writeln!(sql).ok();
    writeln!(sql, "COMMIT;").ok();
    writeln!(sql).ok();
    writeln!(
        sql,
        "-- Migration completed: {} BJCP beer styles imported successfully",
        styles.len()
    )
    .ok();

    sql
}

fn render_insert(sql: &mut String, style: &StyleRecord) {
    writeln!(sql, "INSERT INTO \"BeerStyle\" (").ok();
    writeln!(
        sql,
        "    \"StyleId\", \"BJCPNumber\", \"StyleName\", \"Category\", \"Description\","
    )
    .ok();
    writeln!(
        sql,
        "    \"ABVMin\", \"ABVMax\", \"IBUMin\", \"IBUMax\", \"SRMMin\", \"SRMMax\","
    )
    .ok();
    writeln!(sql, "    \"OGMin\", \"OGMax\", \"FGMin\", \"FGMax\",").ok();
    writeln!(
        sql,
        "    \"Appearance\", \"Aroma\", \"Flavor\", \"Mouthfeel\", \"Comments\","
    )
    .ok();
    writeln!(
        sql,
        "    \"History\", \"CharacteristicIngredients\", \"StyleComparison\", \"CommercialExamples\","
    )
    .ok();
    writeln!(sql, "    \"Created\", \"Updated\"").ok();
    writeln!(sql, ") VALUES (").ok();
    writeln!(sql, "    gen_random_uuid(),").ok();
    writeln!(sql, "    {},", sql_string(style.bjcp_number.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.name.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.category.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.overall_impression.as_deref())).ok();
    writeln!(
        sql,
        "    {}, {}, {}, {}, {}, {},",
        sql_decimal(style.abv.minimum.as_ref()),
        sql_decimal(style.abv.maximum.as_ref()),
        sql_int(style.ibu.minimum),
        sql_int(style.ibu.maximum),
        sql_int(style.srm.minimum),
        sql_int(style.srm.maximum)
    )
    .ok();
    writeln!(
        sql,
        "    {}, {}, {}, {},",
        sql_decimal(style.og.minimum.as_ref()),
        sql_decimal(style.og.maximum.as_ref()),
        sql_decimal(style.fg.minimum.as_ref()),
        sql_decimal(style.fg.maximum.as_ref())
    )
    .ok();
    writeln!(sql, "    {},", sql_string(style.appearance.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.aroma.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.flavor.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.mouthfeel.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.comments.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.history.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.ingredients.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.style_comparison.as_deref())).ok();
    writeln!(sql, "    {},", sql_string(style.examples.as_deref())).ok();
    writeln!(sql, "    CURRENT_TIMESTAMP,").ok();
    writeln!(sql, "    CURRENT_TIMESTAMP").ok();
    writeln!(sql, ");").ok();
}

/// Generate the migration script from `cfg.input` and write it to
/// `cfg.output`. The file is only written after the full text exists.
pub fn run(cfg: &GenerateConfig) -> Result<()> {
    if !cfg.input.exists() {
        bail!("BJCP JSON file not found at {}", cfg.input.display());
    }

    let styles = flat::load(&cfg.input)?;
    info!(count = styles.len(), "generate-script: styles loaded");

    let source = source_label(&cfg.input);
    let sql = render(&styles, Utc::now(), source);

    if let Some(parent) = cfg.output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    fs::write(&cfg.output, &sql)
        .with_context(|| format!("writing migration script to {}", cfg.output.display()))?;

    info!(
        output = %cfg.output.display(),
        styles = styles.len(),
        bytes = sql.len(),
        "generate-script: migration written"
    );
    Ok(())
}

fn source_label(input: &Path) -> &str {
    input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("bjcp-data.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Range;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn sample_style() -> StyleRecord {
        StyleRecord {
            bjcp_number: Some("21A".into()),
            name: Some("American IPA".into()),
            category: Some("IPA".into()),
            overall_impression: Some("A decidedly hoppy beer from O'Fallon's heyday.".into()),
            abv: Range {
                minimum: Some(BigDecimal::from_str("5.50").unwrap()),
                maximum: Some(BigDecimal::from_str("7.50").unwrap()),
            },
            ibu: Range {
                minimum: Some(40),
                maximum: Some(70),
            },
            ..StyleRecord::default()
        }
    }

    #[test]
    fn quotes_and_escapes_strings() {
        assert_eq!(sql_string(Some("O'Hara's")), "'O''Hara''s'");
        assert_eq!(sql_string(Some("")), "NULL");
        assert_eq!(sql_string(None), "NULL");
    }

    #[test]
    fn renders_numbers_unquoted_and_missing_values_as_null() {
        let at = Utc.with_ymd_and_hms(2025, 1, 27, 0, 0, 0).unwrap();
        let sql = render(&[sample_style()], at, "bjcp-data.json");

        assert!(sql.contains("-- Date: 2025-01-27"));
        assert!(sql.contains("BEGIN;"));
        assert!(sql.contains("DELETE FROM \"BeerStyle\";"));
        assert!(sql.contains("    5.50, 7.50, 40, 70, NULL, NULL,"));
        assert!(sql.contains("'A decidedly hoppy beer from O''Fallon''s heyday.'"));
        assert!(sql.contains("CREATE INDEX IF NOT EXISTS \"IX_BeerStyle_StyleName\""));
        assert!(sql.ends_with("-- Migration completed: 1 BJCP beer styles imported successfully\n"));
    }

    #[test]
    fn identical_input_and_timestamp_render_identically() {
        let styles = vec![sample_style(), StyleRecord::default()];
        let at = Utc.with_ymd_and_hms(2025, 1, 27, 12, 30, 0).unwrap();
        assert_eq!(
            render(&styles, at, "bjcp-data.json"),
            render(&styles, at, "bjcp-data.json")
        );
    }
}
