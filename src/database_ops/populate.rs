//! Direct-execution pipeline: BeerJSON in, normalized BJCP tables out.
//!
//! The whole run is one transaction. Dependent tables are cleared first
//! (each delete under a savepoint so a missing table stays non-fatal on a
//! first run), then categories, tags, styles, and the per-style dependents
//! are inserted in dependency order. Any failure rolls the lot back.

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::json;
use sqlx::{Acquire, Postgres, Transaction};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database_ops::db::Db;
use crate::extract::{examples, keywords, tags};
use crate::input::beerjson;
use crate::model::StyleRecord;

/// Dependent tables cleared before repopulation, reverse dependency order.
const CLEAR_TABLES: &[&str] = &[
    "BJCP_StyleTagMapping",
    "BJCP_StyleCharacteristics",
    "BJCP_CommercialExample",
    "BJCP_StyleComparison",
    "BJCP_StyleRecommendation",
    "BJCP_RecipeStyleMatch",
    "BJCP_StyleJudging",
    "BJCP_RecipeCompetitionEntry",
    "BJCP_StylePopularity",
    "BJCP_StyleAnalytics",
    "BJCP_StyleTag",
    "BJCP_BeerCategory",
];

/// Characteristic columns broken out per style, in insertion order.
const CHARACTERISTIC_TYPES: [&str; 4] = ["aroma", "appearance", "flavor", "mouthfeel"];

/// Row counts written by a populate run, per entity type.
#[derive(Debug, Default, Clone)]
pub struct PopulateSummary {
    pub categories: usize,
    pub tags: usize,
    pub styles: usize,
    pub tag_mappings: usize,
    pub characteristics: usize,
    pub commercial_examples: usize,
    pub judging_rows: usize,
}

#[derive(Debug, Clone)]
pub struct PopulateConfig {
    /// BeerJSON document to import.
    pub input: PathBuf,
    /// Postgres connection string.
    pub database_url: String,
    /// Max pool connections (the run itself uses one).
    pub max_connections: u32,
}

/// Run the full populate pipeline described by `cfg`. The input document is
/// read before any connection is opened; the database work commits once
/// after every step, and any error rolls the whole run back.
pub async fn run(cfg: &PopulateConfig) -> Result<PopulateSummary> {
    if !cfg.input.exists() {
        bail!("BJCP JSON file not found at {}", cfg.input.display());
    }

    let styles = beerjson::load(&cfg.input)?;
    info!(count = styles.len(), "populate: processing beer styles");

    let db = Db::connect(&cfg.database_url, cfg.max_connections).await?;
    let mut tx = db.pool.begin().await?;

    clear_dependents(&mut tx).await?;
    let category_ids = insert_categories(&mut tx, &styles).await?;
    let tag_ids = insert_tags(&mut tx, &styles).await?;
    let style_ids = insert_styles(&mut tx, &styles, &category_ids).await?;

    let summary = PopulateSummary {
        categories: category_ids.len(),
        tags: tag_ids.len(),
        styles: styles.len(),
        tag_mappings: insert_tag_mappings(&mut tx, &styles, &style_ids, &tag_ids).await?,
        characteristics: insert_characteristics(&mut tx, &styles, &style_ids).await?,
        commercial_examples: insert_commercial_examples(&mut tx, &styles, &style_ids).await?,
        judging_rows: insert_judging(&mut tx, &styles, &style_ids).await?,
    };

    tx.commit().await?;

    info!(
        categories = summary.categories,
        tags = summary.tags,
        styles = summary.styles,
        tag_mappings = summary.tag_mappings,
        characteristics = summary.characteristics,
        commercial_examples = summary.commercial_examples,
        judging_rows = summary.judging_rows,
        "populate: all BJCP tables populated"
    );
    Ok(summary)
}

/// Clear every dependent table. Each delete runs in a nested transaction
/// (a savepoint), so a missing table on a first run is non-fatal and the
/// surrounding transaction stays usable.
async fn clear_dependents(tx: &mut Transaction<'_, Postgres>) -> Result<()> {
    for table in CLEAR_TABLES {
        let mut savepoint = tx.begin().await?;
        let stmt = format!("DELETE FROM \"{table}\"");
        match sqlx::query(&stmt).execute(&mut *savepoint).await {
            Ok(done) => {
                savepoint.commit().await?;
                debug!(table, rows = done.rows_affected(), "populate: cleared table");
            }
            Err(err) => {
                savepoint.rollback().await?;
                warn!(table, error = %err, "populate: could not clear table");
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct Category {
    id: Uuid,
    name: String,
    description: Option<String>,
}

/// First-seen category per category number, keyed by number.
fn collect_categories(styles: &[StyleRecord]) -> IndexMap<String, Category> {
    let mut categories: IndexMap<String, Category> = IndexMap::new();
    for style in styles {
        let (Some(number), Some(name)) = (style.category_id.as_ref(), style.category.as_ref())
        else {
            continue;
        };
        categories.entry(number.clone()).or_insert_with(|| Category {
            id: Uuid::new_v4(),
            name: name.clone(),
            description: style.category_description.clone(),
        });
    }
    categories
}

/// Sort key for category numbers: numeric order first, unrecognized
/// numbers next, the reserved "X" (specialty/uncategorized) bucket last.
fn category_sort_key(number: &str) -> i64 {
    if number == "X" {
        return 999;
    }
    number.parse::<i64>().unwrap_or(998)
}

async fn insert_categories(
    tx: &mut Transaction<'_, Postgres>,
    styles: &[StyleRecord],
) -> Result<HashMap<String, Uuid>> {
    let mut ordered: Vec<(String, Category)> = collect_categories(styles).into_iter().collect();
    ordered.sort_by_key(|(number, _)| category_sort_key(number));

    let mut ids = HashMap::new();
    for (i, (number, category)) in ordered.into_iter().enumerate() {
        sqlx::query(
            r#"INSERT INTO "BJCP_BeerCategory"
               ("CategoryId", "CategoryNumber", "CategoryName", "Description", "SortOrder")
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(category.id)
        .bind(&number)
        .bind(&category.name)
        .bind(&category.description)
        .bind((i + 1) as i32)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("inserting category {number}"))?;
        ids.insert(number, category.id);
    }
    info!(count = ids.len(), "populate: categories inserted");
    Ok(ids)
}

async fn insert_tags(
    tx: &mut Transaction<'_, Postgres>,
    styles: &[StyleRecord],
) -> Result<HashMap<String, Uuid>> {
    let all_tags: HashSet<String> = styles
        .iter()
        .filter_map(|s| s.tags.as_deref())
        .flat_map(tags::split)
        .collect();

    let mut ids = HashMap::new();
    for (i, tag) in all_tags.into_iter().sorted().enumerate() {
        let id = Uuid::new_v4();
        let category = tags::categorize(&tag);
        sqlx::query(
            r#"INSERT INTO "BJCP_StyleTag" ("TagId", "TagName", "Category", "SortOrder")
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(id)
        .bind(&tag)
        .bind(category.as_str())
        .bind((i + 1) as i32)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("inserting tag {tag}"))?;
        ids.insert(tag, id);
    }
    info!(count = ids.len(), "populate: tags inserted");
    Ok(ids)
}

async fn insert_styles(
    tx: &mut Transaction<'_, Postgres>,
    styles: &[StyleRecord],
    category_ids: &HashMap<String, Uuid>,
) -> Result<HashMap<String, Uuid>> {
    let mut ids = HashMap::new();
    for style in styles {
        let style_id = Uuid::new_v4();
        let category_id = style
            .category_id
            .as_ref()
            .and_then(|number| category_ids.get(number))
            .copied();

        sqlx::query(
            r#"INSERT INTO "BeerStyle" (
                "StyleId", "BJCPNumber", "StyleName", "Category", "CategoryId", "Description",
                "ABVMin", "ABVMax", "IBUMin", "IBUMax", "SRMMin", "SRMMax",
                "OGMin", "OGMax", "FGMin", "FGMax",
                "Appearance", "Aroma", "Flavor", "Mouthfeel", "Comments",
                "History", "CharacteristicIngredients", "StyleComparison",
                "CommercialExamples", "Created", "Updated"
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16,
                $17, $18, $19, $20, $21,
                $22, $23, $24,
                $25, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
            )"#,
        )
        .bind(style_id)
        .bind(&style.bjcp_number)
        .bind(&style.name)
        .bind(&style.category)
        .bind(category_id)
        .bind(&style.overall_impression)
        .bind(&style.abv.minimum)
        .bind(&style.abv.maximum)
        .bind(style.ibu.minimum)
        .bind(style.ibu.maximum)
        .bind(style.srm.minimum)
        .bind(style.srm.maximum)
        .bind(&style.og.minimum)
        .bind(&style.og.maximum)
        .bind(&style.fg.minimum)
        .bind(&style.fg.maximum)
        .bind(&style.appearance)
        .bind(&style.aroma)
        .bind(&style.flavor)
        .bind(&style.mouthfeel)
        .bind(&style.comments)
        .bind(&style.history)
        .bind(&style.ingredients)
        .bind(&style.style_comparison)
        .bind(&style.examples)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("inserting style {:?}", style.name))?;

        if let Some(number) = &style.bjcp_number {
            ids.insert(number.clone(), style_id);
        }

        // Exploratory only: the comparison scan never produces rows, but a
        // count is useful when eyeballing how much signal the prose has.
        if let Some(comparison) = &style.style_comparison {
            let hits = keywords::comparisons(comparison);
            if !hits.is_empty() {
                debug!(
                    style = style.name.as_deref().unwrap_or("(unnamed)"),
                    hits = hits.len(),
                    "populate: comparison phrases detected"
                );
            }
        }
    }
    info!(count = ids.len(), "populate: styles inserted");
    Ok(ids)
}

fn style_uuid<'a>(
    style_ids: &'a HashMap<String, Uuid>,
    style: &StyleRecord,
) -> Option<&'a Uuid> {
    style_ids.get(style.bjcp_number.as_deref()?)
}

async fn insert_tag_mappings(
    tx: &mut Transaction<'_, Postgres>,
    styles: &[StyleRecord],
    style_ids: &HashMap<String, Uuid>,
    tag_ids: &HashMap<String, Uuid>,
) -> Result<usize> {
    let mut count = 0usize;
    for style in styles {
        let Some(style_id) = style_uuid(style_ids, style) else {
            continue;
        };
        let Some(raw_tags) = style.tags.as_deref() else {
            continue;
        };
        for tag in tags::split(raw_tags) {
            let Some(tag_id) = tag_ids.get(&tag) else {
                continue;
            };
            sqlx::query(
                r#"INSERT INTO "BJCP_StyleTagMapping" ("StyleId", "TagId") VALUES ($1, $2)"#,
            )
            .bind(style_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("mapping tag {tag}"))?;
            count += 1;
        }
    }
    info!(count, "populate: style-tag mappings inserted");
    Ok(count)
}

async fn insert_characteristics(
    tx: &mut Transaction<'_, Postgres>,
    styles: &[StyleRecord],
    style_ids: &HashMap<String, Uuid>,
) -> Result<usize> {
    let mut count = 0usize;
    for style in styles {
        let Some(style_id) = style_uuid(style_ids, style) else {
            continue;
        };
        for characteristic in CHARACTERISTIC_TYPES {
            let description = match characteristic {
                "aroma" => style.aroma.as_deref(),
                "appearance" => style.appearance.as_deref(),
                "flavor" => style.flavor.as_deref(),
                _ => style.mouthfeel.as_deref(),
            };
            let Some(description) = description else {
                continue;
            };
            let kw = keywords::extract(description);
            sqlx::query(
                r#"INSERT INTO "BJCP_StyleCharacteristics"
                   ("StyleId", "CharacteristicType", "Description", "Keywords")
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(style_id)
            .bind(characteristic)
            .bind(description)
            .bind(&kw)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("inserting {characteristic} characteristics"))?;
            count += 1;
        }
    }
    info!(count, "populate: style characteristics inserted");
    Ok(count)
}

async fn insert_commercial_examples(
    tx: &mut Transaction<'_, Postgres>,
    styles: &[StyleRecord],
    style_ids: &HashMap<String, Uuid>,
) -> Result<usize> {
    let mut count = 0usize;
    for style in styles {
        let Some(style_id) = style_uuid(style_ids, style) else {
            continue;
        };
        let Some(raw) = style.examples.as_deref() else {
            continue;
        };
        for example in examples::split(raw) {
            let parsed = examples::split_brewery_beer(&example);
            sqlx::query(
                r#"INSERT INTO "BJCP_CommercialExample"
                   ("StyleId", "BeerName", "BreweryName", "Availability")
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(style_id)
            .bind(&parsed.beer)
            .bind(&parsed.brewery)
            .bind("unknown")
            .execute(&mut **tx)
            .await
            .with_context(|| format!("inserting commercial example {example}"))?;
            count += 1;
        }
    }
    info!(count, "populate: commercial examples inserted");
    Ok(count)
}

/// Sentences of the comments field mentioning "fault", any case.
fn fault_sentences(comments: &str) -> Vec<String> {
    if !comments.to_lowercase().contains("fault") {
        return Vec::new();
    }
    comments
        .split('.')
        .filter(|sentence| sentence.to_lowercase().contains("fault"))
        .map(|sentence| sentence.trim().to_string())
        .collect()
}

async fn insert_judging(
    tx: &mut Transaction<'_, Postgres>,
    styles: &[StyleRecord],
    style_ids: &HashMap<String, Uuid>,
) -> Result<usize> {
    // Fixed BJCP scoresheet weights (out of 50).
    let weights = json!({
        "aroma": 12,
        "appearance": 3,
        "flavor": 20,
        "mouthfeel": 5,
        "overall": 10
    });

    let mut count = 0usize;
    for style in styles {
        let Some(style_id) = style_uuid(style_ids, style) else {
            continue;
        };
        let criteria = json!({
            "scoring_system": "BJCP",
            "max_score": 50,
            "categories": weights,
            "description": format!(
                "BJCP 2021 judging criteria for {}",
                style.name.as_deref().unwrap_or_default()
            ),
        });
        let faults = fault_sentences(style.comments.as_deref().unwrap_or_default());

        sqlx::query(
            r#"INSERT INTO "BJCP_StyleJudging"
               ("StyleId", "JudgingCriteria", "CommonFaults", "ScoringWeights")
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(style_id)
        .bind(criteria.to_string())
        .bind(&faults)
        .bind(weights.to_string())
        .execute(&mut **tx)
        .await
        .with_context(|| format!("inserting judging criteria for {:?}", style.name))?;
        count += 1;
    }
    info!(count, "populate: judging criteria inserted");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(number: &str, category_id: &str, category: &str) -> StyleRecord {
        StyleRecord {
            bjcp_number: Some(number.to_string()),
            category_id: Some(category_id.to_string()),
            category: Some(category.to_string()),
            ..StyleRecord::default()
        }
    }

    #[test]
    fn uncategorized_sentinel_sorts_last() {
        assert!(category_sort_key("1") < category_sort_key("21"));
        assert!(category_sort_key("21") < category_sort_key("junk"));
        assert!(category_sort_key("junk") < category_sort_key("X"));
    }

    #[test]
    fn categories_deduplicate_by_number() {
        let styles = vec![
            style("1A", "1", "Standard American Beer"),
            style("1B", "1", "Standard American Beer"),
            style("21A", "21", "IPA"),
            StyleRecord::default(),
        ];
        let categories = collect_categories(&styles);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories["1"].name, "Standard American Beer");
        assert_eq!(categories["21"].name, "IPA");
    }

    #[test]
    fn fault_sentences_keep_only_matching_sentences() {
        let comments = "A clean lager. Diacetyl is a fault here. Serve cold. FAULTS are penalized";
        assert_eq!(
            fault_sentences(comments),
            vec!["Diacetyl is a fault here", "FAULTS are penalized"]
        );
        assert!(fault_sentences("No issues to speak of.").is_empty());
    }
}
