//! Keyword and comparison-phrase scans over descriptive prose.
//!
//! Both scans are approximate by design; they exist to seed search-ish
//! columns, not to parse English.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const MAX_KEYWORDS: usize = 10;

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[a-z]+(?:ly)?\b").expect("keyword pattern is valid"))
}

/// Up to 10 unique lowercase descriptive tokens longer than 3 characters,
/// in first-seen order.
pub fn extract(description: &str) -> Vec<String> {
    let lowered = description.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for hit in word_pattern().find_iter(&lowered) {
        let word = hit.as_str();
        if word.len() > 3 && seen.insert(word) {
            out.push(word.to_string());
            if out.len() == MAX_KEYWORDS {
                break;
            }
        }
    }
    out
}

/// One hit from the comparison-text scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonHit {
    /// Surrounding token window, joined with spaces.
    pub context: String,
    /// The keyword that triggered the hit, lowercased.
    pub relationship: String,
}

const COMPARISON_KEYWORDS: &[&str] =
    &["than", "like", "similar", "compared", "versus", "less", "more"];

/// Scan comparison prose for relationship keywords, capturing a small token
/// window around each interior hit. The output is not a structured
/// relationship and is never persisted.
pub fn comparisons(text: &str) -> Vec<ComparisonHit> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut hits = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if COMPARISON_KEYWORDS.contains(&lower.as_str()) && i > 0 && i + 1 < words.len() {
            let start = i.saturating_sub(3);
            let end = (i + 4).min(words.len());
            hits.push(ComparisonHit {
                context: words[start..end].join(" "),
                relationship: lower,
            });
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_unique_long_tokens_up_to_the_cap() {
        let kw = extract("Moderate grainy-sweet malt aroma with moderate malt");
        assert_eq!(kw, vec!["moderate", "grainy", "sweet", "malt", "aroma", "with"]);

        let many = "alpha bravo charlie delta echos foxtrot golfing hotels indigo juliet kilos limas";
        assert_eq!(extract(many).len(), MAX_KEYWORDS);
    }

    #[test]
    fn short_tokens_are_dropped() {
        assert_eq!(extract("a dry hop was big"), Vec::<String>::new());
    }

    #[test]
    fn finds_interior_comparison_keywords() {
        let hits = comparisons("Stronger and maltier than a standard pale ale");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].relationship, "than");
        assert_eq!(hits[0].context, "Stronger and maltier than a standard pale");
    }

    #[test]
    fn edge_positions_do_not_fire() {
        assert!(comparisons("than everything").is_empty());
        assert!(comparisons("it has more").is_empty());
        assert!(comparisons("").is_empty());
    }
}
