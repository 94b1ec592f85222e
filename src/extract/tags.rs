//! Tag splitting and keyword-bucket classification.

/// Semantic bucket for a style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    Strength,
    Color,
    Fermentation,
    Origin,
    FlavorProfile,
    StyleType,
    Other,
}

impl TagCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TagCategory::Strength => "strength",
            TagCategory::Color => "color",
            TagCategory::Fermentation => "fermentation",
            TagCategory::Origin => "origin",
            TagCategory::FlavorProfile => "flavor-profile",
            TagCategory::StyleType => "style-type",
            TagCategory::Other => "other",
        }
    }
}

/// Split a comma-separated tags field into trimmed, non-empty labels.
pub fn split(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// Bucket keyword tables. Order matters: the first matching bucket wins.
const STRENGTH: &[&str] = &["session", "standard", "high", "very-high"];
const COLOR: &[&str] = &["pale", "amber", "dark", "black", "color"];
const FERMENTATION: &[&str] = &["bottom-fermented", "top-fermented", "lagered", "ale", "lager"];
const ORIGIN: &[&str] = &["north-america", "europe", "british", "german", "belgian"];
const FLAVOR_PROFILE: &[&str] = &["hoppy", "malty", "bitter", "sweet", "roasty", "fruity"];
const STYLE_TYPE: &[&str] = &["traditional", "specialty", "historical"];

/// Classify a tag by substring membership against the fixed keyword sets.
pub fn categorize(tag: &str) -> TagCategory {
    let lower = tag.to_lowercase();
    let hit = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if hit(STRENGTH) {
        TagCategory::Strength
    } else if hit(COLOR) {
        TagCategory::Color
    } else if hit(FERMENTATION) {
        TagCategory::Fermentation
    } else if hit(ORIGIN) {
        TagCategory::Origin
    } else if hit(FLAVOR_PROFILE) {
        TagCategory::FlavorProfile
    } else if hit(STYLE_TYPE) {
        TagCategory::StyleType
    } else {
        TagCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_tag_lists() {
        assert_eq!(split("Hoppy, Strong, "), vec!["Hoppy", "Strong"]);
        assert_eq!(split(""), Vec::<String>::new());
        assert_eq!(split(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn classifies_by_keyword() {
        assert_eq!(categorize("lager"), TagCategory::Fermentation);
        assert_eq!(categorize("Pale-Color"), TagCategory::Color);
        assert_eq!(categorize("belgian"), TagCategory::Origin);
        assert_eq!(categorize("hoppy"), TagCategory::FlavorProfile);
        assert_eq!(categorize("historical-style"), TagCategory::StyleType);
        assert_eq!(categorize("wheat-beer"), TagCategory::Other);
    }

    #[test]
    fn earlier_buckets_win() {
        // "session" (strength) outranks "ale" (fermentation)
        assert_eq!(categorize("session-ale"), TagCategory::Strength);
        // "dark" (color) outranks "lager" (fermentation)
        assert_eq!(categorize("dark-lager"), TagCategory::Color);
    }
}
