//! Commercial-example parsing.

/// A commercial example split into brewery and beer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommercialExample {
    pub brewery: Option<String>,
    pub beer: String,
}

/// Split the examples field on commas, trimming and dropping empties.
pub fn split(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split one example into brewery and beer name.
///
/// Everything before the last whitespace token is the brewery, the last
/// token the beer; a single token is a beer with no brewery. Known to
/// misfire on multi-word beer names ("Samuel Adams Boston Lager") and kept
/// that way on purpose: there is no reliable delimiter in the source text.
pub fn split_brewery_beer(example: &str) -> CommercialExample {
    let parts: Vec<&str> = example.split_whitespace().collect();
    if parts.len() > 1 {
        CommercialExample {
            brewery: Some(parts[..parts.len() - 1].join(" ")),
            beer: parts[parts.len() - 1].to_string(),
        }
    } else {
        CommercialExample {
            brewery: None,
            beer: example.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_example_lists() {
        assert_eq!(
            split("Pilsner Urquell, Heineken , "),
            vec!["Pilsner Urquell", "Heineken"]
        );
        assert_eq!(split(""), Vec::<String>::new());
    }

    #[test]
    fn last_token_becomes_the_beer_name() {
        let parsed = split_brewery_beer("Sierra Nevada Pale");
        assert_eq!(parsed.brewery.as_deref(), Some("Sierra Nevada"));
        assert_eq!(parsed.beer, "Pale");
    }

    #[test]
    fn single_token_has_no_brewery() {
        let parsed = split_brewery_beer("Heineken");
        assert_eq!(parsed.brewery, None);
        assert_eq!(parsed.beer, "Heineken");
    }

    #[test]
    fn multi_word_beer_names_misfire_as_documented() {
        let parsed = split_brewery_beer("Samuel Adams Boston Lager");
        assert_eq!(parsed.brewery.as_deref(), Some("Samuel Adams Boston"));
        assert_eq!(parsed.beer, "Lager");
    }
}
