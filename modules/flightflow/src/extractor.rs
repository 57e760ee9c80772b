//! Offline search-parameter extraction.
//!
//! Pattern matching only: "from <city>", "to <city>" and a cabin keyword.
//! Anything it can't find is left unset.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CabinClass, SearchParameters};

static RE_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfrom\s+([a-z][a-z\s]*)").unwrap());
static RE_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bto\s+([a-z][a-z\s]*)").unwrap());

/// Words that end a city name. A city runs from the word after "from"/"to"
/// up to the first of these, a non-letter, or the end of the utterance.
const PLACE_TERMINATORS: &[&str] = &[
    "to", "from", "in", "on", "for", "with", "at", "by", "via", "and", "or", "under", "around",
    "next", "this", "tomorrow", "today", "tonight", "departing", "leaving", "returning",
    "economy", "premium", "business", "first", "class", "flight", "flights", "please",
];

fn place_after(re: &Regex, utterance: &str) -> Option<String> {
    let run = re.captures(utterance)?.get(1)?.as_str();

    let words: Vec<&str> = run
        .split_whitespace()
        .take_while(|word| !PLACE_TERMINATORS.contains(&word.to_lowercase().as_str()))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn cabin_class(utterance: &str) -> Option<CabinClass> {
    let text = utterance.to_lowercase();
    if text.contains("business") {
        Some(CabinClass::Business)
    } else if text.contains("first") {
        Some(CabinClass::First)
    } else if text.contains("premium") {
        Some(CabinClass::Premium)
    } else {
        None
    }
}

/// Pull origin, destination and cabin class out of free text.
pub fn extract(utterance: &str) -> SearchParameters {
    SearchParameters {
        origin: place_after(&RE_FROM, utterance),
        destination: place_after(&RE_TO, utterance),
        cabin_class: cabin_class(utterance),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_destination_and_business() {
        let params = extract("Find flights from New York to Los Angeles in business class");
        assert_eq!(params.origin.as_deref(), Some("New York"));
        assert_eq!(params.destination.as_deref(), Some("Los Angeles"));
        assert_eq!(params.cabin_class, Some(CabinClass::Business));
        assert_eq!(params.departure_date, None);
        assert_eq!(params.passengers, None);
    }

    #[test]
    fn single_word_cities_at_end() {
        let params = extract("flights from Paris to Tokyo");
        assert_eq!(params.origin.as_deref(), Some("Paris"));
        assert_eq!(params.destination.as_deref(), Some("Tokyo"));
        assert_eq!(params.cabin_class, None);
    }

    #[test]
    fn destination_stops_at_punctuation() {
        let params = extract("Fly me to Rome, please");
        assert_eq!(params.origin, None);
        assert_eq!(params.destination.as_deref(), Some("Rome"));
    }

    #[test]
    fn to_inside_a_word_is_not_a_destination() {
        let params = extract("Tokyo trips");
        assert_eq!(params.destination, None);
    }

    #[test]
    fn first_to_wins_even_before_from() {
        let params = extract("I want to fly from Paris to Tokyo");
        assert_eq!(params.origin.as_deref(), Some("Paris"));
        assert_eq!(params.destination.as_deref(), Some("fly"));
    }

    #[test]
    fn connector_words_end_a_place_name() {
        assert_eq!(
            extract("flights to Trinidad and Tobago").destination.as_deref(),
            Some("Trinidad")
        );
        assert_eq!(
            extract("from Stoke on Trent").origin.as_deref(),
            Some("Stoke")
        );
    }

    #[test]
    fn cabin_priority_is_business_then_first_then_premium() {
        assert_eq!(
            extract("first or business?").cabin_class,
            Some(CabinClass::Business)
        );
        assert_eq!(
            extract("premium, or first if cheap").cabin_class,
            Some(CabinClass::First)
        );
        assert_eq!(extract("premium seats").cabin_class, Some(CabinClass::Premium));
    }

    #[test]
    fn nothing_recognised_leaves_everything_unset() {
        assert!(extract("hello there").is_empty());
        assert!(extract("").is_empty());
    }
}
