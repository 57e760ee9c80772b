//! Offline keyword filter.
//!
//! Each keyword class in the utterance contributes one predicate; a flight is
//! kept when it satisfies all of them. An utterance with no recognised keyword
//! keeps everything.

use crate::types::FlightRecord;

/// Fares below this count as "cheap". There is no price parsing; "under $300"
/// uses the same threshold.
pub const CHEAP_PRICE_THRESHOLD: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeOfDay {
    /// [06:00, 12:00)
    Morning,
    /// [12:00, 18:00)
    Afternoon,
    /// [18:00, 06:00)
    Evening,
}

impl TimeOfDay {
    fn contains(&self, hour: u32) -> bool {
        match self {
            TimeOfDay::Morning => (6..12).contains(&hour),
            TimeOfDay::Afternoon => (12..18).contains(&hour),
            TimeOfDay::Evening => hour >= 18 || hour < 6,
        }
    }
}

/// The predicates an utterance implies.
#[derive(Debug, Clone, Default, PartialEq)]
struct KeywordCriteria {
    premium_cabin: bool,
    times: Vec<TimeOfDay>,
    cheap: bool,
    direct: bool,
}

impl KeywordCriteria {
    fn from_utterance(utterance: &str) -> Self {
        let text = utterance.to_lowercase();
        let has = |needle: &str| text.contains(needle);

        let mut times = Vec::new();
        if has("morning") {
            times.push(TimeOfDay::Morning);
        }
        if has("afternoon") {
            times.push(TimeOfDay::Afternoon);
        }
        if has("evening") || has("night") {
            times.push(TimeOfDay::Evening);
        }

        Self {
            // The catalog carries no premium fares, so asking for one matches nothing.
            premium_cabin: has("business") || has("first"),
            times,
            cheap: has("cheap") || has("under"),
            direct: has("direct") || has("non-stop"),
        }
    }

    fn matches(&self, flight: &FlightRecord) -> bool {
        if self.premium_cabin {
            return false;
        }

        if !self.times.is_empty() {
            let Some(hour) = flight.departure_hour() else {
                return false;
            };
            if !self.times.iter().all(|t| t.contains(hour)) {
                return false;
            }
        }

        if self.cheap && flight.price >= CHEAP_PRICE_THRESHOLD {
            return false;
        }

        if self.direct && !flight.is_direct() {
            return false;
        }

        true
    }
}

/// Keep the catalog entries matching every keyword predicate in `utterance`,
/// in catalog order.
pub fn filter(utterance: &str, catalog: &[FlightRecord]) -> Vec<FlightRecord> {
    let criteria = KeywordCriteria::from_utterance(utterance);
    catalog
        .iter()
        .filter(|flight| criteria.matches(flight))
        .cloned()
        .collect()
}
