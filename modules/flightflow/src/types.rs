use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Flights
// =============================================================================

/// One end of a flight leg. `time` is local wall-clock time, "HH:MM".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlightEndpoint {
    /// IATA airport code, e.g. "JFK"
    pub airport: String,
    pub city: String,
    /// Local time, "HH:MM" (24h)
    pub time: String,
    /// Local date, "YYYY-MM-DD"
    pub date: String,
}

impl FlightEndpoint {
    /// Hour of the local time, or `None` when `time` isn't "HH:MM".
    pub fn hour(&self) -> Option<u32> {
        let (hour, _) = self.time.trim().split_once(':')?;
        hour.parse::<u32>().ok().filter(|h| *h < 24)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    /// Human-readable duration, e.g. "5h 45m"
    pub duration: String,
    pub price: f64,
    pub stops: u32,
    pub aircraft: String,
}

impl FlightRecord {
    pub fn departure_hour(&self) -> Option<u32> {
        self.departure.hour()
    }

    pub fn is_direct(&self) -> bool {
        self.stops == 0
    }

    pub fn stops_label(&self) -> String {
        match self.stops {
            0 => "Direct".to_string(),
            1 => "1 stop".to_string(),
            n => format!("{n} stops"),
        }
    }

    pub fn route_label(&self) -> String {
        format!("{} → {}", self.departure.city, self.arrival.city)
    }
}

impl fmt::Display for FlightRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} | {} | {} - {} | {} | {} | ${}",
            self.airline,
            self.flight_number,
            self.route_label(),
            self.departure.time,
            self.arrival.time,
            self.duration,
            self.stops_label(),
            self.price
        )
    }
}

// =============================================================================
// Search Parameters
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    Economy,
    Premium,
    Business,
    First,
}

impl CabinClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Premium => "premium",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial search criteria. Every field is optional; unset means "no opinion".
///
/// Field names on the wire match the search form: `from`, `to`, `departure`,
/// `return`, `passengers`, `class`, `preferences`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchParameters {
    /// Origin city
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Destination city
    #[serde(rename = "to", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Departure date, "YYYY-MM-DD"
    #[serde(rename = "departure", default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    /// Return date, "YYYY-MM-DD"
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    /// Number of passengers (at least 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub cabin_class: Option<CabinClass>,
    /// Free-form preference tags, e.g. "window seat"
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    #[schemars(with = "Option<Vec<String>>")]
    pub preferences: Vec<String>,
}

/// Models send `null` for "no preferences"; treat it like a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchParameters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow field-wise override: every field set in `other` replaces ours.
    pub fn merge(&mut self, other: &SearchParameters) {
        if other.origin.is_some() {
            self.origin = other.origin.clone();
        }
        if other.destination.is_some() {
            self.destination = other.destination.clone();
        }
        if other.departure_date.is_some() {
            self.departure_date = other.departure_date.clone();
        }
        if other.return_date.is_some() {
            self.return_date = other.return_date.clone();
        }
        if other.passengers.is_some() {
            self.passengers = other.passengers;
        }
        if other.cabin_class.is_some() {
            self.cabin_class = other.cabin_class;
        }
        if !other.preferences.is_empty() {
            self.preferences = other.preferences.clone();
        }
    }

    /// Drop values that can't describe a search: blank strings and a zero
    /// passenger count.
    pub(crate) fn normalized(mut self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        self.origin = clean(self.origin);
        self.destination = clean(self.destination);
        self.departure_date = clean(self.departure_date);
        self.return_date = clean(self.return_date);
        self.passengers = self.passengers.filter(|n| *n >= 1);
        self.preferences.retain(|p| !p.trim().is_empty());
        self
    }
}

// =============================================================================
// Trips
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Upcoming,
    Completed,
    Cancelled,
}

/// A booked itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub status: TripStatus,
    pub flights: Vec<FlightRecord>,
    pub passengers: u32,
    pub total_price: f64,
    pub booking_ref: String,
    /// Travel date, "YYYY-MM-DD"
    pub date: String,
}

impl Trip {
    pub fn route_label(&self) -> String {
        match (self.flights.first(), self.flights.last()) {
            (Some(first), Some(last)) => {
                format!("{} → {}", first.departure.city, last.arrival.city)
            }
            _ => String::new(),
        }
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            TripStatus::Upcoming => "upcoming",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        };
        write!(
            f,
            "{} | {} | {} | {} | {} passenger{} | ${}",
            self.booking_ref,
            self.date,
            self.route_label(),
            status,
            self.passengers,
            if self.passengers == 1 { "" } else { "s" },
            self.total_price
        )
    }
}

// =============================================================================
// Interpretation Result
// =============================================================================

/// What the assistant decided an utterance means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InterpretationResult {
    /// Reusable criteria for the caller to re-run its search with.
    GeneralSearch {
        parameters: SearchParameters,
        message: String,
    },
    /// A literal subset of the catalog, in catalog order.
    SpecificFilter {
        flights: Vec<FlightRecord>,
        message: String,
    },
}

impl InterpretationResult {
    pub fn message(&self) -> &str {
        match self {
            InterpretationResult::GeneralSearch { message, .. } => message,
            InterpretationResult::SpecificFilter { message, .. } => message,
        }
    }

    pub fn is_specific(&self) -> bool {
        matches!(self, InterpretationResult::SpecificFilter { .. })
    }

    /// Filtered flights, or an empty slice for a general search.
    pub fn flights(&self) -> &[FlightRecord] {
        match self {
            InterpretationResult::SpecificFilter { flights, .. } => flights,
            InterpretationResult::GeneralSearch { .. } => &[],
        }
    }

    pub fn parameters(&self) -> Option<&SearchParameters> {
        match self {
            InterpretationResult::GeneralSearch { parameters, .. } => Some(parameters),
            InterpretationResult::SpecificFilter { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departure_hour_parses_hh_mm() {
        let endpoint = FlightEndpoint {
            airport: "JFK".into(),
            city: "New York".into(),
            time: "06:00".into(),
            date: "2025-01-15".into(),
        };
        assert_eq!(endpoint.hour(), Some(6));
    }

    #[test]
    fn departure_hour_rejects_garbage() {
        let mut endpoint = FlightEndpoint {
            airport: "JFK".into(),
            city: "New York".into(),
            time: "noon".into(),
            date: "2025-01-15".into(),
        };
        assert_eq!(endpoint.hour(), None);
        endpoint.time = "25:10".into();
        assert_eq!(endpoint.hour(), None);
    }

    #[test]
    fn merge_overrides_only_set_fields() {
        let mut form = SearchParameters {
            origin: Some("New York".into()),
            destination: Some("Los Angeles".into()),
            passengers: Some(2),
            cabin_class: Some(CabinClass::Economy),
            ..Default::default()
        };
        let update = SearchParameters {
            destination: Some("Tokyo".into()),
            cabin_class: Some(CabinClass::Business),
            ..Default::default()
        };

        form.merge(&update);

        assert_eq!(form.origin.as_deref(), Some("New York"));
        assert_eq!(form.destination.as_deref(), Some("Tokyo"));
        assert_eq!(form.passengers, Some(2));
        assert_eq!(form.cabin_class, Some(CabinClass::Business));
    }

    #[test]
    fn search_parameters_use_form_field_names() {
        let params: SearchParameters = serde_json::from_str(
            r#"{"from": "Paris", "to": "Tokyo", "return": "2025-02-01", "class": "first", "passengers": 2}"#,
        )
        .unwrap();
        assert_eq!(params.origin.as_deref(), Some("Paris"));
        assert_eq!(params.destination.as_deref(), Some("Tokyo"));
        assert_eq!(params.return_date.as_deref(), Some("2025-02-01"));
        assert_eq!(params.cabin_class, Some(CabinClass::First));
        assert_eq!(params.passengers, Some(2));
    }

    #[test]
    fn null_preferences_read_as_empty() {
        let params: SearchParameters =
            serde_json::from_str(r#"{"from": "Paris", "preferences": null}"#).unwrap();
        assert_eq!(params.origin.as_deref(), Some("Paris"));
        assert!(params.preferences.is_empty());

        let params: SearchParameters =
            serde_json::from_str(r#"{"preferences": ["aisle"]}"#).unwrap();
        assert_eq!(params.preferences, vec!["aisle".to_string()]);
    }

    #[test]
    fn normalized_drops_blank_and_zero_values() {
        let params = SearchParameters {
            origin: Some("  ".into()),
            destination: Some(" Tokyo ".into()),
            passengers: Some(0),
            preferences: vec!["".into(), "aisle".into()],
            ..Default::default()
        }
        .normalized();
        assert_eq!(params.origin, None);
        assert_eq!(params.destination.as_deref(), Some("Tokyo"));
        assert_eq!(params.passengers, None);
        assert_eq!(params.preferences, vec!["aisle".to_string()]);
    }

    #[test]
    fn stops_label_matches_card_copy() {
        let mut flight = crate::catalog::seed_flights().remove(0);
        assert_eq!(flight.stops_label(), "Direct");
        flight.stops = 1;
        assert_eq!(flight.stops_label(), "1 stop");
        flight.stops = 2;
        assert_eq!(flight.stops_label(), "2 stops");
    }
}
