use serde::{Deserialize, Serialize};

use crate::types::{CabinClass, FlightRecord, SearchParameters};

/// The caller-held search criteria behind the main search form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchForm {
    pub from: String,
    pub to: String,
    pub departure: String,
    #[serde(rename = "return")]
    pub return_date: String,
    pub passengers: u32,
    #[serde(rename = "class")]
    pub cabin_class: CabinClass,
    pub preferences: Vec<String>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            departure: String::new(),
            return_date: String::new(),
            passengers: 1,
            cabin_class: CabinClass::Economy,
            preferences: Vec::new(),
        }
    }
}

impl SearchForm {
    /// Overlay extracted parameters; fields they leave unset keep their value.
    pub fn apply(&mut self, parameters: &SearchParameters) {
        if let Some(ref origin) = parameters.origin {
            self.from = origin.clone();
        }
        if let Some(ref destination) = parameters.destination {
            self.to = destination.clone();
        }
        if let Some(ref date) = parameters.departure_date {
            self.departure = date.clone();
        }
        if let Some(ref date) = parameters.return_date {
            self.return_date = date.clone();
        }
        if let Some(passengers) = parameters.passengers.filter(|n| *n >= 1) {
            self.passengers = passengers;
        }
        if let Some(class) = parameters.cabin_class {
            self.cabin_class = class;
        }
        if !parameters.preferences.is_empty() {
            self.preferences = parameters.preferences.clone();
        }
    }

    /// The form's contents as parameters, blank fields unset.
    pub fn parameters(&self) -> SearchParameters {
        fn set(value: &str) -> Option<String> {
            (!value.trim().is_empty()).then(|| value.to_string())
        }

        SearchParameters {
            origin: set(&self.from),
            destination: set(&self.to),
            departure_date: set(&self.departure),
            return_date: set(&self.return_date),
            passengers: Some(self.passengers),
            cabin_class: Some(self.cabin_class),
            preferences: self.preferences.clone(),
        }
    }

    /// Mock inventory: every search shows the whole catalog.
    pub fn search(&self, catalog: &[FlightRecord]) -> Vec<FlightRecord> {
        catalog.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_flights;

    #[test]
    fn defaults_match_an_empty_form() {
        let form = SearchForm::default();
        assert_eq!(form.passengers, 1);
        assert_eq!(form.cabin_class, CabinClass::Economy);
        assert!(form.from.is_empty());
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut form = SearchForm {
            departure: "2025-01-15".into(),
            passengers: 3,
            ..Default::default()
        };

        form.apply(&SearchParameters {
            origin: Some("Paris".into()),
            destination: Some("Tokyo".into()),
            cabin_class: Some(CabinClass::Business),
            ..Default::default()
        });

        assert_eq!(form.from, "Paris");
        assert_eq!(form.to, "Tokyo");
        assert_eq!(form.departure, "2025-01-15");
        assert_eq!(form.passengers, 3);
        assert_eq!(form.cabin_class, CabinClass::Business);
    }

    #[test]
    fn parameters_round_trip_through_apply() {
        let mut form = SearchForm::default();
        form.apply(&SearchParameters {
            origin: Some("New York".into()),
            passengers: Some(2),
            ..Default::default()
        });

        let params = form.parameters();
        assert_eq!(params.origin.as_deref(), Some("New York"));
        assert_eq!(params.destination, None);
        assert_eq!(params.passengers, Some(2));

        let mut copy = SearchForm::default();
        copy.apply(&params);
        assert_eq!(copy, form);
    }

    #[test]
    fn search_returns_the_catalog() {
        let catalog = seed_flights();
        assert_eq!(SearchForm::default().search(&catalog), catalog);
    }
}
