//! Built-in flight catalog and booked trips used by the terminal driver and
//! tests.
//!
//! Six JFK → LAX departures on 2025-01-15 spanning early morning to
//! evening, direct and one-stop, $189 to $329.

use crate::types::{FlightEndpoint, FlightRecord, Trip, TripStatus};

const DATE: &str = "2025-01-15";

#[allow(clippy::too_many_arguments)]
fn jfk_to_lax(
    id: &str,
    airline: &str,
    flight_number: &str,
    departs: &str,
    arrives: &str,
    duration: &str,
    price: f64,
    stops: u32,
    aircraft: &str,
) -> FlightRecord {
    FlightRecord {
        id: id.to_string(),
        airline: airline.to_string(),
        flight_number: flight_number.to_string(),
        departure: FlightEndpoint {
            airport: "JFK".to_string(),
            city: "New York".to_string(),
            time: departs.to_string(),
            date: DATE.to_string(),
        },
        arrival: FlightEndpoint {
            airport: "LAX".to_string(),
            city: "Los Angeles".to_string(),
            time: arrives.to_string(),
            date: DATE.to_string(),
        },
        duration: duration.to_string(),
        price,
        stops,
        aircraft: aircraft.to_string(),
    }
}

pub fn seed_flights() -> Vec<FlightRecord> {
    vec![
        jfk_to_lax("1", "American Airlines", "AA1234", "08:30", "12:15", "5h 45m", 299.0, 0, "Boeing 737"),
        jfk_to_lax("2", "Delta Air Lines", "DL5678", "14:20", "18:45", "6h 25m", 249.0, 1, "Airbus A320"),
        jfk_to_lax("3", "United Airlines", "UA9012", "19:15", "23:30", "6h 15m", 189.0, 0, "Boeing 777"),
        jfk_to_lax("4", "JetBlue Airways", "B61234", "06:00", "09:30", "5h 30m", 329.0, 0, "Airbus A321"),
        jfk_to_lax("5", "Southwest Airlines", "WN5678", "16:45", "22:10", "7h 25m", 199.0, 1, "Boeing 737"),
        jfk_to_lax("6", "Alaska Airlines", "AS9876", "11:30", "15:45", "6h 15m", 279.0, 0, "Boeing 737 MAX"),
    ]
}

pub fn find_flight<'a>(catalog: &'a [FlightRecord], id: &str) -> Option<&'a FlightRecord> {
    catalog
        .iter()
        .find(|f| f.id == id || f.flight_number.eq_ignore_ascii_case(id))
}

/// Two bookings on seed flights: an upcoming AA1234 for two and a completed
/// DL5678 for one.
pub fn seed_trips() -> Vec<Trip> {
    let flights = seed_flights();
    vec![
        Trip {
            id: "1".to_string(),
            status: TripStatus::Upcoming,
            flights: vec![flights[0].clone()],
            passengers: 2,
            total_price: 598.0,
            booking_ref: "ABC123".to_string(),
            date: "2025-01-15".to_string(),
        },
        Trip {
            id: "2".to_string(),
            status: TripStatus::Completed,
            flights: vec![flights[1].clone()],
            passengers: 1,
            total_price: 249.0,
            booking_ref: "XYZ789".to_string(),
            date: "2024-12-20".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique_and_ordered() {
        let ids: Vec<String> = seed_flights().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn seed_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(&seed_flights()[0]).unwrap();
        assert_eq!(json["flightNumber"], "AA1234");
        assert_eq!(json["departure"]["time"], "08:30");
        assert_eq!(json["stops"], 0);
    }

    #[test]
    fn find_flight_by_id_or_number() {
        let catalog = seed_flights();
        assert_eq!(find_flight(&catalog, "3").map(|f| f.flight_number.as_str()), Some("UA9012"));
        assert_eq!(find_flight(&catalog, "b61234").map(|f| f.id.as_str()), Some("4"));
        assert!(find_flight(&catalog, "7").is_none());
    }

    #[test]
    fn seed_trips_price_every_passenger() {
        let trips = seed_trips();
        assert_eq!(trips.len(), 2);
        for trip in &trips {
            let fares: f64 = trip.flights.iter().map(|f| f.price).sum();
            assert_eq!(trip.total_price, fares * trip.passengers as f64);
        }
        assert_eq!(trips[0].status, TripStatus::Upcoming);
        assert_eq!(trips[0].route_label(), "New York → Los Angeles");

        let json = serde_json::to_value(&trips[1]).unwrap();
        assert_eq!(json["bookingRef"], "XYZ789");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["totalPrice"], 249.0);
    }
}
