pub mod assistant;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod interpreter;
pub mod keyword_filter;
pub mod recommendation;
pub mod search_form;
pub mod seat_map;
pub mod session;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use assistant::Assistant;
pub use config::Config;
pub use error::InterpretError;
pub use search_form::SearchForm;
pub use seat_map::{Seat, SeatError, SeatMap, SeatStatus};
pub use session::{ChatMessage, ChatRole, ChatSession, Turn};
pub use types::{
    CabinClass, FlightEndpoint, FlightRecord, InterpretationResult, SearchParameters, Trip,
    TripStatus,
};
