//! Cabin seat maps for the catalog's aircraft.
//!
//! A map is generated from the aircraft name: wide-body 777s get 42 rows in a
//! 3-3-3 layout, everything else 28 rows in 3-3. Occupancy comes from the
//! caller so maps can be reproduced.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::types::CabinClass;

/// Share of seats marked occupied by [`generate_random`].
pub const OCCUPIED_SHARE: f64 = 0.3;

const WIDE_BODY_LETTERS: [char; 9] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J'];
const NARROW_BODY_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Occupied,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seat {
    /// Row number followed by letter, e.g. "12A"
    pub id: String,
    pub row: u32,
    pub letter: char,
    #[serde(rename = "type")]
    pub cabin: CabinClass,
    pub status: SeatStatus,
    /// Surcharge on top of the fare
    pub price: f64,
    pub features: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SeatError {
    #[error("No seat {0} on this aircraft")]
    Unknown(String),

    #[error("Seat {id} is {status:?}")]
    Unavailable { id: String, status: SeatStatus },

    #[error("Seat {0} is not selected")]
    NotSelected(String),
}

/// Cabin band for a row: 1-3 first, 4-8 business, 9-12 premium, economy after.
pub fn cabin_for_row(row: u32) -> CabinClass {
    match row {
        0..=3 => CabinClass::First,
        4..=8 => CabinClass::Business,
        9..=12 => CabinClass::Premium,
        _ => CabinClass::Economy,
    }
}

pub fn surcharge(cabin: CabinClass) -> f64 {
    match cabin {
        CabinClass::First => 150.0,
        CabinClass::Business => 75.0,
        CabinClass::Premium => 35.0,
        CabinClass::Economy => 0.0,
    }
}

pub fn features(cabin: CabinClass) -> &'static [&'static str] {
    match cabin {
        CabinClass::First => &["Lie-flat", "Priority boarding"],
        CabinClass::Business => &["Extra legroom", "Priority boarding"],
        CabinClass::Premium => &["Extra legroom"],
        CabinClass::Economy => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub aircraft: String,
    pub rows: u32,
    pub seats_per_row: u32,
    /// Seats per block, e.g. "3-3-3"
    pub layout: String,
    /// Row-major: seat `(row, n)` lives at `(row - 1) * seats_per_row + n`.
    seats: Vec<Seat>,
    #[serde(skip)]
    letters: &'static [char],
}

impl SeatMap {
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        let letter = id.chars().last()?.to_ascii_uppercase();
        let row: u32 = id[..id.len() - letter.len_utf8()].parse().ok()?;
        if row == 0 || row > self.rows {
            return None;
        }
        let column = self.letters.iter().position(|l| *l == letter)?;
        Some((row as usize - 1) * self.seats_per_row as usize + column)
    }

    pub fn seat(&self, id: &str) -> Option<&Seat> {
        self.index_of(id).map(|i| &self.seats[i])
    }

    /// Available → selected.
    pub fn select(&mut self, id: &str) -> Result<&Seat, SeatError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| SeatError::Unknown(id.to_string()))?;
        let seat = &mut self.seats[index];
        if seat.status != SeatStatus::Available {
            return Err(SeatError::Unavailable {
                id: seat.id.clone(),
                status: seat.status,
            });
        }
        seat.status = SeatStatus::Selected;
        Ok(seat)
    }

    /// Selected → available.
    pub fn release(&mut self, id: &str) -> Result<&Seat, SeatError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| SeatError::Unknown(id.to_string()))?;
        let seat = &mut self.seats[index];
        if seat.status != SeatStatus::Selected {
            return Err(SeatError::NotSelected(seat.id.clone()));
        }
        seat.status = SeatStatus::Available;
        Ok(seat)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Seat> {
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::Selected)
    }

    /// Sum of surcharges for the selected seats.
    pub fn selected_surcharge(&self) -> f64 {
        self.selected().map(|s| s.price).sum()
    }

    pub fn count(&self, cabin: CabinClass, status: SeatStatus) -> usize {
        self.seats
            .iter()
            .filter(|s| s.cabin == cabin && s.status == status)
            .count()
    }
}

/// Build the map for `aircraft`, asking `occupied(row, letter)` for every seat.
pub fn generate(aircraft: &str, mut occupied: impl FnMut(u32, char) -> bool) -> SeatMap {
    let wide_body = aircraft.contains("777");
    let (rows, letters, layout): (u32, &'static [char], &str) = if wide_body {
        (42, &WIDE_BODY_LETTERS, "3-3-3")
    } else {
        (28, &NARROW_BODY_LETTERS, "3-3")
    };

    let mut seats = Vec::with_capacity(rows as usize * letters.len());
    for row in 1..=rows {
        let cabin = cabin_for_row(row);
        for &letter in letters {
            let status = if occupied(row, letter) {
                SeatStatus::Occupied
            } else {
                SeatStatus::Available
            };
            seats.push(Seat {
                id: format!("{row}{letter}"),
                row,
                letter,
                cabin,
                status,
                price: surcharge(cabin),
                features: features(cabin).iter().map(|f| f.to_string()).collect(),
            });
        }
    }

    SeatMap {
        aircraft: aircraft.to_string(),
        rows,
        seats_per_row: letters.len() as u32,
        layout: layout.to_string(),
        seats,
        letters,
    }
}

/// Roughly [`OCCUPIED_SHARE`] of seats occupied, drawn from `rng`.
pub fn generate_random<R: Rng + ?Sized>(aircraft: &str, rng: &mut R) -> SeatMap {
    generate(aircraft, |_, _| rng.random_bool(OCCUPIED_SHARE))
}

/// Same seed, same occupancy.
pub fn generate_seeded(aircraft: &str, seed: u64) -> SeatMap {
    generate_random(aircraft, &mut StdRng::seed_from_u64(seed))
}
