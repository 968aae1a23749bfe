//! Train routes returned by a timetable search.

use chrono::{DateTime, FixedOffset, TimeDelta};

use super::Station;

/// Seat class of a carriage, from the service's numeric `itype` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarSeatType {
    /// Open-plan sleeper ("плацкарт").
    Platz,
    /// Unreserved seating.
    General,
    /// Seated carriage.
    Sitting,
    /// Four-berth compartment ("купе").
    Coupe,
    /// Two-berth soft class.
    Soft,
    /// Luxury class.
    Lux,
    /// A code this crate does not know about.
    Other(i64),
}

impl CarSeatType {
    /// Map the service's numeric code.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => CarSeatType::Platz,
            2 => CarSeatType::General,
            3 => CarSeatType::Sitting,
            4 => CarSeatType::Coupe,
            5 => CarSeatType::Soft,
            6 => CarSeatType::Lux,
            other => CarSeatType::Other(other),
        }
    }

    /// The service's numeric code for this seat type.
    pub fn code(&self) -> i64 {
        match self {
            CarSeatType::Platz => 1,
            CarSeatType::General => 2,
            CarSeatType::Sitting => 3,
            CarSeatType::Coupe => 4,
            CarSeatType::Soft => 5,
            CarSeatType::Lux => 6,
            CarSeatType::Other(code) => *code,
        }
    }
}

/// Train operating company.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Carrier {
    /// Numeric identifier as a string, when known.
    pub id: Option<String>,
    /// Display name (e.g. "ФПК").
    pub name: String,
}

/// Aggregate availability for one class of carriage on a train.
///
/// The route search lists these twice over, in `cars` (numeric tariffs) and
/// `seatCars` (string tariffs). Both end up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriageType {
    /// Seat class.
    pub seat_type: CarSeatType,
    /// Short label (e.g. "Купе").
    pub short_label: String,
    /// Localized full label.
    pub label: String,
    /// Service class code (e.g. "2Э").
    pub class: String,
    /// Lowest tariff, in whole roubles.
    pub tariff: u32,
    /// Secondary tariff (upper bound for seat cars), zero when absent.
    pub tariff_extra: u32,
    /// Number of free seats of this type.
    pub free_seats: u32,
    /// Whether places for disabled passengers are offered.
    pub disabled: bool,
}

/// A train found by a route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRoute {
    /// Train number (e.g. "119А").
    pub train_number: String,
    /// Marketing brand (e.g. "Сапсан"), empty when unbranded.
    pub brand: String,
    /// Operating company.
    pub carrier: Carrier,
    /// Boarding station.
    pub from: Station,
    /// Alighting station.
    pub to: Station,
    /// Departure from `from`.
    pub departure: DateTime<FixedOffset>,
    /// Arrival at `to`.
    pub arrival: DateTime<FixedOffset>,
    /// Time on board.
    pub duration: TimeDelta,
    /// Available carriage classes.
    pub car_types: Vec<CarriageType>,
}

/// Result of a round-trip search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundTrip {
    /// Outbound trains.
    pub forward: Vec<TrainRoute>,
    /// Return trains.
    pub back: Vec<TrainRoute>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_type_codes() {
        for code in 1..=6 {
            assert_eq!(CarSeatType::from_code(code).code(), code);
        }
        assert_eq!(CarSeatType::from_code(4), CarSeatType::Coupe);
        assert_eq!(CarSeatType::from_code(42), CarSeatType::Other(42));
        assert_eq!(CarSeatType::Other(42).code(), 42);
    }
}
