//! Query parameters for the façade operations.

use chrono::{NaiveDate, NaiveDateTime};

use super::StationCode;

/// Travel direction flag sent as `dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    OneWay,
    Return,
}

impl Direction {
    /// Wire value of the flag.
    pub fn code(&self) -> u8 {
        match self {
            Direction::OneWay => 0,
            Direction::Return => 1,
        }
    }
}

/// Train-type filter sent as `tfl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainSearchType {
    /// Long-distance and suburban trains.
    #[default]
    AllTrains,
    /// Long-distance trains only.
    Trains,
    /// Suburban electric trains only.
    Electrics,
}

impl TrainSearchType {
    /// Wire value of the filter.
    pub fn code(&self) -> u8 {
        match self {
            TrainSearchType::AllTrains => 1,
            TrainSearchType::Trains => 2,
            TrainSearchType::Electrics => 3,
        }
    }

    /// Parse a filter name as used in web queries.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "1" => Some(TrainSearchType::AllTrains),
            "trains" | "2" => Some(TrainSearchType::Trains),
            "electrics" | "suburban" | "3" => Some(TrainSearchType::Electrics),
            _ => None,
        }
    }
}

/// One-way route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSearch {
    pub from: StationCode,
    pub to: StationCode,
    pub date: NaiveDate,
    pub train_type: TrainSearchType,
    /// Only return trains with free seats.
    pub check_seats: bool,
    /// Include itineraries with a change of train.
    pub with_change: bool,
}

impl RouteSearch {
    /// Search all trains on a date, with seat check and without changes.
    pub fn new(from: StationCode, to: StationCode, date: NaiveDate) -> Self {
        Self {
            from,
            to,
            date,
            train_type: TrainSearchType::AllTrains,
            check_seats: true,
            with_change: false,
        }
    }
}

/// Round-trip route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripSearch {
    pub from: StationCode,
    pub to: StationCode,
    pub date: NaiveDate,
    pub return_date: NaiveDate,
    pub train_type: TrainSearchType,
    pub check_seats: bool,
}

/// Carriage lookup for one specific train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriageSearch {
    pub train_number: String,
    pub from: StationCode,
    pub to: StationCode,
    /// Scheduled departure from `from`, in the service's local time.
    pub departure: NaiveDateTime,
    pub direction: Direction,
}

/// Station name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationSearch {
    /// Leading fragment of the station name.
    pub query: String,
    /// Ask for the compact suggestion list.
    pub compact: bool,
    /// Response language (e.g. "ru"); the client default applies when `None`.
    pub language: Option<String>,
}

impl StationSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            compact: true,
            language: None,
        }
    }
}

/// Encode a flag the way the service expects in form bodies.
pub(crate) fn flag(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}

/// Encode a flag the way the station suggester expects it.
pub(crate) fn yes_no(b: bool) -> &'static str {
    if b { "y" } else { "n" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes() {
        assert_eq!(Direction::OneWay.code(), 0);
        assert_eq!(Direction::Return.code(), 1);
        assert_eq!(TrainSearchType::AllTrains.code(), 1);
        assert_eq!(TrainSearchType::Trains.code(), 2);
        assert_eq!(TrainSearchType::Electrics.code(), 3);
    }

    #[test]
    fn parse_train_type() {
        assert_eq!(TrainSearchType::parse("ALL"), Some(TrainSearchType::AllTrains));
        assert_eq!(TrainSearchType::parse("2"), Some(TrainSearchType::Trains));
        assert_eq!(TrainSearchType::parse("suburban"), Some(TrainSearchType::Electrics));
        assert_eq!(TrainSearchType::parse("bus"), None);
    }

    #[test]
    fn flags() {
        assert_eq!(flag(true), "1");
        assert_eq!(flag(false), "0");
        assert_eq!(yes_no(true), "y");
        assert_eq!(yes_no(false), "n");
    }
}
