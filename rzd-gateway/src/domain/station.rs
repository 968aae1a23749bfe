//! Station code and station record types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A numeric station code as used by the timetable service (e.g. `2000000`
/// for Moscow, `2004000` for Saint Petersburg).
///
/// The service sends codes either as JSON numbers or as decimal strings.
/// Any `StationCode` value is a positive integer by construction.
///
/// # Examples
///
/// ```
/// use rzd_gateway::domain::StationCode;
///
/// let msk = StationCode::parse("2000000").unwrap();
/// assert_eq!(msk.get(), 2_000_000);
/// assert_eq!(msk.to_string(), "2000000");
///
/// // Surrounding whitespace is tolerated
/// assert!(StationCode::parse(" 2004000 ").is_ok());
///
/// // Non-digits and zero are rejected
/// assert!(StationCode::parse("20A0000").is_err());
/// assert!(StationCode::parse("0").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(u32);

impl StationCode {
    /// Parse a station code from its decimal representation.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidStationCode {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationCode {
                reason: "must contain only ASCII digits",
            });
        }

        let value: u32 = s.parse().map_err(|_| InvalidStationCode {
            reason: "out of range",
        })?;

        Self::from_number(u64::from(value))
    }

    /// Build a station code from an integer value.
    pub fn from_number(n: u64) -> Result<Self, InvalidStationCode> {
        if n == 0 {
            return Err(InvalidStationCode {
                reason: "must be positive",
            });
        }

        u32::try_from(n).map(StationCode).map_err(|_| InvalidStationCode {
            reason: "out of range",
        })
    }

    /// Returns the numeric value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A station as returned by route and station searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Display name (e.g. "МОСКВА ОКТЯБРЬСКАЯ").
    pub name: String,

    /// Station code, when the upstream supplied a valid one.
    pub code: Option<StationCode>,

    /// Name of the route end point the train is signed for, if known.
    pub route_name: Option<String>,

    /// Suggestion level (station search only).
    pub level: Option<i64>,

    /// Suggestion score (station search only).
    pub score: Option<i64>,
}

impl Station {
    /// Create a station with just a name and code.
    pub fn new(name: impl Into<String>, code: Option<StationCode>) -> Self {
        Self {
            name: name.into(),
            code,
            route_name: None,
            level: None,
            score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert_eq!(StationCode::parse("2000000").unwrap().get(), 2_000_000);
        assert_eq!(StationCode::parse("2004000").unwrap().get(), 2_004_000);
        assert_eq!(StationCode::parse("1").unwrap().get(), 1);
    }

    #[test]
    fn reject_empty_and_blank() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("   ").is_err());
    }

    #[test]
    fn reject_non_digits() {
        assert!(StationCode::parse("-2000000").is_err());
        assert!(StationCode::parse("2000000.0").is_err());
        assert!(StationCode::parse("MOSCOW").is_err());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(StationCode::parse("99999999999").is_err());
        assert!(StationCode::from_number(u64::from(u32::MAX) + 1).is_err());
        assert!(StationCode::from_number(0).is_err());
    }

    #[test]
    fn display_and_debug() {
        let code = StationCode::parse("2004000").unwrap();
        assert_eq!(code.to_string(), "2004000");
        assert_eq!(format!("{:?}", code), "StationCode(2004000)");
    }
}
