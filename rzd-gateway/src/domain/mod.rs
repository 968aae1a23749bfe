//! Domain types for the timetable gateway.
//!
//! These are the stable records the gateway hands to its callers. They are
//! built only by the schema mapper in [`crate::rzd`], from responses the
//! engine has already classified as successful, and carry no reference back
//! to the raw upstream JSON.

mod car;
mod params;
mod route;
mod station;
mod time;

pub use car::{Car, CarNumeration, CarService, Seat};
pub use params::{
    CarriageSearch, Direction, RoundTripSearch, RouteSearch, StationSearch, TrainSearchType,
};
pub(crate) use params::{flag, yes_no};
pub use route::{CarSeatType, CarriageType, Carrier, RoundTrip, TrainRoute};
pub use station::{InvalidStationCode, Station, StationCode};
pub use time::{
    ENDPOINT_TIMEZONE, ENDPOINT_UTC_OFFSET_SECS, TimeError, format_date, format_time, parse_date,
    parse_duration, parse_time, parse_timestamp,
};
