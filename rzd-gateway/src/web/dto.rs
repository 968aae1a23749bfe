//! Data transfer objects for web requests and responses.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Car, CarriageSearch, CarriageType, Direction, RoundTrip, RoundTripSearch, RouteSearch, Seat,
    Station, StationCode, StationSearch, TrainRoute, TrainSearchType, parse_date, parse_time,
};

/// Request to search one-way routes.
#[derive(Debug, Deserialize)]
pub struct RouteSearchRequest {
    /// Origin station code
    pub from: String,

    /// Destination station code
    pub to: String,

    /// Travel date, `YYYY-MM-DD` or `DD.MM.YYYY`
    pub date: String,

    /// `all`, `trains` or `electrics` (defaults to all)
    pub train_type: Option<String>,

    /// Only trains with free seats (defaults to true)
    pub check_seats: Option<bool>,

    /// Include itineraries with a change (defaults to false)
    pub with_change: Option<bool>,
}

impl RouteSearchRequest {
    pub fn to_search(&self) -> Result<RouteSearch, String> {
        let mut search = RouteSearch::new(
            parse_code("from", &self.from)?,
            parse_code("to", &self.to)?,
            parse_query_date("date", &self.date)?,
        );
        search.train_type = parse_train_type(self.train_type.as_deref())?;
        search.check_seats = self.check_seats.unwrap_or(true);
        search.with_change = self.with_change.unwrap_or(false);
        Ok(search)
    }
}

/// Request to search outbound and return routes together.
#[derive(Debug, Deserialize)]
pub struct RoundTripRequest {
    pub from: String,
    pub to: String,
    pub date: String,
    pub return_date: String,
    pub train_type: Option<String>,
    pub check_seats: Option<bool>,
}

impl RoundTripRequest {
    pub fn to_search(&self) -> Result<RoundTripSearch, String> {
        Ok(RoundTripSearch {
            from: parse_code("from", &self.from)?,
            to: parse_code("to", &self.to)?,
            date: parse_query_date("date", &self.date)?,
            return_date: parse_query_date("return_date", &self.return_date)?,
            train_type: parse_train_type(self.train_type.as_deref())?,
            check_seats: self.check_seats.unwrap_or(true),
        })
    }
}

/// Request to list a train's carriages.
#[derive(Debug, Deserialize)]
pub struct CarriageSearchRequest {
    /// Train number (e.g. "119А")
    pub train: String,

    pub from: String,
    pub to: String,

    /// Departure date from `from`
    pub date: String,

    /// Departure time from `from`, `HH:MM`
    pub time: String,

    /// `oneway` (default) or `return`
    pub direction: Option<String>,
}

impl CarriageSearchRequest {
    pub fn to_search(&self) -> Result<CarriageSearch, String> {
        let date = parse_query_date("date", &self.date)?;
        let time: NaiveTime =
            parse_time(&self.time).map_err(|e| format!("Invalid time {:?}: {e}", self.time))?;

        let direction = match self.direction.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("oneway") | Some("0") => Direction::OneWay,
            Some("return") | Some("1") => Direction::Return,
            Some(other) => return Err(format!("Invalid direction: {other}")),
        };

        Ok(CarriageSearch {
            train_number: self.train.clone(),
            from: parse_code("from", &self.from)?,
            to: parse_code("to", &self.to)?,
            departure: date.and_time(time),
            direction,
        })
    }
}

/// Request to suggest stations by name.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Leading part of the station name
    pub q: String,

    /// Compact suggestion list (defaults to true)
    pub compact: Option<bool>,

    /// Response language
    pub lang: Option<String>,
}

impl StationSearchRequest {
    pub fn to_search(&self) -> StationSearch {
        StationSearch {
            query: self.q.clone(),
            compact: self.compact.unwrap_or(true),
            language: self.lang.clone().filter(|l| !l.trim().is_empty()),
        }
    }
}

fn parse_code(field: &str, value: &str) -> Result<StationCode, String> {
    StationCode::parse(value).map_err(|e| format!("Invalid {field} station {value:?}: {e}"))
}

/// Accept ISO dates as well as the service's own `DD.MM.YYYY`.
fn parse_query_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .or_else(|_| parse_date(value))
        .map_err(|_| format!("Invalid {field} {value:?}: expected YYYY-MM-DD or DD.MM.YYYY"))
}

fn parse_train_type(value: Option<&str>) -> Result<TrainSearchType, String> {
    match value {
        None => Ok(TrainSearchType::AllTrains),
        Some(v) => TrainSearchType::parse(v).ok_or_else(|| format!("Invalid train type: {v}")),
    }
}

/// A station in results.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    pub code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl From<&Station> for StationResult {
    fn from(station: &Station) -> Self {
        Self {
            name: station.name.clone(),
            code: station.code.map(|c| c.get()),
            route_name: station.route_name.clone(),
            level: station.level,
            score: station.score,
        }
    }
}

/// Availability for one carriage class.
#[derive(Debug, Serialize)]
pub struct CarTypeResult {
    /// Seat class code (1 = platz ... 6 = lux)
    pub seat_type: i64,
    pub short_label: String,
    pub label: String,
    pub class: String,
    pub tariff: u32,
    pub tariff_extra: u32,
    pub free_seats: u32,
    pub disabled: bool,
}

impl From<&CarriageType> for CarTypeResult {
    fn from(car: &CarriageType) -> Self {
        Self {
            seat_type: car.seat_type.code(),
            short_label: car.short_label.clone(),
            label: car.label.clone(),
            class: car.class.clone(),
            tariff: car.tariff,
            tariff_extra: car.tariff_extra,
            free_seats: car.free_seats,
            disabled: car.disabled,
        }
    }
}

/// A train in route results.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub train_number: String,
    pub brand: String,
    pub carrier: String,
    pub from: StationResult,
    pub to: StationResult,

    /// RFC 3339 with the service's UTC offset
    pub departure: String,
    pub arrival: String,

    /// Time on board in minutes
    pub duration_mins: i64,

    pub car_types: Vec<CarTypeResult>,
}

impl From<&TrainRoute> for RouteResult {
    fn from(route: &TrainRoute) -> Self {
        Self {
            train_number: route.train_number.clone(),
            brand: route.brand.clone(),
            carrier: route.carrier.name.clone(),
            from: StationResult::from(&route.from),
            to: StationResult::from(&route.to),
            departure: route.departure.to_rfc3339(),
            arrival: route.arrival.to_rfc3339(),
            duration_mins: route.duration.num_minutes(),
            car_types: route.car_types.iter().map(CarTypeResult::from).collect(),
        }
    }
}

/// Response for route search.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    pub routes: Vec<RouteResult>,
}

/// Response for round-trip search.
#[derive(Debug, Serialize)]
pub struct RoundTripResponse {
    pub forward: Vec<RouteResult>,
    pub back: Vec<RouteResult>,
}

impl From<&RoundTrip> for RoundTripResponse {
    fn from(trip: &RoundTrip) -> Self {
        Self {
            forward: trip.forward.iter().map(RouteResult::from).collect(),
            back: trip.back.iter().map(RouteResult::from).collect(),
        }
    }
}

/// A group of places in a carriage.
#[derive(Debug, Serialize)]
pub struct SeatResult {
    pub places: Vec<String>,
    pub tariff: u32,
    pub kind: String,
    pub label: String,
    pub free: u32,
}

impl From<&Seat> for SeatResult {
    fn from(seat: &Seat) -> Self {
        Self {
            places: seat.places.clone(),
            tariff: seat.tariff,
            kind: seat.kind.clone(),
            label: seat.label.clone(),
            free: seat.free,
        }
    }
}

/// A carriage in carriage results.
#[derive(Debug, Serialize)]
pub struct CarResult {
    pub number: String,
    pub kind: String,
    pub category: String,
    pub class: String,
    pub tariff: u32,
    pub tariff_extra: u32,
    pub carrier: String,

    /// `head`, `tail` or `unknown`
    pub numeration: &'static str,

    pub services: Vec<String>,
    pub seats: Vec<SeatResult>,
    pub free_seats: u32,
}

impl From<&Car> for CarResult {
    fn from(car: &Car) -> Self {
        use crate::domain::CarNumeration;

        Self {
            number: car.number.clone(),
            kind: car.kind.clone(),
            category: car.category_label.clone(),
            class: car.class.clone(),
            tariff: car.tariff,
            tariff_extra: car.tariff_extra,
            carrier: car.carrier.name.clone(),
            numeration: match car.numeration {
                CarNumeration::Head => "head",
                CarNumeration::Tail => "tail",
                CarNumeration::Unknown => "unknown",
            },
            services: car.services.iter().map(|s| s.name.clone()).collect(),
            seats: car.seats.iter().map(SeatResult::from).collect(),
            free_seats: car.free_seats,
        }
    }
}

/// Response for carriage search.
#[derive(Debug, Serialize)]
pub struct CarriageSearchResponse {
    pub cars: Vec<CarResult>,
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
