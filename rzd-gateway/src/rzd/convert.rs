//! Conversion from wire schema to domain types.
//!
//! Numbers that may arrive as strings are normalized here, timestamps are
//! anchored to the service's timezone, and every failure names the field and
//! the raw value that caused it.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{
    Car, CarNumeration, CarSeatType, CarService, CarriageType, Carrier, RoundTrip, Seat, Station,
    StationCode, TrainRoute, parse_duration, parse_timestamp,
};

use super::types::{
    CarSchema, CarriageResponse, CarriageTypeSchema, LooseNumber, RouteResponse, SeatSchema,
    StationSchema, TrainListing,
};

/// Longest body excerpt kept in a schema error.
const SCHEMA_BODY_LIMIT: usize = 300;

/// Error during schema to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A field was present but could not be interpreted
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A required part of the response was missing
    #[error("missing section: {0}")]
    MissingSection(&'static str),

    /// The body did not deserialize into the expected schema
    #[error("unexpected response shape: {message}; body: {body}")]
    Schema { message: String, body: String },
}

/// Deserialize a response body into its schema type.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, MappingError> {
    serde_json::from_slice(body).map_err(|e| MappingError::Schema {
        message: e.to_string(),
        body: String::from_utf8_lossy(body)
            .chars()
            .take(SCHEMA_BODY_LIMIT)
            .collect(),
    })
}

/// Convert a route search response. Trains from every `tp` block are
/// returned in order.
pub fn convert_routes(response: &RouteResponse) -> Result<Vec<TrainRoute>, MappingError> {
    response
        .tp
        .iter()
        .flat_map(|block| &block.list)
        .map(convert_train)
        .collect()
}

/// Convert a round-trip search response: `tp[0]` is outbound, `tp[1]` is the
/// return leg.
pub fn convert_round_trip(response: &RouteResponse) -> Result<RoundTrip, MappingError> {
    let [forward, back, ..] = response.tp.as_slice() else {
        return Err(MappingError::MissingSection("tp[1]"));
    };

    Ok(RoundTrip {
        forward: forward.list.iter().map(convert_train).collect::<Result<_, _>>()?,
        back: back.list.iter().map(convert_train).collect::<Result<_, _>>()?,
    })
}

/// Convert one listed train.
pub fn convert_train(listing: &TrainListing) -> Result<TrainRoute, MappingError> {
    let departure = parse_timestamp(&listing.date0, &listing.time0).map_err(|e| {
        MappingError::InvalidField {
            field: "date0/time0",
            value: format!("{} {}", listing.date0, listing.time0),
            reason: e.to_string(),
        }
    })?;

    let arrival = parse_timestamp(&listing.date1, &listing.time1).map_err(|e| {
        MappingError::InvalidField {
            field: "date1/time1",
            value: format!("{} {}", listing.date1, listing.time1),
            reason: e.to_string(),
        }
    })?;

    let duration = parse_duration(&listing.time_in_way).map_err(|e| MappingError::InvalidField {
        field: "timeInWay",
        value: listing.time_in_way.clone(),
        reason: e.to_string(),
    })?;

    let mut from = Station::new(
        listing.station0.trim(),
        station_code("code0", listing.code0.as_ref()),
    );
    from.route_name = non_empty(listing.route0.as_deref());

    let mut to = Station::new(
        listing.station1.trim(),
        station_code("code1", listing.code1.as_ref()),
    );
    to.route_name = non_empty(listing.route1.as_deref());

    let car_types = listing
        .cars
        .iter()
        .chain(&listing.seat_cars)
        .map(convert_carriage_type)
        .collect();

    Ok(TrainRoute {
        train_number: listing.number.trim().to_string(),
        brand: listing.brand.as_deref().unwrap_or_default().trim().to_string(),
        carrier: Carrier {
            id: None,
            name: listing.carrier.as_deref().unwrap_or_default().trim().to_string(),
        },
        from,
        to,
        departure,
        arrival,
        duration,
        car_types,
    })
}

/// Normalize one carriage class, whichever array it came from.
pub fn convert_carriage_type(schema: &CarriageTypeSchema) -> CarriageType {
    CarriageType {
        seat_type: seat_type(schema.itype.as_ref()),
        short_label: schema.kind.trim().to_string(),
        label: schema.type_loc.trim().to_string(),
        class: schema.serv_cls.trim().to_string(),
        tariff: tariff("tariff", schema.tariff.as_ref()),
        tariff_extra: tariff("tariff2", schema.tariff2.as_ref()),
        free_seats: count("freeSeats", schema.free_seats.as_ref()),
        disabled: schema.disabled_person.unwrap_or(false),
    }
}

/// Convert a carriage lookup response. Carriages of every listed train are
/// returned in order.
pub fn convert_cars(response: &CarriageResponse) -> Result<Vec<Car>, MappingError> {
    if response.lst.is_empty() {
        return Err(MappingError::MissingSection("lst"));
    }

    Ok(response
        .lst
        .iter()
        .flat_map(|train| &train.cars)
        .map(convert_car)
        .collect())
}

pub fn convert_car(schema: &CarSchema) -> Car {
    let seats: Vec<Seat> = schema.seats.iter().map(convert_seat).collect();
    let free_seats = seats.iter().map(|s| s.free).fold(0u32, u32::saturating_add);

    Car {
        number: schema.cnumber.trim().to_string(),
        kind: schema.kind.trim().to_string(),
        category_label: schema.cat_label_loc.trim().to_string(),
        type_label: schema.type_loc.trim().to_string(),
        category_code: schema.cat_code.trim().to_string(),
        type_id: schema.ctypei.as_ref().and_then(LooseNumber::to_i64).unwrap_or(0),
        car_type: schema.ctype.as_ref().and_then(LooseNumber::to_i64).unwrap_or(0),
        letter: schema.letter.trim().to_string(),
        class: schema.cls_type.trim().to_string(),
        services: schema
            .services
            .iter()
            .map(|s| CarService {
                id: s.id.as_ref().and_then(LooseNumber::to_text).unwrap_or_default(),
                name: s.name.trim().to_string(),
                description: s.description.trim().to_string(),
            })
            .collect(),
        tariff: tariff("tariff", schema.tariff.as_ref()),
        tariff_extra: tariff("tariff2", schema.tariff2.as_ref()),
        carrier: Carrier {
            id: schema.carrier_id.as_ref().and_then(LooseNumber::to_text),
            name: schema.carrier.trim().to_string(),
        },
        numeration: CarNumeration::from_field(schema.car_numeration.as_deref()),
        seats,
        free_seats,
    }
}

fn convert_seat(schema: &SeatSchema) -> Seat {
    Seat {
        places: schema.places.to_vec(),
        tariff: tariff("seats.tariff", schema.tariff.as_ref()),
        kind: schema.kind.trim().to_string(),
        label: schema.label.trim().to_string(),
        free: count("seats.free", schema.free.as_ref()),
    }
}

/// Convert station suggestions. Entries are kept in the order received.
pub fn convert_stations(response: &[StationSchema]) -> Vec<Station> {
    response
        .iter()
        .map(|s| Station {
            name: s.n.trim().to_string(),
            code: station_code("c", s.c.as_ref()),
            route_name: None,
            level: s.level.as_ref().and_then(LooseNumber::to_i64),
            score: s.score.as_ref().and_then(LooseNumber::to_i64),
        })
        .collect()
}

/// Normalize a tariff to whole roubles. Absent or blank is zero; anything
/// unparseable is zero with a warning.
pub fn tariff(field: &'static str, raw: Option<&LooseNumber>) -> u32 {
    lenient_u32(field, raw, "unparseable tariff, using 0")
}

fn count(field: &'static str, raw: Option<&LooseNumber>) -> u32 {
    lenient_u32(field, raw, "unparseable count, using 0")
}

fn lenient_u32(field: &'static str, raw: Option<&LooseNumber>, message: &'static str) -> u32 {
    match raw {
        None => 0,
        Some(n) if n.is_blank() => 0,
        Some(n) => n.to_u32().unwrap_or_else(|| {
            warn!(field, raw = ?n, "{message}");
            0
        }),
    }
}

fn seat_type(raw: Option<&LooseNumber>) -> CarSeatType {
    match raw.and_then(LooseNumber::to_i64) {
        Some(code) => CarSeatType::from_code(code),
        None => {
            if let Some(n) = raw {
                warn!(raw = ?n, "unparseable itype");
            }
            CarSeatType::Other(0)
        }
    }
}

fn station_code(field: &'static str, raw: Option<&LooseNumber>) -> Option<StationCode> {
    let raw = raw?;
    if raw.is_blank() {
        return None;
    }

    let parsed = match raw {
        LooseNumber::Text(s) => StationCode::parse(s),
        LooseNumber::Number(_) => match raw.to_i64().and_then(|n| u64::try_from(n).ok()) {
            Some(n) => StationCode::from_number(n),
            None => StationCode::parse(&raw.to_text().unwrap_or_default()),
        },
    };

    match parsed {
        Ok(code) => Some(code),
        Err(e) => {
            warn!(field, raw = ?raw, error = %e, "ignoring invalid station code");
            None
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
