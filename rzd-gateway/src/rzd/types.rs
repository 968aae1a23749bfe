//! Wire schema of the timetable service's JSON responses.
//!
//! These mirror the upstream field names and stay deliberately loose: most
//! fields default when absent and numbers may arrive as strings. Converting
//! them into [`crate::domain`] records happens in `convert`.

use serde::Deserialize;

/// A JSON value that should be a number but may be sent as a string.
///
/// # Examples
///
/// ```
/// use rzd_gateway::rzd::LooseNumber;
///
/// let text: LooseNumber = serde_json::from_str(r#""2533""#).unwrap();
/// let number: LooseNumber = serde_json::from_str("2533").unwrap();
/// assert_eq!(text.to_u32(), Some(2533));
/// assert_eq!(number.to_u32(), Some(2533));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(serde_json::Number),
    Text(String),
}

impl LooseNumber {
    /// An empty or whitespace-only string.
    pub fn is_blank(&self) -> bool {
        matches!(self, LooseNumber::Text(s) if s.trim().is_empty())
    }

    /// Non-negative integer value. Fractions are rounded to the nearest
    /// whole number.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            LooseNumber::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(round_f64)),
            LooseNumber::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(round_f64))
            }
        }
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.to_u64().and_then(|n| u32::try_from(n).ok())
    }

    /// Signed integer value; fractions are rejected.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            LooseNumber::Number(n) => n.as_i64(),
            LooseNumber::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Decimal text form, without a fractional part for numbers.
    ///
    /// Used for opaque identifiers such as the session token, which the
    /// service sends either as `"rid": "123"` or `"rid": 123`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            LooseNumber::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            LooseNumber::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Some(u.to_string())
                } else if let Some(i) = n.as_i64() {
                    Some(i.to_string())
                } else {
                    n.as_f64()
                        .filter(|f| f.is_finite())
                        .map(|f| format!("{:.0}", f.trunc()))
                }
            }
        }
    }
}

fn round_f64(f: f64) -> Option<u64> {
    if f.is_finite() && (0.0..=u64::MAX as f64).contains(&f) {
        Some(f.round() as u64)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Route search
// ---------------------------------------------------------------------------

/// Route search response: one `tp` block per direction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteResponse {
    pub tp: Vec<RouteBlock>,
}

/// Trains found for one direction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteBlock {
    pub from: Option<String>,
    pub from_code: Option<LooseNumber>,
    #[serde(rename = "where")]
    pub to: Option<String>,
    pub where_code: Option<LooseNumber>,
    pub date: Option<String>,
    pub list: Vec<TrainListing>,
}

/// One train in a route search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainListing {
    pub number: String,
    pub number2: Option<String>,
    pub brand: Option<String>,
    pub carrier: Option<String>,
    pub station0: String,
    pub station1: String,
    pub route0: Option<String>,
    pub route1: Option<String>,
    pub code0: Option<LooseNumber>,
    pub code1: Option<LooseNumber>,
    pub date0: String,
    pub time0: String,
    pub date1: String,
    pub time1: String,
    pub time_in_way: String,
    /// Carriage classes with numeric tariffs.
    pub cars: Vec<CarriageTypeSchema>,
    /// Carriage classes with string tariffs.
    pub seat_cars: Vec<CarriageTypeSchema>,
}

/// One class of carriage on a listed train.
///
/// `cars` and `seatCars` use the same fields but different tariff encodings;
/// [`LooseNumber`] absorbs the difference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarriageTypeSchema {
    pub itype: Option<LooseNumber>,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_loc: String,
    pub serv_cls: String,
    pub free_seats: Option<LooseNumber>,
    pub tariff: Option<LooseNumber>,
    pub tariff2: Option<LooseNumber>,
    pub disabled_person: Option<bool>,
}

// ---------------------------------------------------------------------------
// Carriage lookup
// ---------------------------------------------------------------------------

/// Carriage lookup response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CarriageResponse {
    pub lst: Vec<TrainCarriages>,
}

/// Carriages of one train.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrainCarriages {
    pub number: Option<String>,
    pub cars: Vec<CarSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarSchema {
    pub cnumber: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cat_label_loc: String,
    pub type_loc: String,
    pub cat_code: String,
    pub ctypei: Option<LooseNumber>,
    pub ctype: Option<LooseNumber>,
    pub letter: String,
    pub cls_type: String,
    pub services: Vec<ServiceSchema>,
    pub tariff: Option<LooseNumber>,
    pub tariff2: Option<LooseNumber>,
    pub carrier: String,
    pub carrier_id: Option<LooseNumber>,
    pub car_numeration: Option<String>,
    pub seats: Vec<SeatSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceSchema {
    pub id: Option<LooseNumber>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeatSchema {
    pub places: Places,
    pub tariff: Option<LooseNumber>,
    #[serde(rename = "type")]
    pub kind: String,
    pub free: Option<LooseNumber>,
    pub label: String,
}

/// Place numbers, sent either as a list or as one comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Places {
    List(Vec<String>),
    Joined(String),
}

impl Default for Places {
    fn default() -> Self {
        Places::List(Vec::new())
    }
}

impl Places {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Places::List(list) => list.iter().map(|p| p.trim().to_string()).collect(),
            Places::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Station search
// ---------------------------------------------------------------------------

/// One station suggestion. The response is a bare array of these.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationSchema {
    /// Name.
    pub n: String,
    /// Code.
    pub c: Option<LooseNumber>,
    /// Score.
    #[serde(rename = "S")]
    pub score: Option<LooseNumber>,
    /// Level.
    #[serde(rename = "L")]
    pub level: Option<LooseNumber>,
}
