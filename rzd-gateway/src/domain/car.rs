//! Individual carriages returned by a carriage lookup.

use super::Carrier;

/// Which end of the train carriage numbering starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CarNumeration {
    /// Car 1 is at the locomotive end.
    Head,
    /// Car 1 is at the rear.
    Tail,
    /// Not reported, or reported as something unrecognized.
    #[default]
    Unknown,
}

impl CarNumeration {
    /// Interpret the optional `carNumeration` field.
    ///
    /// ```
    /// use rzd_gateway::domain::CarNumeration;
    ///
    /// assert_eq!(CarNumeration::from_field(Some("FromHead")), CarNumeration::Head);
    /// assert_eq!(CarNumeration::from_field(Some("FromTail")), CarNumeration::Tail);
    /// assert_eq!(CarNumeration::from_field(Some("Sideways")), CarNumeration::Unknown);
    /// assert_eq!(CarNumeration::from_field(None), CarNumeration::Unknown);
    /// ```
    pub fn from_field(value: Option<&str>) -> Self {
        match value {
            Some("FromHead") => CarNumeration::Head,
            Some("FromTail") => CarNumeration::Tail,
            _ => CarNumeration::Unknown,
        }
    }
}

/// An on-board amenity (bedding, meals, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarService {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A group of places in a carriage sharing a tariff and berth type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    /// Place numbers (e.g. "001", "003").
    pub places: Vec<String>,
    /// Tariff for these places, in whole roubles.
    pub tariff: u32,
    /// Berth type code (e.g. "dn" for lower, "up" for upper).
    pub kind: String,
    /// Human-readable label.
    pub label: String,
    /// Number of free places in the group.
    pub free: u32,
}

/// One physical carriage of a train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    /// Carriage number as printed on the car (e.g. "05").
    pub number: String,
    /// Short type name (e.g. "Купе").
    pub kind: String,
    /// Localized category label.
    pub category_label: String,
    /// Localized type label.
    pub type_label: String,
    /// Category code.
    pub category_code: String,
    /// Numeric type identifier.
    pub type_id: i64,
    /// Numeric car type.
    pub car_type: i64,
    /// Train letter suffix.
    pub letter: String,
    /// Service class (e.g. "2Э").
    pub class: String,
    /// Amenities.
    pub services: Vec<CarService>,
    /// Base tariff, in whole roubles.
    pub tariff: u32,
    /// Secondary tariff, zero when absent.
    pub tariff_extra: u32,
    /// Operating company.
    pub carrier: Carrier,
    /// Numbering direction.
    pub numeration: CarNumeration,
    /// Place groups.
    pub seats: Vec<Seat>,
    /// Total free places across `seats`.
    pub free_seats: u32,
}
