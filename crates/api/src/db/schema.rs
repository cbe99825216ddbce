//! Static layout of the two pre-populated tables.
//!
//! The store is created elsewhere; these types describe it, nothing here
//! creates or alters a table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub mod measurement {
    pub const TABLE: &str = "measurement";
    pub const ID: &str = "id";
    pub const STATION: &str = "station";
    pub const DATE: &str = "date";
    pub const PRCP: &str = "prcp";
    pub const TOBS: &str = "tobs";
}

pub mod station {
    pub const TABLE: &str = "station";
    pub const ID: &str = "id";
    pub const STATION: &str = "station";
    pub const NAME: &str = "name";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const ELEVATION: &str = "elevation";
}

/// One station's readings for one day.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub station: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

/// Station metadata. Nothing reads past the id, so the descriptive columns
/// may be NULL.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub station: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

impl Measurement {
    pub fn columns() -> [&'static str; 5] {
        [
            measurement::ID,
            measurement::STATION,
            measurement::DATE,
            measurement::PRCP,
            measurement::TOBS,
        ]
    }
}

impl Station {
    pub fn columns() -> [&'static str; 6] {
        [
            station::ID,
            station::STATION,
            station::NAME,
            station::LATITUDE,
            station::LONGITUDE,
            station::ELEVATION,
        ]
    }
}
