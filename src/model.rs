/// Shared record and response types for the climate API.
///
/// The `station` and `measurement` tables have a fixed, known shape, so
/// their rows are declared here as plain structs rather than discovered at
/// runtime. Response types carry the exact JSON field names clients see.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dataset constants
// ---------------------------------------------------------------------------

/// Last observation date in the dataset; the precipitation window is
/// measured back from here.
pub const ANCHOR_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2017, 8, 23) {
    Some(date) => date,
    None => panic!("invalid anchor date"),
};

/// Length of the precipitation window ending at `ANCHOR_DATE`.
pub const PRECIPITATION_WINDOW_DAYS: u64 = 356;

/// Station with the most observations in the dataset.
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// First date included in the most-active-station temperature series.
pub const TOBS_START_DATE: &str = "2016-08-23";

/// First date of the precipitation window, as stored in `measurement.date`.
pub fn precipitation_start_date() -> String {
    (ANCHOR_DATE - Days::new(PRECIPITATION_WINDOW_DAYS))
        .format("%Y-%m-%d")
        .to_string()
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// One row of the `station` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// One row of the `measurement` table.
///
/// `date` stays a `YYYY-MM-DD` string: every filter in this service is a
/// lexical comparison against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station: String,
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: f64,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Station entry in the `/api/v1.0/stations` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationEntry {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Station> for StationEntry {
    fn from(s: Station) -> Self {
        StationEntry {
            station: s.station,
            name: s.name,
            latitude: s.latitude,
            longitude: s.longitude,
        }
    }
}

/// Temperature observation in the `/api/v1.0/tobs` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TobsEntry {
    pub date: String,
    pub tobs: f64,
}

/// Min/avg/max aggregation row over `tobs`.
///
/// All three are `None` when the filter matched no measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    #[serde(rename = "minimum temperature")]
    pub minimum: Option<f64>,
    #[serde(rename = "average temperature")]
    pub average: Option<f64>,
    #[serde(rename = "max temperature")]
    pub maximum: Option<f64>,
}

/// Dataset overview logged at startup
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub station_count: i64,
    pub measurement_count: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
