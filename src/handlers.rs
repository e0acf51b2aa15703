/// Route handlers for the climate API
///
/// Each handler opens its own session, runs one query, and reshapes the
/// rows into the structure the endpoint returns. Sessions are closed by
/// `Database::with_session` before any reshaping happens.
///
/// Handlers:
/// - welcome                - static route listing for `/`
/// - precipitation          - date → prcp over the last 356 days of data
/// - stations               - every station's id, name and coordinates
/// - tobs                   - most active station's temperatures for the last year
/// - temperature_from       - min/avg/max temperature from a start date
/// - temperature_between    - min/avg/max temperature within a date range

use crate::db::{Database, DbError};
use crate::model::{
    MOST_ACTIVE_STATION, StationEntry, TOBS_START_DATE, TemperatureSummary, TobsEntry,
    precipitation_start_date,
};
use crate::queries;
use std::collections::BTreeMap;

/// Body of `GET /`
pub const WELCOME_TEXT: &str = "Welcome to My Hawaii Climate Analysis API!<br/>\
    Available Routes:<br/>\
    /api/v1.0/precipitation<br/>\
    /api/v1.0/stations<br/>\
    /api/v1.0/tobs<br/>\
    /api/v1.0/start (enter as YYYY-MM-DD)<br/>\
    /api/v1.0/start/end (enter as YYYY-MM-DD/YYYY-MM-DD)";

pub fn welcome() -> &'static str {
    WELCOME_TEXT
}

/// Precipitation keyed by date. A date seen more than once keeps the last
/// value in query order.
pub fn precipitation(db: &Database) -> Result<BTreeMap<String, Option<f64>>, DbError> {
    let since = precipitation_start_date();
    let rows = db.with_session(|conn| queries::fetch_precipitation(conn, &since))?;

    Ok(rows.into_iter().collect())
}

pub fn stations(db: &Database) -> Result<Vec<StationEntry>, DbError> {
    let stations = db.with_session(queries::fetch_stations)?;
    Ok(stations.into_iter().map(StationEntry::from).collect())
}

/// Temperature observations of the most active station since 2016-08-23
pub fn tobs(db: &Database) -> Result<Vec<TobsEntry>, DbError> {
    db.with_session(|conn| {
        queries::fetch_station_tobs(conn, MOST_ACTIVE_STATION, TOBS_START_DATE)
    })
}

/// Every aggregation row for dates on or after `start`.
///
/// `start` is compared lexically; a value that is not a date simply
/// matches nothing and yields a row of nulls.
pub fn temperature_from(db: &Database, start: &str) -> Result<Vec<TemperatureSummary>, DbError> {
    db.with_session(|conn| queries::fetch_temperature_summary_since(conn, start))
}

/// Aggregation for `start <= date <= end`, reporting at most the first row.
///
/// An empty range produces `[]` rather than a row of nulls.
pub fn temperature_between(
    db: &Database,
    start: &str,
    end: &str,
) -> Result<Vec<TemperatureSummary>, DbError> {
    let rows =
        db.with_session(|conn| queries::fetch_temperature_summary_between(conn, start, end))?;

    Ok(rows.into_iter().take(1).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
