/// SQL for each endpoint, mapping rows into the static record types.
///
/// All date filters compare against the `YYYY-MM-DD` text column, so
/// caller-supplied bounds are bound as opaque strings and never parsed.

use crate::db::DbError;
use crate::model::{DatasetSummary, Measurement, Station, TemperatureSummary, TobsEntry};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// `(date, prcp)` rows on or after `since`, ordered by date.
///
/// Rows sharing a date come back in table (rowid) order, which is what a
/// plain table scan sorted on `date` produces.
pub fn fetch_precipitation(
    conn: &Connection,
    since: &str,
) -> Result<Vec<(String, Option<f64>)>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT date, prcp
         FROM measurement
         WHERE date >= ?1
         ORDER BY date, rowid",
    )?;

    let rows = stmt
        .query_map(params![since], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Every row of the station table, in table order
pub fn fetch_stations(conn: &Connection) -> Result<Vec<Station>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT station, name, latitude, longitude, elevation
         FROM station",
    )?;

    let stations = stmt
        .query_map([], |row| {
            Ok(Station {
                station: row.get(0)?,
                name: row.get(1)?,
                latitude: row.get(2)?,
                longitude: row.get(3)?,
                elevation: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(stations)
}

/// Temperature observations for one station on or after `since`
pub fn fetch_station_tobs(
    conn: &Connection,
    station: &str,
    since: &str,
) -> Result<Vec<TobsEntry>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT date, tobs
         FROM measurement
         WHERE station = ?1 AND date >= ?2",
    )?;

    let entries = stmt
        .query_map(params![station, since], |row| {
            Ok(TobsEntry {
                date: row.get(0)?,
                tobs: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

/// Min/avg/max of `tobs` for all dates on or after `start`.
///
/// An aggregate without GROUP BY always yields one row; it is all NULL
/// when nothing matched.
pub fn fetch_temperature_summary_since(
    conn: &Connection,
    start: &str,
) -> Result<Vec<TemperatureSummary>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT MIN(tobs), AVG(tobs), MAX(tobs)
         FROM measurement
         WHERE date >= ?1",
    )?;

    let rows = stmt
        .query_map(params![start], row_to_summary)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Min/avg/max of `tobs` for dates in `[start, end]`.
///
/// Yields no row at all when the range holds no measurements.
pub fn fetch_temperature_summary_between(
    conn: &Connection,
    start: &str,
    end: &str,
) -> Result<Vec<TemperatureSummary>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT MIN(tobs), AVG(tobs), MAX(tobs)
         FROM measurement
         WHERE date >= ?1 AND date <= ?2
         HAVING COUNT(*) > 0",
    )?;

    let rows = stmt
        .query_map(params![start, end], row_to_summary)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn row_to_summary(row: &Row) -> rusqlite::Result<TemperatureSummary> {
    Ok(TemperatureSummary {
        minimum: row.get(0)?,
        average: row.get(1)?,
        maximum: row.get(2)?,
    })
}

/// Most recent observation in the file, if any
pub fn fetch_latest_measurement(conn: &Connection) -> Result<Option<Measurement>, DbError> {
    let latest = conn
        .query_row(
            "SELECT station, date, prcp, tobs
             FROM measurement
             ORDER BY date DESC
             LIMIT 1",
            [],
            |row| {
                Ok(Measurement {
                    station: row.get(0)?,
                    date: row.get(1)?,
                    prcp: row.get(2)?,
                    tobs: row.get(3)?,
                })
            },
        )
        .optional()?;

    Ok(latest)
}

/// Row counts and date coverage, for the startup log
pub fn fetch_dataset_summary(conn: &Connection) -> Result<DatasetSummary, DbError> {
    let station_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;

    let (measurement_count, first_date, last_date): (i64, Option<String>, Option<String>) =
        conn.query_row(
            "SELECT COUNT(*), MIN(date), MAX(date) FROM measurement",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

    Ok(DatasetSummary {
        station_count,
        measurement_count,
        first_date,
        last_date,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
