/// Test fixtures: a small hawaii.sqlite look-alike built in a temp directory.
///
/// Schema matches the real data file (`measurement`, `station`, integer
/// `id` primary keys, FLOAT columns). Rows are chosen so that every filter
/// boundary is exercised:
///
///   - 2016-08-22 rows fall outside both the tobs and precipitation windows
///   - 2016-08-31 is inside the tobs window but before 2016-09-01
///   - 2016-09-01 and 2017-08-23 each appear for two stations
///   - 2017-08-18 has a NULL prcp

use crate::config::RetryConfig;
use crate::db::Database;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) const STATION_COUNT: i64 = 3;

const SCHEMA_SQL: &str = "
    CREATE TABLE station (
        id INTEGER NOT NULL,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT,
        PRIMARY KEY (id)
    );
    CREATE TABLE measurement (
        id INTEGER NOT NULL,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT,
        PRIMARY KEY (id)
    );
";

const SEED_SQL: &str = "
    INSERT INTO station (station, name, latitude, longitude, elevation) VALUES
        ('USC00519397', 'WAIKIKI 717.2, HI US', 21.2716, -157.8168, 3.0),
        ('USC00519281', 'WAIHEE 837.5, HI US', 21.45167, -157.84889, 32.9),
        ('USC00513117', 'KANEOHE 838.1, HI US', 21.4234, -157.8015, 14.6);

    INSERT INTO measurement (station, date, prcp, tobs) VALUES
        ('USC00519397', '2016-08-22', 0.0, 80.0),
        ('USC00519397', '2016-08-31', 0.13, 79.0),
        ('USC00519397', '2016-09-01', 0.05, 77.0),
        ('USC00519281', '2016-08-22', 0.4, 76.0),
        ('USC00519281', '2016-08-23', 1.79, 77.0),
        ('USC00519281', '2016-09-01', 0.02, 75.0),
        ('USC00519281', '2017-08-18', NULL, 79.0),
        ('USC00513117', '2017-08-23', 0.45, 82.0),
        ('USC00519397', '2017-08-23', 0.0, 81.0);
";

/// Seeded data file; removed when dropped.
pub(crate) struct SeededDatabase {
    _dir: TempDir,
    pub path: PathBuf,
}

impl SeededDatabase {
    pub fn database(&self) -> Database {
        Database::new(&self.path, RetryConfig::default())
    }
}

pub(crate) fn seeded_database() -> SeededDatabase {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("hawaii.sqlite");

    let conn = Connection::open(&path).expect("create fixture database");
    conn.execute_batch(SCHEMA_SQL).expect("create fixture schema");
    conn.execute_batch(SEED_SQL).expect("seed fixture rows");
    drop(conn);

    SeededDatabase { _dir: dir, path }
}

/// Same schema, no rows.
pub(crate) fn empty_database() -> SeededDatabase {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("hawaii.sqlite");

    let conn = Connection::open(&path).expect("create fixture database");
    conn.execute_batch(SCHEMA_SQL).expect("create fixture schema");
    drop(conn);

    SeededDatabase { _dir: dir, path }
}
