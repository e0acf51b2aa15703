/// Shared setup for integration tests: a seeded data file and a running server.

use rusqlite::Connection;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::thread;
use surfsup_service::config::ServiceConfig;
use surfsup_service::db;
use surfsup_service::endpoint::ApiServer;
use tempfile::TempDir;

const FIXTURE_SQL: &str = "
    CREATE TABLE station (
        id INTEGER NOT NULL, station TEXT, name TEXT,
        latitude FLOAT, longitude FLOAT, elevation FLOAT,
        PRIMARY KEY (id)
    );
    CREATE TABLE measurement (
        id INTEGER NOT NULL, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT,
        PRIMARY KEY (id)
    );

    INSERT INTO station (station, name, latitude, longitude, elevation) VALUES
        ('USC00519397', 'WAIKIKI 717.2, HI US', 21.2716, -157.8168, 3.0),
        ('USC00519281', 'WAIHEE 837.5, HI US', 21.45167, -157.84889, 32.9);

    INSERT INTO measurement (station, date, prcp, tobs) VALUES
        ('USC00519281', '2016-08-20', 0.3, 74.0),
        ('USC00519281', '2016-08-23', 1.79, 77.0),
        ('USC00519397', '2016-09-01', 0.05, 80.0),
        ('USC00519281', '2016-09-01', 0.02, 76.0),
        ('USC00519397', '2017-08-23', 0.0, 81.0);
";

pub struct TestService {
    _dir: TempDir,
    pub base_url: String,
}

fn seed(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("hawaii.sqlite");
    let conn = Connection::open(&path).expect("create fixture database");
    conn.execute_batch(FIXTURE_SQL).expect("seed fixture database");
    path
}

/// Seeds a data file and starts the API on an ephemeral port.
pub fn start_service() -> TestService {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = seed(&dir);

    let config = ServiceConfig {
        database_url: format!("sqlite:///{}", path.display()),
        port: 0,
        worker_threads: 2,
        ..ServiceConfig::default()
    };

    let database = db::connect_and_verify(&config).expect("fixture should verify");
    let server = ApiServer::bind(&config, database).expect("bind ephemeral port");
    let addr: SocketAddr = server.local_addr().expect("server has an IP address");

    thread::spawn(move || server.run());

    TestService {
        _dir: dir,
        base_url: format!("http://{}", addr),
    }
}

pub fn get(service: &TestService, path: &str) -> reqwest::blocking::Response {
    reqwest::blocking::get(format!("{}{}", service.base_url, path))
        .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
}
