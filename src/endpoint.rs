/// HTTP endpoint for the climate API
///
/// Binds the route handlers to fixed URL paths and serves them from a
/// worker pool. The routing table is built once at startup; static routes
/// are registered before parameterized ones so `/api/v1.0/stations` is
/// never read as a start date.
///
/// Endpoints:
/// - GET /                           - welcome text and route list (HTML)
/// - GET /api/v1.0/precipitation     - {date: prcp, ...}
/// - GET /api/v1.0/stations          - [{station, name, latitude, longitude}, ...]
/// - GET /api/v1.0/tobs              - [{date, tobs}, ...]
/// - GET /api/v1.0/{start}           - [{minimum/average/max temperature}]
/// - GET /api/v1.0/{start}/{end}     - [] or [{minimum/average/max temperature}]
/// - GET /health                     - service health check

use crate::config::ServiceConfig;
use crate::db::{Database, DbError};
use crate::handlers;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use threadpool::ThreadPool;
use tiny_http::Method;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Handler failure, reported to the client as a 500
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Server startup failure
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to start HTTP server on {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Fully rendered response, independent of the HTTP library
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    /// Pretty-printed JSON with sorted object keys and a trailing newline
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_JSON,
            body: format!("{:#}\n", value),
        }
    }

    /// Serializes a handler result through `serde_json::Value` so keys come out sorted
    pub fn ok_json<T: Serialize>(data: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(data)?;
        Ok(Self::json(200, &value))
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_HTML,
            body: body.to_string(),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, &serde_json::json!({ "error": message }))
    }

    /// Convert into a tiny_http response
    pub fn into_http(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let response = tiny_http::Response::from_string(self.body)
            .with_status_code(tiny_http::StatusCode(self.status));

        match tiny_http::Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

// ---------------------------------------------------------------------------
// Routing table
// ---------------------------------------------------------------------------

/// Route handler: database handle plus decoded path parameters, in order
pub type Handler = fn(&Database, &[String]) -> Result<ApiResponse, ApiError>;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(&'static str),
    Param,
}

/// One entry of the routing table
pub struct Route {
    pattern: &'static str,
    segments: Vec<Segment>,
    handler: Handler,
}

impl Route {
    /// `pattern` uses `<name>` for a path parameter, e.g. `/api/v1.0/<start>`
    pub fn new(pattern: &'static str, handler: Handler) -> Self {
        let segments = split_path(pattern)
            .into_iter()
            .map(|seg| {
                if seg.starts_with('<') && seg.ends_with('>') {
                    Segment::Param
                } else {
                    Segment::Literal(seg)
                }
            })
            .collect();

        Self {
            pattern,
            segments,
            handler,
        }
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Returns the parameter values when every segment matches.
    /// Parameters never match an empty segment.
    fn matches(&self, path: &[String]) -> Option<Vec<String>> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (expected, actual) in self.segments.iter().zip(path) {
            match expected {
                Segment::Literal(lit) if *lit == actual.as_str() => {}
                Segment::Param if !actual.is_empty() => params.push(actual.clone()),
                _ => return None,
            }
        }
        Some(params)
    }
}

/// Ordered routing table; the first matching route wins
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route(mut self, pattern: &'static str, handler: Handler) -> Self {
        self.routes.push(Route::new(pattern, handler));
        self
    }

    /// The climate API routing table
    pub fn climate_api() -> Self {
        Router::new()
            .route("/", route_welcome)
            .route("/health", route_health)
            .route("/api/v1.0/precipitation", route_precipitation)
            .route("/api/v1.0/stations", route_stations)
            .route("/api/v1.0/tobs", route_tobs)
            .route("/api/v1.0/<start>", route_temperature_from)
            .route("/api/v1.0/<start>/<end>", route_temperature_between)
    }

    pub fn patterns(&self) -> Vec<&'static str> {
        self.routes.iter().map(Route::pattern).collect()
    }

    /// Resolve and run the handler for a request line. Never fails: faults
    /// become 500 responses, unknown paths 404.
    pub fn dispatch(&self, db: &Database, method: &Method, url: &str) -> ApiResponse {
        if !matches!(method, Method::Get | Method::Head) {
            return ApiResponse::error(405, "Method not allowed");
        }

        let decoded = decode_path(strip_query(url));
        let path: Vec<String> = split_path(&decoded)
            .into_iter()
            .map(String::from)
            .collect();

        for route in &self.routes {
            if let Some(params) = route.matches(&path) {
                return match (route.handler)(db, &params) {
                    Ok(response) => response,
                    Err(e) => {
                        log::error!("{} failed: {}", route.pattern, e);
                        ApiResponse::error(500, "Internal server error")
                    }
                };
            }
        }

        ApiResponse::json(
            404,
            &serde_json::json!({
                "error": "Not found",
                "available_endpoints": self.patterns(),
            }),
        )
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// `/` splits to no segments; a trailing slash leaves an empty last segment
fn split_path(path: &str) -> Vec<&str> {
    match path.strip_prefix('/').unwrap_or(path) {
        "" => Vec::new(),
        rest => rest.split('/').collect(),
    }
}

/// Decodes the whole path before routing, so an encoded `/` separates
/// segments just like a literal one
fn decode_path(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

// ---------------------------------------------------------------------------
// Route adapters
// ---------------------------------------------------------------------------

fn route_welcome(_db: &Database, _params: &[String]) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::html(200, handlers::welcome()))
}

fn route_health(_db: &Database, _params: &[String]) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::json(
        200,
        &serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    ))
}

fn route_precipitation(db: &Database, _params: &[String]) -> Result<ApiResponse, ApiError> {
    ApiResponse::ok_json(&handlers::precipitation(db)?)
}

fn route_stations(db: &Database, _params: &[String]) -> Result<ApiResponse, ApiError> {
    ApiResponse::ok_json(&handlers::stations(db)?)
}

fn route_tobs(db: &Database, _params: &[String]) -> Result<ApiResponse, ApiError> {
    ApiResponse::ok_json(&handlers::tobs(db)?)
}

fn route_temperature_from(db: &Database, params: &[String]) -> Result<ApiResponse, ApiError> {
    let [start] = params else {
        return Ok(ApiResponse::error(404, "Not found"));
    };
    ApiResponse::ok_json(&handlers::temperature_from(db, start)?)
}

fn route_temperature_between(db: &Database, params: &[String]) -> Result<ApiResponse, ApiError> {
    let [start, end] = params else {
        return Ok(ApiResponse::error(404, "Not found"));
    };
    ApiResponse::ok_json(&handlers::temperature_between(db, start, end)?)
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Bound HTTP server, ready to serve with `run`
pub struct ApiServer {
    server: tiny_http::Server,
    router: Arc<Router>,
    db: Arc<Database>,
    worker_threads: usize,
}

impl ApiServer {
    /// Bind the listen address from `config`
    pub fn bind(config: &ServiceConfig, db: Database) -> Result<Self, ServerError> {
        let addr = config.listen_addr();
        let server = tiny_http::Server::http(&addr).map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            server,
            router: Arc::new(Router::climate_api()),
            db: Arc::new(db),
            worker_threads: config.worker_threads.max(1),
        })
    }

    /// Actual bound address (useful when the configured port is 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests until the listener shuts down
    pub fn run(self) {
        let pool = ThreadPool::new(self.worker_threads);

        match self.local_addr() {
            Some(addr) => log::info!("HTTP endpoint listening on http://{}", addr),
            None => log::info!("HTTP endpoint listening"),
        }
        for pattern in self.router.patterns() {
            log::info!("   GET {}", pattern);
        }

        for request in self.server.incoming_requests() {
            let router = Arc::clone(&self.router);
            let db = Arc::clone(&self.db);
            pool.execute(move || handle_request(&router, &db, request));
        }

        pool.join();
    }
}

fn handle_request(router: &Router, db: &Database, request: tiny_http::Request) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();

    let response = router.dispatch(db, &method, &url);
    let status = response.status;

    if let Err(e) = request.respond(response.into_http()) {
        log::warn!("Failed to send response for {} {}: {}", method, url, e);
    }

    log::info!("{} {} {} ({:?})", method, url, status, started.elapsed());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
