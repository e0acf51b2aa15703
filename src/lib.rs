/// surfsup_service: read-only climate API over the Hawaii weather observations file.
///
/// # Module structure
///
/// ```text
/// surfsup_service
/// ├── model     — record types (Station, Measurement) and response shapes
/// ├── config    — service configuration loader (surfsup.toml + DATABASE_URL)
/// ├── db        — request-scoped read-only SQLite sessions, startup verification
/// ├── queries   — one SQL query per endpoint, rows → records
/// ├── handlers  — route handlers: session → query → response structure
/// ├── endpoint  — routing table, tiny_http server loop, worker pool
/// └── fixtures (test only) — seeded temp-dir copy of the data file
/// ```

/// Public modules
pub mod config;
pub mod db;
pub mod endpoint;
pub mod handlers;
pub mod model;
pub mod queries;

#[cfg(test)]
pub(crate) mod fixtures;
