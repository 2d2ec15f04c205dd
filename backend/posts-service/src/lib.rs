/// Posts Service Library
///
/// A small CRUD service for blog-style posts backed by a single SQLite table,
/// with a Prometheus request counter exposed on `/metrics`.
///
/// # Modules
///
/// - `app`: Application state and route/middleware wiring
/// - `config`: Configuration management
/// - `db`: Storage schema and the post repository
/// - `error`: Error types and HTTP mapping
/// - `handlers`: HTTP request handlers
/// - `metrics`: Request counter and the `/metrics` handler
/// - `middleware`: Request counting middleware
/// - `models`: The `Post` entity
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;

pub use app::{build_app, AppState};
pub use config::Config;
pub use error::{AppError, Result};

/// Name used for pool metrics and health responses.
pub const SERVICE_NAME: &str = "posts-service";
