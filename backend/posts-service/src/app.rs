//! Application state and HTTP wiring.
//!
//! `AppState` is built once at startup and injected into every handler as
//! `web::Data<AppState>`. `build_app` assembles routes and middleware so the
//! binary and the integration tests serve the exact same `App`.

use crate::error::AppError;
use crate::metrics::RequestMetrics;
use crate::middleware::RequestCounter;
use crate::{handlers, metrics, SERVICE_NAME};
use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App,
};
use db_pool::PoolMetrics;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Request bodies above this size are rejected with 413.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Shared application context
pub struct AppState {
    db: SqlitePool,
    metrics: Arc<RequestMetrics>,
    pool_metrics: PoolMetrics,
}

impl AppState {
    /// Build state around an already-initialized pool.
    pub fn new(db: SqlitePool) -> Result<Self, prometheus::Error> {
        let metrics = Arc::new(RequestMetrics::new()?);
        let pool_metrics = PoolMetrics::register(metrics.registry(), SERVICE_NAME)?;

        Ok(Self {
            db,
            metrics,
            pool_metrics,
        })
    }

    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    pub fn metrics(&self) -> &Arc<RequestMetrics> {
        &self.metrics
    }

    pub fn pool_metrics(&self) -> &PoolMetrics {
        &self.pool_metrics
    }
}

fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Assemble the posts-service `App`.
///
/// The request counter is the outermost business middleware, so it sees
/// CORS preflights and unmatched routes before anything can short-circuit.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let counter = RequestCounter::new(Arc::clone(state.metrics()));

    App::new()
        .app_data(state)
        .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .app_data(
            web::PathConfig::default()
                .error_handler(|_, _| AppError::NotFound("Not found".into()).into()),
        )
        .wrap(cors())
        .wrap(counter)
        .wrap(Logger::default())
        .wrap(tracing_actix_web::TracingLogger::default())
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/health", web::get().to(handlers::health::health_check))
        .service(
            web::resource("/api/posts")
                .route(web::get().to(handlers::list_posts))
                .route(web::post().to(handlers::create_post)),
        )
        .service(
            web::resource(r"/api/posts/{post_id:\d+}")
                .route(web::put().to(handlers::update_post))
                .route(web::delete().to(handlers::delete_post)),
        )
        .default_service(web::to(handlers::not_found))
}
