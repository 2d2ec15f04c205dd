use actix_web::{web, HttpServer};
use posts_service::{build_app, db, AppState, Config, SERVICE_NAME};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Call the local `/health` endpoint; used as the container healthcheck.
async fn run_healthcheck(port: u16) -> io::Result<()> {
    let url = format!("http://127.0.0.1:{}/health", port);
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

/// Posts Service
///
/// Serves blog-style posts from a single SQLite table.
///
/// # Routes
///
/// - `GET /api/posts` - list posts
/// - `POST /api/posts` - create a post
/// - `PUT /api/posts/{id}` - update title and/or content
/// - `DELETE /api/posts/{id}` - delete a post
/// - `GET /metrics` - Prometheus request counters
/// - `GET /health` - liveness check
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Support container healthchecks via CLI subcommand: `healthcheck-http` or `healthcheck`
    if let Some(cmd) = std::env::args().nth(1) {
        if cmd == "healthcheck" || cmd == "healthcheck-http" {
            return run_healthcheck(config.app.port).await;
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let database_path = config.database.database_path();
    let db_pool = match db::connect(SERVICE_NAME, &database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database initialization failed: {:#}", e);
            eprintln!("ERROR: Failed to open database {}: {}", database_path.display(), e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(db_pool.clone()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to register metrics: {e}"),
        )
    })?;
    let state = web::Data::new(state);

    let http_bind_address = config.app.bind_address();
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let mut server = HttpServer::new(move || build_app(state.clone()));
    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    server.bind(&http_bind_address)?.run().await?;

    tracing::info!("{} shutting down", SERVICE_NAME);
    db_pool.close().await;

    Ok(())
}
