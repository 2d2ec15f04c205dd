use crate::app::AppState;
use crate::SERVICE_NAME;
use actix_web::{web, HttpResponse};

/// Liveness check backed by a trivial database round trip
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(state.db()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "error": format!("SQLite query failed: {}", e),
                "service": SERVICE_NAME
            }))
        }
    }
}
