//! Shared fixtures for posts-service integration tests.

use actix_web::web;
use posts_service::{db, AppState};
use tempfile::TempDir;

/// Isolated application state on a fresh database in a temp directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn test_state() -> (TempDir, web::Data<AppState>) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let pool = db::connect("posts-test", &dir.path().join("data").join("app.db"))
        .await
        .expect("failed to open test database");
    let state = AppState::new(pool).expect("failed to build app state");
    (dir, web::Data::new(state))
}
