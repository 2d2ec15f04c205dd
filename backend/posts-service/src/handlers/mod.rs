/// HTTP handlers for posts-service
///
/// - Posts: list, create, update (partial) and delete
/// - Health: database liveness check
pub mod health;
pub mod posts;

// Re-export handler functions at module level
pub use posts::{create_post, delete_post, list_posts, not_found, update_post};
