/// Data models for posts-service
use serde::Serialize;

/// A persisted post.
///
/// Serialized field order is `id`, `title`, `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
}
