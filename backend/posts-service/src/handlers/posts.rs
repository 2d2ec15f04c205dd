/// Post handlers - HTTP endpoints for post operations
use crate::app::AppState;
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::models::Post;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::Value;

pub const FIELDS_REQUIRED: &str = "Title and content are required.";
pub const POST_NOT_FOUND: &str = "Post not found";
pub const INVALID_JSON: &str = "Invalid JSON body.";

/// JSON object body. Duplicate keys keep their last value.
type JsonObject = serde_json::Map<String, Value>;

/// Parse a request body that must be a single JSON object.
fn parse_object(body: &[u8]) -> Option<JsonObject> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Read an optional string field: absent or `null` is `None`, any other
/// non-string value is `Err(())`.
fn string_field(object: &mut JsonObject, key: &str) -> std::result::Result<Option<String>, ()> {
    match object.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(()),
    }
}

#[derive(Debug, Serialize)]
pub struct PostEnvelope {
    pub message: String,
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List all posts
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = post_repo::list_posts(state.db()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Create a new post
///
/// The body is read as JSON whatever the `Content-Type`; anything that does
/// not yield both `title` and `content` strings is a 400.
pub async fn create_post(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let required = || AppError::BadRequest(FIELDS_REQUIRED.to_string());

    let mut object = parse_object(&body).ok_or_else(required)?;
    let title = string_field(&mut object, "title").ok().flatten();
    let content = string_field(&mut object, "content").ok().flatten();
    let (title, content) = title.zip(content).ok_or_else(required)?;

    let post = post_repo::create_post(state.db(), &title, &content).await?;
    tracing::info!(post_id = post.id, "post created");

    Ok(HttpResponse::Created().json(PostEnvelope {
        message: "Post created".to_string(),
        post,
    }))
}

/// Update a post in place.
///
/// Despite the PUT verb this is a partial update: only fields present in the
/// body are overwritten. An empty body changes nothing.
pub async fn update_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();

    let invalid = |_| AppError::BadRequest(INVALID_JSON.to_string());

    let mut object = if body.iter().all(u8::is_ascii_whitespace) {
        JsonObject::new()
    } else {
        parse_object(&body).ok_or(()).map_err(invalid)?
    };
    let title = string_field(&mut object, "title").map_err(invalid)?;
    let content = string_field(&mut object, "content").map_err(invalid)?;

    let post = post_repo::update_post(
        state.db(),
        post_id,
        title.as_deref(),
        content.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(POST_NOT_FOUND.to_string()))?;

    tracing::info!(post_id, "post updated");

    Ok(HttpResponse::Ok().json(PostEnvelope {
        message: format!("Post {} updated", post_id),
        post,
    }))
}

/// Delete a post
pub async fn delete_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();

    if !post_repo::delete_post(state.db(), post_id).await? {
        return Err(AppError::NotFound(POST_NOT_FOUND.to_string()));
    }

    tracing::info!(post_id, "post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Post {} deleted", post_id),
    }))
}

/// Fallback for paths no route matches
pub async fn not_found() -> Result<HttpResponse> {
    Err(AppError::NotFound("Not found".to_string()))
}
