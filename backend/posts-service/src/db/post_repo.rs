//! Post repository.
//!
//! Single-row statements are read with `fetch_all`: SQLite only ends the
//! statement's implicit transaction once it has been stepped to completion,
//! and until then other pool connections do not see the write.

use crate::models::Post;
use sqlx::SqlitePool;

/// Fetch every post, oldest first (ascending id)
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content
        FROM post
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Insert a new post and return the persisted row
pub async fn create_post(
    pool: &SqlitePool,
    title: &str,
    content: &str,
) -> Result<Post, sqlx::Error> {
    let rows = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO post (title, content)
        VALUES (?1, ?2)
        RETURNING id, title, content
        "#,
    )
    .bind(title)
    .bind(content)
    .fetch_all(pool)
    .await?;

    rows.into_iter().next().ok_or(sqlx::Error::RowNotFound)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &SqlitePool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content
        FROM post
        WHERE id = ?1
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().next())
}

/// Overwrite the supplied fields of a post, leaving the others untouched.
///
/// Returns `None` if no post has this id.
pub async fn update_post(
    pool: &SqlitePool,
    post_id: i64,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Option<Post>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Post>(
        r#"
        UPDATE post
        SET title = COALESCE(?1, title),
            content = COALESCE(?2, content)
        WHERE id = ?3
        RETURNING id, title, content
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().next())
}

/// Hard-delete a post. Returns `false` if no post has this id.
pub async fn delete_post(pool: &SqlitePool, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM post WHERE id = ?1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
