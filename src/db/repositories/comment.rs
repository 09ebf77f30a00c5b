//! Comment repository
//!
//! Database operations for comments. Comments are always listed in the
//! order they were written.

use crate::config::DatabaseDriver;
use crate::db::repositories::{id_placeholders, CrudRepository};
use crate::db::DynDatabasePool;
use crate::models::Comment;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: CrudRepository<Comment> {
    /// Comments on an article, oldest first
    async fn find_by_article_id(&self, article_id: i64) -> Result<Vec<Comment>>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CrudRepository<Comment> for SqlxCommentRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_comment_by_id_sqlite(self.pool.require_sqlite()?, id).await
            }
            DatabaseDriver::Mysql => get_comment_by_id_mysql(self.pool.require_mysql()?, id).await,
        }
    }

    async fn save(&self, comment: &Comment) -> Result<Comment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                save_comment_sqlite(self.pool.require_sqlite()?, comment).await
            }
            DatabaseDriver::Mysql => save_comment_mysql(self.pool.require_mysql()?, comment).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(DELETE_COMMENT)
                .bind(id)
                .execute(self.pool.require_sqlite()?)
                .await
                .context("Failed to delete comment")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(DELETE_COMMENT)
                .bind(id)
                .execute(self.pool.require_mysql()?)
                .await
                .context("Failed to delete comment")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn find_all(&self) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(LIST_COMMENTS)
                    .fetch_all(self.pool.require_sqlite()?)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(LIST_COMMENTS)
                    .fetch_all(self.pool.require_mysql()?)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_mysql).collect()
            }
        }
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<Comment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{} WHERE id IN ({}) ORDER BY id",
            SELECT_COMMENTS,
            id_placeholders(ids.len())
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let mut query = sqlx::query(&sql);
                for id in ids {
                    query = query.bind(*id);
                }
                let rows = query
                    .fetch_all(self.pool.require_sqlite()?)
                    .await
                    .context("Failed to get comments by IDs")?;
                rows.iter().map(row_to_comment_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let mut query = sqlx::query(&sql);
                for id in ids {
                    query = query.bind(*id);
                }
                let rows = query
                    .fetch_all(self.pool.require_mysql()?)
                    .await
                    .context("Failed to get comments by IDs")?;
                rows.iter().map(row_to_comment_mysql).collect()
            }
        }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn find_by_article_id(&self, article_id: i64) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(LIST_COMMENTS_BY_ARTICLE)
                    .bind(article_id)
                    .fetch_all(self.pool.require_sqlite()?)
                    .await
                    .context("Failed to get comments by article")?;
                rows.iter().map(row_to_comment_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(LIST_COMMENTS_BY_ARTICLE)
                    .bind(article_id)
                    .fetch_all(self.pool.require_mysql()?)
                    .await
                    .context("Failed to get comments by article")?;
                rows.iter().map(row_to_comment_mysql).collect()
            }
        }
    }
}

const SELECT_COMMENTS: &str =
    "SELECT id, article_id, content, from_user, to_user, created_time FROM comments";
const SELECT_COMMENT_BY_ID: &str = r#"
    SELECT id, article_id, content, from_user, to_user, created_time
    FROM comments
    WHERE id = ?
"#;
const LIST_COMMENTS: &str = r#"
    SELECT id, article_id, content, from_user, to_user, created_time
    FROM comments
    ORDER BY id
"#;
const LIST_COMMENTS_BY_ARTICLE: &str = r#"
    SELECT id, article_id, content, from_user, to_user, created_time
    FROM comments
    WHERE article_id = ?
    ORDER BY id
"#;
const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (article_id, content, from_user, to_user, created_time)
    VALUES (?, ?, ?, ?, ?)
"#;
const UPDATE_COMMENT: &str = r#"
    UPDATE comments
    SET content = ?, from_user = ?, to_user = ?
    WHERE id = ?
"#;
const DELETE_COMMENT: &str = "DELETE FROM comments WHERE id = ?";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_comment_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(SELECT_COMMENT_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_comment_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn save_comment_sqlite(pool: &SqlitePool, comment: &Comment) -> Result<Comment> {
    if comment.id == 0 {
        let result = sqlx::query(INSERT_COMMENT)
            .bind(comment.article_id)
            .bind(&comment.content)
            .bind(&comment.from_user)
            .bind(&comment.to_user)
            .bind(comment.created_time)
            .execute(pool)
            .await
            .context("Failed to create comment")?;

        return Ok(Comment {
            id: result.last_insert_rowid(),
            ..comment.clone()
        });
    }

    sqlx::query(UPDATE_COMMENT)
        .bind(&comment.content)
        .bind(&comment.from_user)
        .bind(&comment.to_user)
        .bind(comment.id)
        .execute(pool)
        .await
        .context("Failed to update comment")?;

    get_comment_by_id_sqlite(pool, comment.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Comment {} does not exist", comment.id))
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        content: row.get("content"),
        from_user: row.get("from_user"),
        to_user: row.get("to_user"),
        created_time: row.get("created_time"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_comment_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(SELECT_COMMENT_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_comment_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn save_comment_mysql(pool: &MySqlPool, comment: &Comment) -> Result<Comment> {
    if comment.id == 0 {
        let result = sqlx::query(INSERT_COMMENT)
            .bind(comment.article_id)
            .bind(&comment.content)
            .bind(&comment.from_user)
            .bind(&comment.to_user)
            .bind(comment.created_time)
            .execute(pool)
            .await
            .context("Failed to create comment")?;

        return Ok(Comment {
            id: result.last_insert_id() as i64,
            ..comment.clone()
        });
    }

    sqlx::query(UPDATE_COMMENT)
        .bind(&comment.content)
        .bind(&comment.from_user)
        .bind(&comment.to_user)
        .bind(comment.id)
        .execute(pool)
        .await
        .context("Failed to update comment")?;

    get_comment_by_id_mysql(pool, comment.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Comment {} does not exist", comment.id))
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        content: row.get("content"),
        from_user: row.get("from_user"),
        to_user: row.get("to_user"),
        created_time: row.get("created_time"),
    })
}
