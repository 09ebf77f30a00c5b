//! Tag repository
//!
//! Database operations for tags.
//!
//! This module provides:
//! - `TagRepository` trait, the tag flavour of [`CrudRepository`]
//! - `SqlxTagRepository` implementing it for SQLite and MySQL
//!
//! Deleting a tag detaches it from every article in the same transaction.

use crate::config::DatabaseDriver;
use crate::db::repositories::{id_placeholders, CrudRepository};
use crate::db::DynDatabasePool;
use crate::models::Tag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
pub trait TagRepository: CrudRepository<Tag> {}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

impl TagRepository for SqlxTagRepository {}

#[async_trait]
impl CrudRepository<Tag> for SqlxTagRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_tag_by_id_sqlite(self.pool.require_sqlite()?, id).await,
            DatabaseDriver::Mysql => get_tag_by_id_mysql(self.pool.require_mysql()?, id).await,
        }
    }

    async fn save(&self, tag: &Tag) -> Result<Tag> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => save_tag_sqlite(self.pool.require_sqlite()?, tag).await,
            DatabaseDriver::Mysql => save_tag_mysql(self.pool.require_mysql()?, tag).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_tag_sqlite(self.pool.require_sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_tag_mysql(self.pool.require_mysql()?, id).await,
        }
    }

    async fn find_all(&self) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_tags_sqlite(self.pool.require_sqlite()?).await,
            DatabaseDriver::Mysql => list_tags_mysql(self.pool.require_mysql()?).await,
        }
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tags_by_ids_sqlite(self.pool.require_sqlite()?, ids).await
            }
            DatabaseDriver::Mysql => get_tags_by_ids_mysql(self.pool.require_mysql()?, ids).await,
        }
    }
}

const SELECT_TAG_BY_ID: &str = "SELECT id, name FROM tags WHERE id = ?";
const LIST_TAGS: &str = "SELECT id, name FROM tags ORDER BY id";
const INSERT_TAG: &str = "INSERT INTO tags (name) VALUES (?)";
const UPDATE_TAG: &str = "UPDATE tags SET name = ? WHERE id = ?";
const DETACH_TAG: &str = "DELETE FROM article_tags WHERE tag_id = ?";
const DELETE_TAG: &str = "DELETE FROM tags WHERE id = ?";

fn tags_by_ids_sql(count: usize) -> String {
    format!(
        "SELECT id, name FROM tags WHERE id IN ({}) ORDER BY id",
        id_placeholders(count)
    )
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_tag_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query(SELECT_TAG_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn save_tag_sqlite(pool: &SqlitePool, tag: &Tag) -> Result<Tag> {
    if tag.id == 0 {
        let result = sqlx::query(INSERT_TAG)
            .bind(&tag.name)
            .execute(pool)
            .await
            .context("Failed to create tag")?;

        return Ok(Tag {
            id: result.last_insert_rowid(),
            name: tag.name.clone(),
        });
    }

    sqlx::query(UPDATE_TAG)
        .bind(&tag.name)
        .bind(tag.id)
        .execute(pool)
        .await
        .context("Failed to update tag")?;

    get_tag_by_id_sqlite(pool, tag.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Tag {} does not exist", tag.id))
}

async fn delete_tag_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(DETACH_TAG)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach tag from articles")?;

    let result = sqlx::query(DELETE_TAG)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete tag")?;

    tx.commit().await.context("Failed to commit tag deletion")?;

    Ok(result.rows_affected() > 0)
}

async fn list_tags_sqlite(pool: &SqlitePool) -> Result<Vec<Tag>> {
    let rows = sqlx::query(LIST_TAGS)
        .fetch_all(pool)
        .await
        .context("Failed to list tags")?;

    rows.iter().map(row_to_tag_sqlite).collect()
}

async fn get_tags_by_ids_sqlite(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<Tag>> {
    let sql = tags_by_ids_sql(ids.len());
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get tags by IDs")?;

    rows.iter().map(row_to_tag_sqlite).collect()
}

fn row_to_tag_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_tag_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query(SELECT_TAG_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn save_tag_mysql(pool: &MySqlPool, tag: &Tag) -> Result<Tag> {
    if tag.id == 0 {
        let result = sqlx::query(INSERT_TAG)
            .bind(&tag.name)
            .execute(pool)
            .await
            .context("Failed to create tag")?;

        return Ok(Tag {
            id: result.last_insert_id() as i64,
            name: tag.name.clone(),
        });
    }

    sqlx::query(UPDATE_TAG)
        .bind(&tag.name)
        .bind(tag.id)
        .execute(pool)
        .await
        .context("Failed to update tag")?;

    get_tag_by_id_mysql(pool, tag.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Tag {} does not exist", tag.id))
}

async fn delete_tag_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(DETACH_TAG)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach tag from articles")?;

    let result = sqlx::query(DELETE_TAG)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete tag")?;

    tx.commit().await.context("Failed to commit tag deletion")?;

    Ok(result.rows_affected() > 0)
}

async fn list_tags_mysql(pool: &MySqlPool) -> Result<Vec<Tag>> {
    let rows = sqlx::query(LIST_TAGS)
        .fetch_all(pool)
        .await
        .context("Failed to list tags")?;

    rows.iter().map(row_to_tag_mysql).collect()
}

async fn get_tags_by_ids_mysql(pool: &MySqlPool, ids: &[i64]) -> Result<Vec<Tag>> {
    let sql = tags_by_ids_sql(ids.len());
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get tags by IDs")?;

    rows.iter().map(row_to_tag_mysql).collect()
}

fn row_to_tag_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
    })
}
