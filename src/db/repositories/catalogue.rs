//! Catalogue repository
//!
//! Database operations for catalogues.
//!
//! This module provides:
//! - `CatalogueRepository` trait, the catalogue flavour of [`CrudRepository`]
//! - `SqlxCatalogueRepository` implementing it for SQLite and MySQL
//!
//! The store refuses to delete a catalogue that articles still reference.

use crate::config::DatabaseDriver;
use crate::db::repositories::{id_placeholders, CrudRepository};
use crate::db::DynDatabasePool;
use crate::models::Catalogue;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Catalogue repository trait
pub trait CatalogueRepository: CrudRepository<Catalogue> {}

/// SQLx-based catalogue repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCatalogueRepository {
    pool: DynDatabasePool,
}

impl SqlxCatalogueRepository {
    /// Create a new SQLx catalogue repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CatalogueRepository> {
        Arc::new(Self::new(pool))
    }
}

impl CatalogueRepository for SqlxCatalogueRepository {}

#[async_trait]
impl CrudRepository<Catalogue> for SqlxCatalogueRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Catalogue>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_catalogue_by_id_sqlite(self.pool.require_sqlite()?, id).await
            }
            DatabaseDriver::Mysql => {
                get_catalogue_by_id_mysql(self.pool.require_mysql()?, id).await
            }
        }
    }

    async fn save(&self, catalogue: &Catalogue) -> Result<Catalogue> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                save_catalogue_sqlite(self.pool.require_sqlite()?, catalogue).await
            }
            DatabaseDriver::Mysql => {
                save_catalogue_mysql(self.pool.require_mysql()?, catalogue).await
            }
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_catalogue_sqlite(self.pool.require_sqlite()?, id).await
            }
            DatabaseDriver::Mysql => {
                delete_catalogue_mysql(self.pool.require_mysql()?, id).await
            }
        }
    }

    async fn find_all(&self) -> Result<Vec<Catalogue>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_catalogues_sqlite(self.pool.require_sqlite()?).await,
            DatabaseDriver::Mysql => list_catalogues_mysql(self.pool.require_mysql()?).await,
        }
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<Catalogue>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_catalogues_by_ids_sqlite(self.pool.require_sqlite()?, ids).await
            }
            DatabaseDriver::Mysql => {
                get_catalogues_by_ids_mysql(self.pool.require_mysql()?, ids).await
            }
        }
    }
}

const SELECT_CATALOGUE_BY_ID: &str = "SELECT id, name FROM catalogues WHERE id = ?";
const LIST_CATALOGUES: &str = "SELECT id, name FROM catalogues ORDER BY id";
const INSERT_CATALOGUE: &str = "INSERT INTO catalogues (name) VALUES (?)";
const UPDATE_CATALOGUE: &str = "UPDATE catalogues SET name = ? WHERE id = ?";
const DELETE_CATALOGUE: &str = "DELETE FROM catalogues WHERE id = ?";

fn catalogues_by_ids_sql(count: usize) -> String {
    format!(
        "SELECT id, name FROM catalogues WHERE id IN ({}) ORDER BY id",
        id_placeholders(count)
    )
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_catalogue_by_id_sqlite(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Catalogue>> {
    let row = sqlx::query(SELECT_CATALOGUE_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get catalogue by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_catalogue_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn save_catalogue_sqlite(
    pool: &SqlitePool,
    catalogue: &Catalogue,
) -> Result<Catalogue> {
    if catalogue.id == 0 {
        let result = sqlx::query(INSERT_CATALOGUE)
            .bind(&catalogue.name)
            .execute(pool)
            .await
            .context("Failed to create catalogue")?;

        return Ok(Catalogue {
            id: result.last_insert_rowid(),
            name: catalogue.name.clone(),
        });
    }

    sqlx::query(UPDATE_CATALOGUE)
        .bind(&catalogue.name)
        .bind(catalogue.id)
        .execute(pool)
        .await
        .context("Failed to update catalogue")?;

    get_catalogue_by_id_sqlite(pool, catalogue.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Catalogue {} does not exist", catalogue.id))
}

async fn delete_catalogue_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query(DELETE_CATALOGUE)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete catalogue")?;

    Ok(result.rows_affected() > 0)
}

async fn list_catalogues_sqlite(pool: &SqlitePool) -> Result<Vec<Catalogue>> {
    let rows = sqlx::query(LIST_CATALOGUES)
        .fetch_all(pool)
        .await
        .context("Failed to list catalogues")?;

    rows.iter().map(row_to_catalogue_sqlite).collect()
}

async fn get_catalogues_by_ids_sqlite(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<Vec<Catalogue>> {
    let sql = catalogues_by_ids_sql(ids.len());
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get catalogues by IDs")?;

    rows.iter().map(row_to_catalogue_sqlite).collect()
}

fn row_to_catalogue_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Catalogue> {
    Ok(Catalogue {
        id: row.get("id"),
        name: row.get("name"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_catalogue_by_id_mysql(
    pool: &MySqlPool,
    id: i64,
) -> Result<Option<Catalogue>> {
    let row = sqlx::query(SELECT_CATALOGUE_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get catalogue by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_catalogue_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn save_catalogue_mysql(pool: &MySqlPool, catalogue: &Catalogue) -> Result<Catalogue> {
    if catalogue.id == 0 {
        let result = sqlx::query(INSERT_CATALOGUE)
            .bind(&catalogue.name)
            .execute(pool)
            .await
            .context("Failed to create catalogue")?;

        return Ok(Catalogue {
            id: result.last_insert_id() as i64,
            name: catalogue.name.clone(),
        });
    }

    sqlx::query(UPDATE_CATALOGUE)
        .bind(&catalogue.name)
        .bind(catalogue.id)
        .execute(pool)
        .await
        .context("Failed to update catalogue")?;

    get_catalogue_by_id_mysql(pool, catalogue.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Catalogue {} does not exist", catalogue.id))
}

async fn delete_catalogue_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query(DELETE_CATALOGUE)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete catalogue")?;

    Ok(result.rows_affected() > 0)
}

async fn list_catalogues_mysql(pool: &MySqlPool) -> Result<Vec<Catalogue>> {
    let rows = sqlx::query(LIST_CATALOGUES)
        .fetch_all(pool)
        .await
        .context("Failed to list catalogues")?;

    rows.iter().map(row_to_catalogue_mysql).collect()
}

async fn get_catalogues_by_ids_mysql(
    pool: &MySqlPool,
    ids: &[i64],
) -> Result<Vec<Catalogue>> {
    let sql = catalogues_by_ids_sql(ids.len());
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get catalogues by IDs")?;

    rows.iter().map(row_to_catalogue_mysql).collect()
}

fn row_to_catalogue_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Catalogue> {
    Ok(Catalogue {
        id: row.get("id"),
        name: row.get("name"),
    })
}
