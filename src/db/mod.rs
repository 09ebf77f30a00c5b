//! Database layer
//!
//! Storage for the blog content, on either backend:
//! - SQLite (default, a single file or in-memory for tests)
//! - MySQL
//!
//! The driver is selected by configuration. Everything above this layer
//! talks to the storage gateway traits in [`repositories`].
//!
//! # Usage
//!
//! ```ignore
//! use glace_blog::config::DatabaseConfig;
//! use glace_blog::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
