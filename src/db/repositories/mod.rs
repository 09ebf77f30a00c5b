//! Database repositories
//!
//! The storage gateway: one repository per record kind, all sharing the
//! generic [`CrudRepository`] contract. Absence is reported as `None` or
//! `false`, never as an error. Multi-row writes (article save and delete,
//! tag delete) run inside a single transaction.

pub mod article;
pub mod catalogue;
pub mod comment;
pub mod tag;

use anyhow::Result;
use async_trait::async_trait;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use catalogue::{CatalogueRepository, SqlxCatalogueRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use tag::{SqlxTagRepository, TagRepository};

/// Primary-key access shared by every record kind
#[async_trait]
pub trait CrudRepository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Get a record by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<T>>;

    /// Insert the record when its id is `0`, otherwise update it in place.
    ///
    /// Returns the stored record with its assigned id. Updating a row that
    /// does not exist is an error.
    async fn save(&self, record: &T) -> Result<T>;

    /// Delete a record, returning `false` when it did not exist
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// All records in id order
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Records whose id is in `ids`, in id order. Unknown ids are skipped.
    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<T>>;
}

/// `?, ?, ?` for an `IN (...)` clause with `count` bound values
pub(crate) fn id_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
