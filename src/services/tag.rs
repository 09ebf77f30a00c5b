//! Tag service
//!
//! CRUD for tags plus the batch lookup the article service uses to resolve
//! tag ids. Names are trimmed and must not be blank.

use crate::db::repositories::{CrudRepository, TagRepository};
use crate::models::Tag;
use crate::services::error::{RecordKind, ServiceError};
use std::sync::Arc;

/// Tag service for managing blog tags
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    /// Create a new tag service
    ///
    /// # Arguments
    /// * `repo` - Tag repository for database operations
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    /// Create a new tag
    ///
    /// # Errors
    /// - `InvalidParameter` if the name is blank
    /// - `RepositoryFailure` if the store rejects it, e.g. a duplicate name
    pub async fn create(&self, name: &str) -> Result<Tag, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid_parameter(
                "Tag name must be not null or empty",
            ));
        }

        let tag = self.repo.save(&Tag::new(name)).await.map_err(|e| {
            tracing::warn!("Failed to create tag {:?}: {:#}", name, e);
            ServiceError::repository(RecordKind::Tag, e)
        })?;

        tracing::info!("Created tag {} ({})", tag.id, tag.name);
        Ok(tag)
    }

    /// Get tag by ID
    ///
    /// # Errors
    /// - `NotFound` if no tag has this id
    pub async fn get_by_id(&self, id: i64) -> Result<Tag, ServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Tag, e))?
            .ok_or_else(|| ServiceError::not_found(RecordKind::Tag, id))
    }

    /// The existing subset of `ids`, in id order
    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>, ServiceError> {
        self.repo
            .find_all_by_ids(ids)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Tag, e))
    }

    /// Rename a tag in place
    ///
    /// The new name is validated before the tag is loaded.
    pub async fn update(&self, id: i64, new_name: &str) -> Result<Tag, ServiceError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ServiceError::invalid_parameter(
                "New tag name can not be empty",
            ));
        }

        let mut tag = self.get_by_id(id).await?;
        tag.name = new_name.to_string();

        let tag = self
            .repo
            .save(&tag)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Tag, e))?;

        tracing::info!("Renamed tag {} to {}", tag.id, tag.name);
        Ok(tag)
    }

    /// Delete a tag, detaching it from every article
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Tag, e))?;

        if !deleted {
            return Err(ServiceError::not_found(RecordKind::Tag, id));
        }

        tracing::info!("Deleted tag {}", id);
        Ok(())
    }

    /// List all tags in id order
    pub async fn list(&self) -> Result<Vec<Tag>, ServiceError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Tag, e))
    }
}
