//! Catalogue service
//!
//! CRUD for catalogues. Names are trimmed and must not be blank. A
//! catalogue that still holds articles cannot be deleted.

use crate::db::repositories::{CatalogueRepository, CrudRepository};
use crate::models::Catalogue;
use crate::services::error::{RecordKind, ServiceError};
use std::sync::Arc;

/// Catalogue service for managing blog catalogues
pub struct CatalogueService {
    repo: Arc<dyn CatalogueRepository>,
}

impl CatalogueService {
    /// Create a new catalogue service
    ///
    /// # Arguments
    /// * `repo` - Catalogue repository for database operations
    pub fn new(repo: Arc<dyn CatalogueRepository>) -> Self {
        Self { repo }
    }

    /// Create a new catalogue
    ///
    /// # Errors
    /// - `InvalidParameter` if the name is blank
    /// - `RepositoryFailure` if the store rejects it, e.g. a duplicate name
    pub async fn create(&self, name: &str) -> Result<Catalogue, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid_parameter(
                "Catalogue name must be not null or empty",
            ));
        }

        let catalogue = self.repo.save(&Catalogue::new(name)).await.map_err(|e| {
            tracing::warn!("Failed to create catalogue {:?}: {:#}", name, e);
            ServiceError::repository(RecordKind::Catalogue, e)
        })?;

        tracing::info!("Created catalogue {} ({})", catalogue.id, catalogue.name);
        Ok(catalogue)
    }

    /// Get catalogue by ID
    ///
    /// # Errors
    /// - `NotFound` if no catalogue has this id
    pub async fn get_by_id(&self, id: i64) -> Result<Catalogue, ServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Catalogue, e))?
            .ok_or_else(|| ServiceError::not_found(RecordKind::Catalogue, id))
    }

    /// The existing subset of `ids`, in id order
    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Catalogue>, ServiceError> {
        self.repo
            .find_all_by_ids(ids)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Catalogue, e))
    }

    /// Rename a catalogue in place
    ///
    /// The new name is validated before the catalogue is loaded.
    pub async fn update(&self, id: i64, new_name: &str) -> Result<Catalogue, ServiceError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ServiceError::invalid_parameter(
                "New catalogue name can not be empty",
            ));
        }

        let mut catalogue = self.get_by_id(id).await?;
        catalogue.name = new_name.to_string();

        let catalogue = self
            .repo
            .save(&catalogue)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Catalogue, e))?;

        tracing::info!("Renamed catalogue {} to {}", catalogue.id, catalogue.name);
        Ok(catalogue)
    }

    /// Delete a catalogue
    ///
    /// # Errors
    /// - `NotFound` if no catalogue has this id
    /// - `RepositoryFailure` if articles are still filed under it
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Catalogue, e))?;

        if !deleted {
            return Err(ServiceError::not_found(RecordKind::Catalogue, id));
        }

        tracing::info!("Deleted catalogue {}", id);
        Ok(())
    }

    /// List all catalogues in id order
    pub async fn list(&self) -> Result<Vec<Catalogue>, ServiceError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Catalogue, e))
    }
}
