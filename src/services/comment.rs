//! Comment service
//!
//! Comments always belong to an article; they are listed oldest first.

use crate::db::repositories::{CommentRepository, CrudRepository};
use crate::models::{Article, Comment};
use crate::services::error::{RecordKind, ServiceError};
use std::sync::Arc;

/// Comment service for managing article comments
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(repo: Arc<dyn CommentRepository>) -> Self {
        Self { repo }
    }

    /// Leave a comment on `article`
    ///
    /// # Arguments
    /// * `content` - Comment text
    /// * `article` - The commented article, which must exist in the store
    /// * `from_user` - Author of the comment
    /// * `to_user` - The user being replied to, if any
    ///
    /// # Errors
    /// - `InvalidParameter` if `content` or `from_user` is blank
    /// - `RepositoryFailure` if the store rejects the comment, including when
    ///   the article does not exist
    pub async fn create(
        &self,
        content: &str,
        article: &Article,
        from_user: &str,
        to_user: Option<&str>,
    ) -> Result<Comment, ServiceError> {
        if content.trim().is_empty() || from_user.trim().is_empty() {
            return Err(ServiceError::invalid_parameter(
                "Comment parameter must be not null or empty",
            ));
        }

        let comment = Comment::new(article.id, content, from_user, to_user.map(String::from));
        let comment = self.repo.save(&comment).await.map_err(|e| {
            tracing::warn!("Failed to comment on article {}: {:#}", article.id, e);
            ServiceError::repository(RecordKind::Comment, e)
        })?;

        tracing::info!(
            "Created comment {} on article {} by {}",
            comment.id,
            comment.article_id,
            comment.from_user
        );
        Ok(comment)
    }

    /// Get comment by ID
    ///
    /// # Errors
    /// - `NotFound` if no comment has this id
    pub async fn get_by_id(&self, id: i64) -> Result<Comment, ServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Comment, e))?
            .ok_or_else(|| ServiceError::not_found(RecordKind::Comment, id))
    }

    /// Replace the text of a comment
    ///
    /// # Errors
    /// - `InvalidParameter` if the new content is blank, checked before any load
    /// - `NotFound` if no comment has this id
    pub async fn update(&self, id: i64, new_content: &str) -> Result<Comment, ServiceError> {
        if new_content.trim().is_empty() {
            return Err(ServiceError::invalid_parameter(
                "New comment content can not be empty",
            ));
        }

        let mut comment = self.get_by_id(id).await?;
        comment.content = new_content.to_string();

        let comment = self
            .repo
            .save(&comment)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Comment, e))?;

        tracing::info!("Edited comment {} on article {}", comment.id, comment.article_id);
        Ok(comment)
    }

    /// Delete a comment
    ///
    /// # Errors
    /// - `NotFound` if no comment has this id
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Comment, e))?;

        if !deleted {
            return Err(ServiceError::not_found(RecordKind::Comment, id));
        }

        tracing::info!("Deleted comment {}", id);
        Ok(())
    }

    /// Comments on an article in the order they were written
    pub async fn list_by_article(&self, article_id: i64) -> Result<Vec<Comment>, ServiceError> {
        self.repo
            .find_by_article_id(article_id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Comment, e))
    }
}
