//! Article model
//!
//! This module provides:
//! - `Article`, the assembled snapshot of an article with its catalogue and tags
//! - `CreateArticleInput` / `UpdateArticleInput` accepted by the article service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Catalogue, Tag};

/// Article entity
///
/// A snapshot: the article row joined with its catalogue and its tag set.
/// Comments are owned by the article but listed through the comment service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Unique identifier, `0` until persisted
    pub id: i64,
    pub author_name: String,
    pub title: String,
    pub content: String,
    /// Number of recorded views
    #[serde(default)]
    pub view_number: i64,
    pub catalogue: Catalogue,
    /// Associated tags, ordered by id and free of duplicates
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_time: DateTime<Utc>,
    /// Last time the title or content changed
    pub edited_time: DateTime<Utc>,
}

impl Article {
    /// Compose an unsaved article. Both timestamps are set to now and the
    /// tag list is normalised to set semantics.
    pub fn new(
        author_name: String,
        title: String,
        content: String,
        catalogue: Catalogue,
        tags: Vec<Tag>,
    ) -> Self {
        let now = Utc::now();
        let mut article = Self {
            id: 0, // Will be set by database
            author_name,
            title,
            content,
            view_number: 0,
            catalogue,
            tags: Vec::new(),
            created_time: now,
            edited_time: now,
        };
        article.replace_tags(tags);
        article
    }

    /// Replace the whole tag set, dropping duplicate ids.
    pub fn replace_tags(&mut self, mut tags: Vec<Tag>) {
        tags.sort_by_key(|tag| tag.id);
        tags.dedup_by_key(|tag| tag.id);
        self.tags = tags;
    }

    /// Ids of the associated tags
    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.iter().map(|tag| tag.id).collect()
    }
}

/// Input for creating a new article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleInput {
    pub author_name: String,
    pub title: String,
    pub content: String,
    /// Tags to associate; duplicates are ignored
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    pub catalogue_id: i64,
}

impl CreateArticleInput {
    pub fn new(
        author_name: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        tag_ids: Vec<i64>,
        catalogue_id: i64,
    ) -> Self {
        Self {
            author_name: author_name.into(),
            title: title.into(),
            content: content.into(),
            tag_ids,
            catalogue_id,
        }
    }
}

/// Input for updating an existing article
///
/// `None` leaves a field untouched. A blank title or content is treated the
/// same as `None`. `tag_ids` replaces the full tag set, so `Some(vec![])`
/// detaches every tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArticleInput {
    pub content: Option<String>,
    pub title: Option<String>,
    pub catalogue_id: Option<i64>,
    pub tag_ids: Option<Vec<i64>>,
}

impl UpdateArticleInput {
    /// Create an empty update input
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Move the article to another catalogue
    pub fn with_catalogue(mut self, catalogue_id: i64) -> Self {
        self.catalogue_id = Some(catalogue_id);
        self
    }

    /// Replace the tag set
    pub fn with_tags(mut self, tag_ids: Vec<i64>) -> Self {
        self.tag_ids = Some(tag_ids);
        self
    }
}
