//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A remark left on an article, optionally addressed to another user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: i64,
    /// Owning article
    pub article_id: i64,
    pub content: String,
    pub from_user: String,
    /// Recipient when the comment replies to someone
    pub to_user: Option<String>,
    pub created_time: DateTime<Utc>,
}

impl Comment {
    /// Create an unsaved comment on `article_id`, timestamped now.
    pub fn new(
        article_id: i64,
        content: impl Into<String>,
        from_user: impl Into<String>,
        to_user: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            article_id,
            content: content.into(),
            from_user: from_user.into(),
            to_user,
            created_time: Utc::now(),
        }
    }
}
