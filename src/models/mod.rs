//! Data models
//!
//! Value snapshots of the four record kinds handled by the content services,
//! plus the input types accepted by the article service.

mod article;
mod catalogue;
mod comment;
mod tag;

pub use article::{Article, CreateArticleInput, UpdateArticleInput};
pub use catalogue::Catalogue;
pub use comment::Comment;
pub use tag::Tag;
