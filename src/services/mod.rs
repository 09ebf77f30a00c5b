//! Services layer - Business logic
//!
//! The content services validate input, keep articles consistent with their
//! catalogue, tags and comments, and translate storage failures into
//! [`ServiceError`].

pub mod article;
pub mod catalogue;
pub mod comment;
pub mod error;
pub mod tag;

pub use article::ArticleService;
pub use catalogue::CatalogueService;
pub use comment::CommentService;
pub use error::{RecordKind, ServiceError};
pub use tag::TagService;

use crate::db::repositories::{
    SqlxArticleRepository, SqlxCatalogueRepository, SqlxCommentRepository, SqlxTagRepository,
};
use crate::db::DynDatabasePool;
use std::sync::Arc;

/// The four content services wired over one database pool
///
/// The article service shares the tag and catalogue services it resolves
/// references through.
#[derive(Clone)]
pub struct ContentServices {
    pub articles: Arc<ArticleService>,
    pub tags: Arc<TagService>,
    pub catalogues: Arc<CatalogueService>,
    pub comments: Arc<CommentService>,
}

impl ContentServices {
    /// Build the SQLx repositories and services over `pool`
    pub fn from_pool(pool: DynDatabasePool) -> Self {
        let tags = Arc::new(TagService::new(SqlxTagRepository::boxed(pool.clone())));
        let catalogues = Arc::new(CatalogueService::new(SqlxCatalogueRepository::boxed(
            pool.clone(),
        )));
        let comments = Arc::new(CommentService::new(SqlxCommentRepository::boxed(
            pool.clone(),
        )));
        let articles = Arc::new(ArticleService::new(
            SqlxArticleRepository::boxed(pool),
            tags.clone(),
            catalogues.clone(),
        ));

        Self {
            articles,
            tags,
            catalogues,
            comments,
        }
    }
}
