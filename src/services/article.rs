//! Article service
//!
//! Implements business logic for article management:
//! - Create articles after resolving their catalogue and tags
//! - Partial updates that only touch `edited_time` on real edits
//! - Delete with explicit cascade of comments and tag links
//! - View counting
//!
//! Catalogue and tag references are resolved through their services. Any
//! failure while resolving them, including a reference that does not exist,
//! surfaces as a `RepositoryFailure` with origin `Tag/Catalogue` carrying the
//! nested error's message.

use crate::db::repositories::{ArticleRepository, CrudRepository};
use crate::models::{Article, Catalogue, CreateArticleInput, Tag, UpdateArticleInput};
use crate::services::catalogue::CatalogueService;
use crate::services::error::{RecordKind, ServiceError};
use crate::services::tag::TagService;
use chrono::Utc;
use std::sync::Arc;

/// Origin reported when catalogue or tag resolution fails
const REFERENCE_ORIGIN: &str = "Tag/Catalogue";

/// Article service for managing blog articles
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    tag_service: Arc<TagService>,
    catalogue_service: Arc<CatalogueService>,
}

impl ArticleService {
    /// Create a new article service
    ///
    /// # Arguments
    /// * `repo` - Article repository for database operations
    /// * `tag_service` - Resolves tag ids
    /// * `catalogue_service` - Resolves catalogue ids
    pub fn new(
        repo: Arc<dyn ArticleRepository>,
        tag_service: Arc<TagService>,
        catalogue_service: Arc<CatalogueService>,
    ) -> Self {
        Self {
            repo,
            tag_service,
            catalogue_service,
        }
    }

    /// Create a new article
    ///
    /// Validation happens before anything is read or written. Duplicate tag
    /// ids are ignored.
    ///
    /// # Errors
    /// - `InvalidParameter` if author, title or content is blank
    /// - `RepositoryFailure` (origin `Tag/Catalogue`) if the catalogue or a
    ///   tag cannot be resolved
    /// - `RepositoryFailure` (origin `article`) if the article cannot be stored
    pub async fn create(&self, input: CreateArticleInput) -> Result<Article, ServiceError> {
        if input.author_name.trim().is_empty()
            || input.title.trim().is_empty()
            || input.content.trim().is_empty()
        {
            return Err(ServiceError::invalid_parameter("Parameter can not be blank"));
        }

        let catalogue = self.resolve_catalogue(input.catalogue_id).await?;
        let tags = self.resolve_tags(&input.tag_ids).await?;

        let article = Article::new(
            input.author_name,
            input.title,
            input.content,
            catalogue,
            tags,
        );
        let article = self.repo.save(&article).await.map_err(|e| {
            tracing::warn!("Failed to create article: {:#}", e);
            ServiceError::repository(RecordKind::Article, e)
        })?;

        tracing::info!(
            "Created article {} \"{}\" in catalogue {} with {} tag(s)",
            article.id,
            article.title,
            article.catalogue.name,
            article.tags.len()
        );
        Ok(article)
    }

    /// Get article by ID
    ///
    /// # Errors
    /// - `NotFound` if no article has this id
    pub async fn get_by_id(&self, id: i64) -> Result<Article, ServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Article, e))?
            .ok_or_else(|| ServiceError::not_found(RecordKind::Article, id))
    }

    /// Delete an article together with its comments and tag links
    ///
    /// Tags and the catalogue themselves are left untouched.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Article, e))?;

        if !deleted {
            return Err(ServiceError::not_found(RecordKind::Article, id));
        }

        tracing::info!("Deleted article {}", id);
        Ok(())
    }

    /// Update an existing article
    ///
    /// Replacement catalogue and tags are resolved before anything is
    /// written. A missing or blank title or content leaves that field as it
    /// is, and `edited_time` moves only when the title or content actually
    /// changes.
    ///
    /// The view counter is never written here; `record_view` owns it.
    pub async fn update(&self, id: i64, input: UpdateArticleInput) -> Result<Article, ServiceError> {
        let mut article = self.get_by_id(id).await?;

        if let Some(catalogue_id) = input.catalogue_id {
            article.catalogue = self.resolve_catalogue(catalogue_id).await?;
        }
        if let Some(tag_ids) = &input.tag_ids {
            let tags = self.resolve_tags(tag_ids).await?;
            article.replace_tags(tags);
        }

        let mut edited = false;
        if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
            if title != article.title {
                article.title = title;
                edited = true;
            }
        }
        if let Some(content) = input.content.filter(|c| !c.trim().is_empty()) {
            if content != article.content {
                article.content = content;
                edited = true;
            }
        }
        if edited {
            article.edited_time = Utc::now().max(article.created_time);
        } else {
            tracing::debug!("Article {} title and content unchanged", id);
        }

        let article = self.repo.save(&article).await.map_err(|e| {
            tracing::warn!("Failed to update article {}: {:#}", id, e);
            ServiceError::repository(RecordKind::Article, e)
        })?;

        tracing::info!("Updated article {}", article.id);
        Ok(article)
    }

    /// List all articles in id order
    pub async fn list(&self) -> Result<Vec<Article>, ServiceError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Article, e))
    }

    /// Articles filed under a catalogue, in id order
    pub async fn list_by_catalogue(&self, catalogue_id: i64) -> Result<Vec<Article>, ServiceError> {
        self.repo
            .find_by_catalogue_id(catalogue_id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Article, e))
    }

    /// Count one view of an article and return the updated snapshot
    pub async fn record_view(&self, id: i64) -> Result<Article, ServiceError> {
        let found = self
            .repo
            .increment_view_number(id)
            .await
            .map_err(|e| ServiceError::repository(RecordKind::Article, e))?;

        if !found {
            return Err(ServiceError::not_found(RecordKind::Article, id));
        }

        self.get_by_id(id).await
    }

    async fn resolve_catalogue(&self, id: i64) -> Result<Catalogue, ServiceError> {
        self.catalogue_service
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::nested(REFERENCE_ORIGIN, e))
    }

    /// Resolve every requested tag, failing on the first unknown id
    async fn resolve_tags(&self, ids: &[i64]) -> Result<Vec<Tag>, ServiceError> {
        let mut wanted = ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let tags = self
            .tag_service
            .get_by_ids(&wanted)
            .await
            .map_err(|e| ServiceError::nested(REFERENCE_ORIGIN, e))?;

        if let Some(missing) = wanted.iter().find(|id| !tags.iter().any(|t| t.id == **id)) {
            return Err(ServiceError::nested(
                REFERENCE_ORIGIN,
                ServiceError::not_found(RecordKind::Tag, *missing),
            ));
        }

        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::failing::FailingRepository;
    use crate::db::repositories::{
        SqlxArticleRepository, SqlxCatalogueRepository, SqlxCommentRepository,
        SqlxTagRepository,
    };
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::services::comment::CommentService;
    use proptest::prelude::*;
    use std::time::Duration;

    struct Fixture {
        articles: ArticleService,
        tags: Arc<TagService>,
        catalogues: Arc<CatalogueService>,
        comments: CommentService,
    }

    async fn migrated_pool() -> DynDatabasePool {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn setup() -> Fixture {
        let pool = migrated_pool().await;
        let tags = Arc::new(TagService::new(SqlxTagRepository::boxed(pool.clone())));
        let catalogues = Arc::new(CatalogueService::new(SqlxCatalogueRepository::boxed(
            pool.clone(),
        )));
        Fixture {
            articles: ArticleService::new(
                SqlxArticleRepository::boxed(pool.clone()),
                tags.clone(),
                catalogues.clone(),
            ),
            tags,
            catalogues,
            comments: CommentService::new(SqlxCommentRepository::boxed(pool)),
        }
    }

    fn input(tag_ids: Vec<i64>, catalogue_id: i64) -> CreateArticleInput {
        CreateArticleInput::new("alice", "Hello", "World", tag_ids, catalogue_id)
    }

    #[tokio::test]
    async fn test_create_article_scenario() {
        let fx = setup().await;
        let news = fx.tags.create("news").await.unwrap();
        let tech = fx.tags.create("tech").await.unwrap();
        let life = fx.catalogues.create("life").await.unwrap();

        let article = fx
            .articles
            .create(input(vec![news.id, tech.id], life.id))
            .await
            .expect("Failed to create article");

        assert!(article.id > 0);
        assert_eq!(article.tags.len(), 2);
        let names: Vec<&str> = article.tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, vec!["news", "tech"]);
        assert_eq!(article.catalogue.name, "life");
        assert_eq!(article.view_number, 0);
        assert_eq!(article.created_time, article.edited_time);
    }

    #[tokio::test]
    async fn test_create_with_three_tags() {
        let fx = setup().await;
        let mut ids = Vec::new();
        for name in ["totoTag", "titiTag", "tataTag"] {
            ids.push(fx.tags.create(name).await.unwrap().id);
        }
        let cat = fx.catalogues.create("totoCat").await.unwrap();

        let created = fx
            .articles
            .create(CreateArticleInput::new(
                "totoauth",
                "tototitle",
                "totocontent",
                ids.clone(),
                cat.id,
            ))
            .await
            .unwrap();
        let stored = fx.articles.get_by_id(created.id).await.unwrap();

        assert_eq!(stored.author_name, "totoauth");
        assert_eq!(stored.tag_ids(), ids);
    }

    #[tokio::test]
    async fn test_create_ignores_duplicate_tag_ids() {
        let fx = setup().await;
        let news = fx.tags.create("news").await.unwrap();
        let life = fx.catalogues.create("life").await.unwrap();

        let article = fx
            .articles
            .create(input(vec![news.id, news.id], life.id))
            .await
            .unwrap();

        assert_eq!(article.tags, vec![news]);
    }

    #[tokio::test]
    async fn test_create_blank_rejected_without_write() {
        let fx = setup().await;
        let life = fx.catalogues.create("life").await.unwrap();

        let err = fx
            .articles
            .create(CreateArticleInput::new("", "titi", "tata", vec![], life.id))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::InvalidParameter("Parameter can not be blank".to_string())
        );
        assert!(fx.articles.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_failing_catalogue_store() {
        let pool = migrated_pool().await;
        let service = ArticleService::new(
            SqlxArticleRepository::boxed(pool.clone()),
            Arc::new(TagService::new(SqlxTagRepository::boxed(pool))),
            Arc::new(CatalogueService::new(Arc::new(FailingRepository::new("todo")))),
        );

        let err = service
            .create(CreateArticleInput::new("toot", "titi", "tata", vec![], 123))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error from Tag/Catalogue repository. Nested exception is { Error from catalogue repository. Nested exception is { todo } }"
        );
    }

    #[tokio::test]
    async fn test_create_with_missing_catalogue() {
        let fx = setup().await;

        let err = fx.articles.create(input(vec![], 123)).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error from Tag/Catalogue repository. Nested exception is { Can not find this catalogue }"
        );
        assert!(fx.articles.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_missing_tag() {
        let fx = setup().await;
        let news = fx.tags.create("news").await.unwrap();
        let life = fx.catalogues.create("life").await.unwrap();

        let err = fx
            .articles
            .create(input(vec![news.id, 999], life.id))
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            ServiceError::RepositoryFailure { origin, .. } if origin == "Tag/Catalogue"
        ));
        assert!(fx.articles.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_article() {
        let fx = setup().await;

        let err = fx.articles.get_by_id(123).await.unwrap_err();

        assert_eq!(err.to_string(), "Can not find this article");
        assert!(err.is_repository_failure());
    }

    #[tokio::test]
    async fn test_get_with_failing_article_store() {
        let fx = setup().await;
        let service = ArticleService::new(
            Arc::new(FailingRepository::new("connection reset")),
            fx.tags.clone(),
            fx.catalogues.clone(),
        );

        let err = service.get_by_id(1).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error from article repository. Nested exception is { connection reset }"
        );
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cascades_comments() {
        let fx = setup().await;
        let news = fx.tags.create("news").await.unwrap();
        let life = fx.catalogues.create("life").await.unwrap();
        let article = fx
            .articles
            .create(input(vec![news.id], life.id))
            .await
            .unwrap();
        fx.comments.create("toto", &article, "bob", None).await.unwrap();
        fx.comments.create("titi", &article, "carol", None).await.unwrap();

        fx.articles
            .delete_by_id(article.id)
            .await
            .expect("Failed to delete article");

        assert!(fx.articles.get_by_id(article.id).await.unwrap_err().is_not_found());
        assert!(fx.comments.list_by_article(article.id).await.unwrap().is_empty());
        assert_eq!(fx.tags.get_by_id(news.id).await.unwrap(), news);
        assert_eq!(fx.catalogues.get_by_id(life.id).await.unwrap(), life);
    }

    #[tokio::test]
    async fn test_delete_missing_article() {
        let fx = setup().await;

        let err = fx.articles.delete_by_id(123).await.unwrap_err();

        assert!(err.is_repository_failure());
        assert_eq!(err, ServiceError::not_found(RecordKind::Article, 123));
    }

    #[tokio::test]
    async fn test_update_title_bumps_edited_time() {
        let fx = setup().await;
        let life = fx.catalogues.create("life").await.unwrap();
        let article = fx.articles.create(input(vec![], life.id)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let updated = fx
            .articles
            .update(article.id, UpdateArticleInput::new().with_title("Bonjour"))
            .await
            .expect("Failed to update article");

        assert_eq!(updated.title, "Bonjour");
        assert_eq!(updated.content, "World");
        assert_eq!(updated.created_time, article.created_time);
        assert!(updated.edited_time > article.edited_time);
    }

    #[tokio::test]
    async fn test_update_without_edits_keeps_edited_time() {
        let fx = setup().await;
        let news = fx.tags.create("news").await.unwrap();
        let life = fx.catalogues.create("life").await.unwrap();
        let work = fx.catalogues.create("work").await.unwrap();
        let article = fx.articles.create(input(vec![], life.id)).await.unwrap();

        let updated = fx
            .articles
            .update(
                article.id,
                UpdateArticleInput::new()
                    .with_title("Hello")
                    .with_content("   ")
                    .with_catalogue(work.id)
                    .with_tags(vec![news.id]),
            )
            .await
            .unwrap();

        assert_eq!(updated.content, "World");
        assert_eq!(updated.catalogue, work);
        assert_eq!(updated.tags, vec![news]);
        assert_eq!(updated.edited_time, article.edited_time);
    }

    #[tokio::test]
    async fn test_update_can_clear_tags() {
        let fx = setup().await;
        let news = fx.tags.create("news").await.unwrap();
        let life = fx.catalogues.create("life").await.unwrap();
        let article = fx
            .articles
            .create(input(vec![news.id], life.id))
            .await
            .unwrap();

        let updated = fx
            .articles
            .update(article.id, UpdateArticleInput::new().with_tags(vec![]))
            .await
            .unwrap();

        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_with_missing_reference_writes_nothing() {
        let fx = setup().await;
        let life = fx.catalogues.create("life").await.unwrap();
        let article = fx.articles.create(input(vec![], life.id)).await.unwrap();

        let err = fx
            .articles
            .update(
                article.id,
                UpdateArticleInput::new().with_title("Changed").with_catalogue(404),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), 1002);
        assert_eq!(fx.articles.get_by_id(article.id).await.unwrap().title, "Hello");
    }

    #[tokio::test]
    async fn test_update_missing_article() {
        let fx = setup().await;

        let err = fx
            .articles
            .update(77, UpdateArticleInput::new().with_title("x"))
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::not_found(RecordKind::Article, 77));
    }

    #[tokio::test]
    async fn test_list_by_catalogue() {
        let fx = setup().await;
        let life = fx.catalogues.create("life").await.unwrap();
        let work = fx.catalogues.create("work").await.unwrap();
        fx.articles.create(input(vec![], life.id)).await.unwrap();
        fx.articles.create(input(vec![], work.id)).await.unwrap();
        fx.articles.create(input(vec![], life.id)).await.unwrap();

        assert_eq!(fx.articles.list().await.unwrap().len(), 3);
        assert_eq!(fx.articles.list_by_catalogue(life.id).await.unwrap().len(), 2);
        assert_eq!(fx.articles.list_by_catalogue(work.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_view() {
        let fx = setup().await;
        let life = fx.catalogues.create("life").await.unwrap();
        let article = fx.articles.create(input(vec![], life.id)).await.unwrap();

        fx.articles.record_view(article.id).await.unwrap();
        let viewed = fx.articles.record_view(article.id).await.unwrap();

        assert_eq!(viewed.view_number, 2);
        assert_eq!(viewed.edited_time, article.edited_time);
        assert!(fx.articles.record_view(999).await.unwrap_err().is_not_found());
    }

    /// Records a view on every stored article just before saving it, as a
    /// reader hitting the article mid-update would.
    struct ViewedBeforeSave {
        inner: SqlxArticleRepository,
    }

    #[async_trait::async_trait]
    impl CrudRepository<Article> for ViewedBeforeSave {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Article>> {
            self.inner.get_by_id(id).await
        }
        async fn save(&self, article: &Article) -> anyhow::Result<Article> {
            if article.id != 0 {
                self.inner.increment_view_number(article.id).await?;
            }
            self.inner.save(article).await
        }
        async fn delete_by_id(&self, id: i64) -> anyhow::Result<bool> {
            self.inner.delete_by_id(id).await
        }
        async fn find_all(&self) -> anyhow::Result<Vec<Article>> {
            self.inner.find_all().await
        }
        async fn find_all_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Article>> {
            self.inner.find_all_by_ids(ids).await
        }
    }

    #[async_trait::async_trait]
    impl ArticleRepository for ViewedBeforeSave {
        async fn find_by_catalogue_id(&self, catalogue_id: i64) -> anyhow::Result<Vec<Article>> {
            self.inner.find_by_catalogue_id(catalogue_id).await
        }
        async fn increment_view_number(&self, id: i64) -> anyhow::Result<bool> {
            self.inner.increment_view_number(id).await
        }
    }

    #[tokio::test]
    async fn test_update_keeps_concurrent_views() {
        let pool = migrated_pool().await;
        let tags = Arc::new(TagService::new(SqlxTagRepository::boxed(pool.clone())));
        let catalogues = Arc::new(CatalogueService::new(SqlxCatalogueRepository::boxed(
            pool.clone(),
        )));
        let articles = ArticleService::new(
            Arc::new(ViewedBeforeSave {
                inner: SqlxArticleRepository::new(pool),
            }),
            tags,
            catalogues.clone(),
        );
        let life = catalogues.create("life").await.unwrap();
        let article = articles.create(input(vec![], life.id)).await.unwrap();

        let updated = articles
            .update(article.id, UpdateArticleInput::new().with_title("t2"))
            .await
            .expect("Failed to update article");

        assert_eq!(updated.title, "t2");
        assert_eq!(updated.view_number, 1);
        assert_eq!(articles.get_by_id(article.id).await.unwrap().view_number, 1);
    }

    fn blank() -> impl Strategy<Value = String> {
        "[ \t]{0,4}"
    }

    fn text() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9 ]{0,30}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Any blank author, title or content is rejected before a write.
        #[test]
        fn property_blank_fields_rejected(
            author in prop_oneof![blank(), text()],
            title in prop_oneof![blank(), text()],
            content in prop_oneof![blank(), text()]
        ) {
            prop_assume!(
                author.trim().is_empty() || title.trim().is_empty() || content.trim().is_empty()
            );
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let fx = setup().await;
                let life = fx.catalogues.create("life").await.unwrap();

                let err = fx
                    .articles
                    .create(CreateArticleInput::new(author, title, content, vec![], life.id))
                    .await
                    .unwrap_err();

                prop_assert_eq!(err.code(), 1001);
                prop_assert!(fx.articles.list().await.unwrap().is_empty());
                Ok(())
            });
            result?;
        }

        /// A created article reads back with the same author, title and content.
        #[test]
        fn property_create_get_roundtrip(author in text(), title in text(), content in text()) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let fx = setup().await;
                let life = fx.catalogues.create("life").await.unwrap();

                let created = fx
                    .articles
                    .create(CreateArticleInput::new(
                        author.clone(),
                        title.clone(),
                        content.clone(),
                        vec![],
                        life.id,
                    ))
                    .await
                    .expect("create should succeed");
                let stored = fx.articles.get_by_id(created.id).await.expect("article should exist");

                prop_assert!(created.id > 0);
                prop_assert_eq!(stored.author_name, author);
                prop_assert_eq!(stored.title, title);
                prop_assert_eq!(stored.content, content);
                Ok(())
            });
            result?;
        }
    }
}
