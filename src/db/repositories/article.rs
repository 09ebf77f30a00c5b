//! Article repository
//!
//! Database operations for articles.
//!
//! This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL
//!
//! An article is read back as a snapshot: the row joined with its catalogue,
//! plus its tag set ordered by tag id. Saving an article replaces its tag
//! associations, and deleting one removes its comments and tag associations,
//! each inside a single transaction.

use crate::config::DatabaseDriver;
use crate::db::repositories::{id_placeholders, CrudRepository};
use crate::db::DynDatabasePool;
use crate::models::{Article, Catalogue, Tag};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: CrudRepository<Article> {
    /// Articles filed under a catalogue, in id order
    async fn find_by_catalogue_id(&self, catalogue_id: i64) -> Result<Vec<Article>>;

    /// Add one to the view counter, returning `false` when the article is absent
    async fn increment_view_number(&self, id: i64) -> Result<bool>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CrudRepository<Article> for SqlxArticleRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_article_by_id_sqlite(self.pool.require_sqlite()?, id).await
            }
            DatabaseDriver::Mysql => {
                get_article_by_id_mysql(self.pool.require_mysql()?, id).await
            }
        }
    }

    async fn save(&self, article: &Article) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => save_article_sqlite(self.pool.require_sqlite()?, article).await,
            DatabaseDriver::Mysql => save_article_mysql(self.pool.require_mysql()?, article).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_article_sqlite(self.pool.require_sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_article_mysql(self.pool.require_mysql()?, id).await,
        }
    }

    async fn find_all(&self) -> Result<Vec<Article>> {
        let sql = format!("{} ORDER BY a.id", SELECT_ARTICLES);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_articles_sqlite(self.pool.require_sqlite()?, &sql, &[]).await
            }
            DatabaseDriver::Mysql => {
                list_articles_mysql(self.pool.require_mysql()?, &sql, &[]).await
            }
        }
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<Article>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{} WHERE a.id IN ({}) ORDER BY a.id",
            SELECT_ARTICLES,
            id_placeholders(ids.len())
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_articles_sqlite(self.pool.require_sqlite()?, &sql, ids).await
            }
            DatabaseDriver::Mysql => {
                list_articles_mysql(self.pool.require_mysql()?, &sql, ids).await
            }
        }
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn find_by_catalogue_id(&self, catalogue_id: i64) -> Result<Vec<Article>> {
        let sql = format!("{} WHERE a.catalogue_id = ? ORDER BY a.id", SELECT_ARTICLES);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_articles_sqlite(self.pool.require_sqlite()?, &sql, &[catalogue_id]).await
            }
            DatabaseDriver::Mysql => {
                list_articles_mysql(self.pool.require_mysql()?, &sql, &[catalogue_id]).await
            }
        }
    }

    async fn increment_view_number(&self, id: i64) -> Result<bool> {
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INCREMENT_VIEW_NUMBER)
                .bind(id)
                .execute(self.pool.require_sqlite()?)
                .await
                .context("Failed to increment view number")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(INCREMENT_VIEW_NUMBER)
                .bind(id)
                .execute(self.pool.require_mysql()?)
                .await
                .context("Failed to increment view number")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }
}

const SELECT_ARTICLES: &str = r#"
    SELECT a.id, a.author_name, a.title, a.content, a.view_number,
           a.created_time, a.edited_time,
           c.id AS catalogue_id, c.name AS catalogue_name
    FROM articles a
    INNER JOIN catalogues c ON c.id = a.catalogue_id
"#;

const INSERT_ARTICLE: &str = r#"
    INSERT INTO articles (author_name, title, content, view_number, catalogue_id, created_time, edited_time)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_ARTICLE: &str = r#"
    UPDATE articles
    SET author_name = ?, title = ?, content = ?, catalogue_id = ?,
        created_time = ?, edited_time = ?
    WHERE id = ?
"#;

const INCREMENT_VIEW_NUMBER: &str =
    "UPDATE articles SET view_number = view_number + 1 WHERE id = ?";
const CLEAR_ARTICLE_TAGS: &str = "DELETE FROM article_tags WHERE article_id = ?";
const INSERT_ARTICLE_TAG: &str = "INSERT INTO article_tags (article_id, tag_id) VALUES (?, ?)";
const DELETE_ARTICLE_COMMENTS: &str = "DELETE FROM comments WHERE article_id = ?";
const DELETE_ARTICLE: &str = "DELETE FROM articles WHERE id = ?";

fn tags_for_articles_sql(count: usize) -> String {
    format!(
        r#"
        SELECT link.article_id, t.id, t.name
        FROM article_tags link
        INNER JOIN tags t ON t.id = link.tag_id
        WHERE link.article_id IN ({})
        ORDER BY link.article_id, t.id
        "#,
        id_placeholders(count)
    )
}

/// Distribute `(article_id, tag)` pairs onto their articles
fn attach_tags(articles: &mut [Article], pairs: Vec<(i64, Tag)>) {
    let mut by_article: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (article_id, tag) in pairs {
        by_article.entry(article_id).or_default().push(tag);
    }
    for article in articles.iter_mut() {
        article.tags = by_article.remove(&article.id).unwrap_or_default();
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_article_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Article>> {
    let sql = format!("{} WHERE a.id = ?", SELECT_ARTICLES);
    let mut articles = list_articles_sqlite(pool, &sql, &[id]).await?;
    Ok(articles.pop())
}

/// Run an article query binding `params` in order, then load the tag sets
async fn list_articles_sqlite(pool: &SqlitePool, sql: &str, params: &[i64]) -> Result<Vec<Article>> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = query.bind(*param);
    }
    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to query articles")?;

    let mut articles = rows
        .iter()
        .map(row_to_article_sqlite)
        .collect::<Result<Vec<_>>>()?;
    if articles.is_empty() {
        return Ok(articles);
    }

    let tag_sql = tags_for_articles_sql(articles.len());
    let mut tag_query = sqlx::query(&tag_sql);
    for article in &articles {
        tag_query = tag_query.bind(article.id);
    }
    let tag_rows = tag_query
        .fetch_all(pool)
        .await
        .context("Failed to load article tags")?;

    let pairs = tag_rows
        .iter()
        .map(|row| {
            let tag = Tag {
                id: row.get("id"),
                name: row.get("name"),
            };
            (row.get::<i64, _>("article_id"), tag)
        })
        .collect();
    attach_tags(&mut articles, pairs);

    Ok(articles)
}

/// Tag ids to link, each once
fn distinct_tag_ids(article: &Article) -> Vec<i64> {
    let mut ids = article.tag_ids();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn save_article_sqlite(pool: &SqlitePool, article: &Article) -> Result<Article> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let id = if article.id == 0 {
        let result = sqlx::query(INSERT_ARTICLE)
            .bind(&article.author_name)
            .bind(&article.title)
            .bind(&article.content)
            .bind(article.view_number)
            .bind(article.catalogue.id)
            .bind(article.created_time)
            .bind(article.edited_time)
            .execute(&mut *tx)
            .await
            .context("Failed to create article")?;
        result.last_insert_rowid()
    } else {
        let result = sqlx::query(UPDATE_ARTICLE)
            .bind(&article.author_name)
            .bind(&article.title)
            .bind(&article.content)
            .bind(article.catalogue.id)
            .bind(article.created_time)
            .bind(article.edited_time)
            .bind(article.id)
            .execute(&mut *tx)
            .await
            .context("Failed to update article")?;
        if result.rows_affected() == 0 {
            anyhow::bail!("Article {} does not exist", article.id);
        }
        article.id
    };

    sqlx::query(CLEAR_ARTICLE_TAGS)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear article tags")?;

    for tag_id in distinct_tag_ids(article) {
        sqlx::query(INSERT_ARTICLE_TAG)
            .bind(id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to attach tag {} to article", tag_id))?;
    }

    tx.commit().await.context("Failed to commit article")?;

    get_article_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after save"))
}

async fn delete_article_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(DELETE_ARTICLE_COMMENTS)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete article comments")?;

    sqlx::query(CLEAR_ARTICLE_TAGS)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear article tags")?;

    let result = sqlx::query(DELETE_ARTICLE)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete article")?;

    tx.commit().await.context("Failed to commit article deletion")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        author_name: row.get("author_name"),
        title: row.get("title"),
        content: row.get("content"),
        view_number: row.get("view_number"),
        catalogue: Catalogue {
            id: row.get("catalogue_id"),
            name: row.get("catalogue_name"),
        },
        tags: Vec::new(),
        created_time: row.get("created_time"),
        edited_time: row.get("edited_time"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_article_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Article>> {
    let sql = format!("{} WHERE a.id = ?", SELECT_ARTICLES);
    let mut articles = list_articles_mysql(pool, &sql, &[id]).await?;
    Ok(articles.pop())
}

async fn list_articles_mysql(pool: &MySqlPool, sql: &str, params: &[i64]) -> Result<Vec<Article>> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = query.bind(*param);
    }
    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to query articles")?;

    let mut articles = rows
        .iter()
        .map(row_to_article_mysql)
        .collect::<Result<Vec<_>>>()?;
    if articles.is_empty() {
        return Ok(articles);
    }

    let tag_sql = tags_for_articles_sql(articles.len());
    let mut tag_query = sqlx::query(&tag_sql);
    for article in &articles {
        tag_query = tag_query.bind(article.id);
    }
    let tag_rows = tag_query
        .fetch_all(pool)
        .await
        .context("Failed to load article tags")?;

    let pairs = tag_rows
        .iter()
        .map(|row| {
            let tag = Tag {
                id: row.get("id"),
                name: row.get("name"),
            };
            (row.get::<i64, _>("article_id"), tag)
        })
        .collect();
    attach_tags(&mut articles, pairs);

    Ok(articles)
}

async fn save_article_mysql(pool: &MySqlPool, article: &Article) -> Result<Article> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let id = if article.id == 0 {
        let result = sqlx::query(INSERT_ARTICLE)
            .bind(&article.author_name)
            .bind(&article.title)
            .bind(&article.content)
            .bind(article.view_number)
            .bind(article.catalogue.id)
            .bind(article.created_time)
            .bind(article.edited_time)
            .execute(&mut *tx)
            .await
            .context("Failed to create article")?;
        result.last_insert_id() as i64
    } else {
        // MySQL reports zero affected rows for an unchanged row, so check
        // existence under a row lock instead.
        let existing = sqlx::query("SELECT id FROM articles WHERE id = ? FOR UPDATE")
            .bind(article.id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to lock article")?;
        if existing.is_none() {
            anyhow::bail!("Article {} does not exist", article.id);
        }

        sqlx::query(UPDATE_ARTICLE)
            .bind(&article.author_name)
            .bind(&article.title)
            .bind(&article.content)
            .bind(article.catalogue.id)
            .bind(article.created_time)
            .bind(article.edited_time)
            .bind(article.id)
            .execute(&mut *tx)
            .await
            .context("Failed to update article")?;
        article.id
    };

    sqlx::query(CLEAR_ARTICLE_TAGS)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear article tags")?;

    for tag_id in distinct_tag_ids(article) {
        sqlx::query(INSERT_ARTICLE_TAG)
            .bind(id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to attach tag {} to article", tag_id))?;
    }

    tx.commit().await.context("Failed to commit article")?;

    get_article_by_id_mysql(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after save"))
}

async fn delete_article_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(DELETE_ARTICLE_COMMENTS)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete article comments")?;

    sqlx::query(CLEAR_ARTICLE_TAGS)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear article tags")?;

    let result = sqlx::query(DELETE_ARTICLE)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete article")?;

    tx.commit().await.context("Failed to commit article deletion")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        author_name: row.get("author_name"),
        title: row.get("title"),
        content: row.get("content"),
        view_number: row.get("view_number"),
        catalogue: Catalogue {
            id: row.get("catalogue_id"),
            name: row.get("catalogue_name"),
        },
        tags: Vec::new(),
        created_time: row.get("created_time"),
        edited_time: row.get("edited_time"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CatalogueRepository, CommentRepository, SqlxCatalogueRepository, SqlxCommentRepository,
        SqlxTagRepository, TagRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::Comment;

    struct Fixture {
        repo: SqlxArticleRepository,
        tags: Arc<dyn TagRepository>,
        catalogues: Arc<dyn CatalogueRepository>,
        comments: Arc<dyn CommentRepository>,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        Fixture {
            repo: SqlxArticleRepository::new(pool.clone()),
            tags: SqlxTagRepository::boxed(pool.clone()),
            catalogues: SqlxCatalogueRepository::boxed(pool.clone()),
            comments: SqlxCommentRepository::boxed(pool),
        }
    }

    impl Fixture {
        async fn tag(&self, name: &str) -> Tag {
            self.tags.save(&Tag::new(name)).await.expect("Failed to save tag")
        }

        async fn catalogue(&self, name: &str) -> Catalogue {
            self.catalogues
                .save(&Catalogue::new(name))
                .await
                .expect("Failed to save catalogue")
        }
    }

    fn draft(title: &str, catalogue: &Catalogue, tags: Vec<Tag>) -> Article {
        Article::new(
            "alice".to_string(),
            title.to_string(),
            "World".to_string(),
            catalogue.clone(),
            tags,
        )
    }

    #[tokio::test]
    async fn test_save_new_article_with_tags() {
        let fx = setup().await;
        let news = fx.tag("news").await;
        let tech = fx.tag("tech").await;
        let life = fx.catalogue("life").await;

        let saved = fx
            .repo
            .save(&draft("Hello", &life, vec![tech.clone(), news.clone()]))
            .await
            .expect("Failed to save article");

        assert!(saved.id > 0);
        assert_eq!(saved.catalogue, life);
        assert_eq!(saved.tags, vec![news, tech]);
        assert_eq!(saved.view_number, 0);
    }

    #[tokio::test]
    async fn test_repeated_tag_linked_once() {
        let fx = setup().await;
        let news = fx.tag("news").await;
        let life = fx.catalogue("life").await;

        let saved = fx
            .repo
            .save(&draft("Hello", &life, vec![news.clone(), news.clone()]))
            .await
            .expect("Failed to save article");

        assert_eq!(saved.tags, vec![news]);
    }

    #[tokio::test]
    async fn test_get_article_round_trip() {
        let fx = setup().await;
        let life = fx.catalogue("life").await;
        let article = draft("Hello", &life, vec![]);

        let saved = fx.repo.save(&article).await.unwrap();
        let found = fx
            .repo
            .get_by_id(saved.id)
            .await
            .unwrap()
            .expect("Article not found");

        assert_eq!(found.author_name, "alice");
        assert_eq!(found.title, "Hello");
        assert_eq!(found.content, "World");
        assert_eq!(found.created_time, article.created_time);
        assert_eq!(found.edited_time, article.edited_time);
        assert!(fx.repo.get_by_id(saved.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_article_with_missing_catalogue_fails() {
        let fx = setup().await;
        let ghost = Catalogue {
            id: 77,
            name: "ghost".to_string(),
        };

        let result = fx.repo.save(&draft("Hello", &ghost, vec![])).await;

        assert!(result.is_err());
        assert!(fx.repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_tag_attach_rolls_back_insert() {
        let fx = setup().await;
        let life = fx.catalogue("life").await;
        let ghost = Tag {
            id: 404,
            name: "ghost".to_string(),
        };

        let result = fx.repo.save(&draft("Hello", &life, vec![ghost])).await;

        assert!(result.is_err());
        assert!(fx.repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_tag_set() {
        let fx = setup().await;
        let news = fx.tag("news").await;
        let tech = fx.tag("tech").await;
        let sport = fx.tag("sport").await;
        let life = fx.catalogue("life").await;
        let work = fx.catalogue("work").await;

        let mut saved = fx
            .repo
            .save(&draft("Hello", &life, vec![news, tech]))
            .await
            .unwrap();
        saved.replace_tags(vec![sport.clone()]);
        saved.catalogue = work.clone();
        saved.title = "Renamed".to_string();

        let updated = fx.repo.save(&saved).await.expect("Failed to update article");

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.tags, vec![sport]);
        assert_eq!(updated.catalogue, work);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(fx.repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_article_fails() {
        let fx = setup().await;
        let life = fx.catalogue("life").await;
        let mut ghost = draft("Ghost", &life, vec![]);
        ghost.id = 999;

        assert!(fx.repo.save(&ghost).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_cascades_comments_and_tag_links() {
        let fx = setup().await;
        let news = fx.tag("news").await;
        let life = fx.catalogue("life").await;
        let doomed = fx
            .repo
            .save(&draft("Doomed", &life, vec![news.clone()]))
            .await
            .unwrap();
        let kept = fx
            .repo
            .save(&draft("Kept", &life, vec![news.clone()]))
            .await
            .unwrap();
        fx.comments
            .save(&Comment::new(doomed.id, "toto", "bob", None))
            .await
            .unwrap();
        fx.comments
            .save(&Comment::new(kept.id, "titi", "bob", None))
            .await
            .unwrap();

        assert!(fx.repo.delete_by_id(doomed.id).await.expect("Failed to delete"));

        assert!(fx.repo.get_by_id(doomed.id).await.unwrap().is_none());
        assert!(fx.comments.find_by_article_id(doomed.id).await.unwrap().is_empty());
        assert_eq!(fx.comments.find_all().await.unwrap().len(), 1);
        assert!(fx.tags.get_by_id(news.id).await.unwrap().is_some());
        assert!(fx.catalogues.get_by_id(life.id).await.unwrap().is_some());
        let kept = fx.repo.get_by_id(kept.id).await.unwrap().unwrap();
        assert_eq!(kept.tags, vec![news]);
        assert!(!fx.repo.delete_by_id(doomed.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_all_by_ids_and_catalogue() {
        let fx = setup().await;
        let news = fx.tag("news").await;
        let life = fx.catalogue("life").await;
        let work = fx.catalogue("work").await;
        let a = fx.repo.save(&draft("A", &life, vec![news.clone()])).await.unwrap();
        let b = fx.repo.save(&draft("B", &work, vec![])).await.unwrap();
        let c = fx.repo.save(&draft("C", &life, vec![])).await.unwrap();

        let by_ids = fx.repo.find_all_by_ids(&[c.id, a.id, 12345]).await.unwrap();
        let ids: Vec<i64> = by_ids.iter().map(|article| article.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert_eq!(by_ids[0].tags, vec![news]);
        assert!(by_ids[1].tags.is_empty());

        let in_life = fx.repo.find_by_catalogue_id(life.id).await.unwrap();
        let titles: Vec<&str> = in_life.iter().map(|article| article.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(fx.repo.find_by_catalogue_id(work.id).await.unwrap()[0].id, b.id);
    }

    #[tokio::test]
    async fn test_increment_view_number() {
        let fx = setup().await;
        let life = fx.catalogue("life").await;
        let saved = fx.repo.save(&draft("Hello", &life, vec![])).await.unwrap();

        assert!(fx.repo.increment_view_number(saved.id).await.unwrap());
        assert!(fx.repo.increment_view_number(saved.id).await.unwrap());
        assert!(!fx.repo.increment_view_number(saved.id + 100).await.unwrap());

        let found = fx.repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.view_number, 2);
    }

    #[tokio::test]
    async fn test_update_keeps_views_recorded_after_load() {
        let fx = setup().await;
        let life = fx.catalogue("life").await;
        let saved = fx.repo.save(&draft("Hello", &life, vec![])).await.unwrap();

        let mut loaded = fx.repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert!(fx.repo.increment_view_number(saved.id).await.unwrap());
        loaded.title = "Hello again".to_string();

        let updated = fx.repo.save(&loaded).await.expect("Failed to update article");

        assert_eq!(updated.title, "Hello again");
        assert_eq!(updated.view_number, 1);
    }
}
