use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;
use sqlx::QueryBuilder;

use crate::{
    entities::article::{Article, ArticleFilter, ArticleInsert, UpdateArticleRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxArticleRepo,
};

use super::page_offset;

#[automock]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create_article(
        &self,
        article: &ArticleInsert,
        related: &[Uuid],
    ) -> Result<Uuid, AppError>;
    async fn get_article(&self, id: &Uuid) -> Result<Option<Article>, AppError>;
    async fn update_article(
        &self,
        id: &Uuid,
        update: &UpdateArticleRequest,
    ) -> Result<Article, AppError>;
    async fn delete_article(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<(Vec<Article>, i64), AppError>;
    async fn list_by_author(&self, author_id: &Uuid) -> Result<Vec<Article>, AppError>;
    async fn related_articles(&self, id: &Uuid) -> Result<Vec<Article>, AppError>;
}

impl SqlxArticleRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxArticleRepo { pool }
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepo {
    async fn create_article(
        &self,
        article: &ArticleInsert,
        related: &[Uuid],
    ) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO articles (
                author_id, author_name, title, excerpt, content,
                image_url, date, category, featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(article.author_id)
        .bind(&article.author_name)
        .bind(&article.title)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.image_url)
        .bind(article.date)
        .bind(&article.category)
        .bind(article.featured)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        for related_id in related {
            sqlx::query(
                "INSERT INTO article_related (article_id, related_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(related_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;
        }

        tx.commit().await.map_err(AppError::from)?;

        Ok(id)
    }

    async fn get_article(&self, id: &Uuid) -> Result<Option<Article>, AppError> {
        sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update_article(
        &self,
        id: &Uuid,
        update: &UpdateArticleRequest,
    ) -> Result<Article, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles SET
                title = COALESCE($1, title),
                excerpt = COALESCE($2, excerpt),
                content = COALESCE($3, content),
                image_url = COALESCE($4, image_url),
                date = COALESCE($5, date),
                category = COALESCE($6, category),
                featured = COALESCE($7, featured),
                updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&update.title)
        .bind(&update.excerpt)
        .bind(&update.content)
        .bind(&update.image_url)
        .bind(update.date)
        .bind(&update.category)
        .bind(update.featured)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

        if let Some(related) = &update.related_ids {
            sqlx::query("DELETE FROM article_related WHERE article_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::from)?;

            for related_id in related {
                sqlx::query(
                    "INSERT INTO article_related (article_id, related_id) VALUES ($1, $2) \
                     ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(related_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::from)?;
            }
        }

        tx.commit().await.map_err(AppError::from)?;

        Ok(article)
    }

    async fn delete_article(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_articles(&self, filter: &ArticleFilter) -> Result<(Vec<Article>, i64), AppError> {
        let mut query = QueryBuilder::new("SELECT * FROM articles WHERE TRUE");
        push_article_filters(&mut query, filter);
        query.push(" ORDER BY date DESC, created_at DESC LIMIT ");
        query.push_bind(filter.per_page as i64);
        query.push(" OFFSET ");
        query.push_bind(page_offset(filter.page, filter.per_page));

        let articles = query
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM articles WHERE TRUE");
        push_article_filters(&mut count_query, filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok((articles, total))
    }

    async fn list_by_author(&self, author_id: &Uuid) -> Result<Vec<Article>, AppError> {
        sqlx::query_as::<_, Article>(
            "SELECT * FROM articles WHERE author_id = $1 ORDER BY date DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn related_articles(&self, id: &Uuid) -> Result<Vec<Article>, AppError> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT a.* FROM articles a
            JOIN article_related r ON r.related_id = a.id
            WHERE r.article_id = $1
            ORDER BY a.date DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}

fn push_article_filters(query: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ArticleFilter) {
    if let Some(category) = &filter.category {
        query.push(" AND category = ");
        query.push_bind(category.clone());
    }
    if let Some(featured) = filter.featured {
        query.push(" AND featured = ");
        query.push_bind(featured);
    }
}
