use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::entities::article::{
    sanitize_content, Article, ArticleCreatedResponse, ArticleFilter, ArticleInsert,
    ArticlePage, NewArticleRequest, UpdateArticleRequest,
};
use crate::errors::AppError;
use crate::repositories::article::ArticleRepository;
use crate::repositories::profile::ProfileRepository;

const MAX_PER_PAGE: u32 = 50;
const DEFAULT_PER_PAGE: u32 = 10;

pub struct ArticleHandler<A, P>
where
    A: ArticleRepository,
    P: ProfileRepository,
{
    pub article_repo: A,
    pub profile_repo: P,
}

impl<A, P> ArticleHandler<A, P>
where
    A: ArticleRepository,
    P: ProfileRepository,
{
    pub fn new(article_repo: A, profile_repo: P) -> Self {
        ArticleHandler {
            article_repo,
            profile_repo,
        }
    }

    /// Publishes a new article. Requires an approved profile; the UI check
    /// alone is bypassable, so it is enforced here too.
    pub async fn create_article(
        &self,
        author_id: &Uuid,
        request: NewArticleRequest,
    ) -> Result<ArticleCreatedResponse, AppError> {
        request.validate()?;

        let profile = self
            .profile_repo
            .get_profile(author_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("Only registered members can publish articles".to_string())
            })?;

        if !profile.approved {
            return Err(AppError::Forbidden(
                "Profile is awaiting approval".to_string(),
            ));
        }

        let insert = ArticleInsert {
            author_id: *author_id,
            author_name: profile.full_name,
            title: request.title,
            excerpt: request.excerpt,
            content: sanitize_content(&request.content),
            image_url: request.image_url,
            date: request.date.unwrap_or_else(|| Utc::now().date_naive()),
            category: request.category,
            featured: request.featured,
        };

        let id = self
            .article_repo
            .create_article(&insert, &request.related_ids)
            .await?;

        Ok(ArticleCreatedResponse { id })
    }

    pub async fn update_article(
        &self,
        caller_id: &Uuid,
        article_id: &Uuid,
        mut request: UpdateArticleRequest,
    ) -> Result<Article, AppError> {
        request.validate()?;
        self.require_author(caller_id, article_id).await?;

        if let Some(content) = &request.content {
            request.content = Some(sanitize_content(content));
        }

        self.article_repo.update_article(article_id, &request).await
    }

    pub async fn delete_article(&self, caller_id: &Uuid, article_id: &Uuid) -> Result<(), AppError> {
        self.require_author(caller_id, article_id).await?;

        if !self.article_repo.delete_article(article_id).await? {
            return Err(AppError::NotFound("Article not found".to_string()));
        }

        Ok(())
    }

    pub async fn get_article(&self, article_id: &Uuid) -> Result<Article, AppError> {
        self.article_repo
            .get_article(article_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Article not found".to_string()))
    }

    pub async fn related_articles(&self, article_id: &Uuid) -> Result<Vec<Article>, AppError> {
        self.article_repo.related_articles(article_id).await
    }

    /// Everything a member has published, newest first.
    pub async fn articles_by_author(&self, author_id: &Uuid) -> Result<Vec<Article>, AppError> {
        self.article_repo.list_by_author(author_id).await
    }

    pub async fn list_articles(&self, mut filter: ArticleFilter) -> Result<ArticlePage, AppError> {
        filter.page = filter.page.max(1);
        filter.per_page = match filter.per_page {
            0 => DEFAULT_PER_PAGE,
            n => n.min(MAX_PER_PAGE),
        };

        let (articles, total) = self.article_repo.list_articles(&filter).await?;

        Ok(ArticlePage {
            articles,
            total,
            page: filter.page,
            per_page: filter.per_page,
        })
    }

    /// Ownership gate: only the author may mutate an article.
    async fn require_author(&self, caller_id: &Uuid, article_id: &Uuid) -> Result<Article, AppError> {
        let article = self
            .article_repo
            .get_article(article_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

        if article.author_id != *caller_id {
            return Err(AppError::Forbidden(
                "Only the author may modify this article".to_string(),
            ));
        }

        Ok(article)
    }
}
