use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::profile::validate_optional_url;

const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_EXCERPT_LENGTH: u64 = 300;
const MAX_CATEGORY_LENGTH: u64 = 60;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: Option<String>,
    pub date: NaiveDate,
    pub category: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ArticleInsert {
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: Option<String>,
    pub date: NaiveDate,
    pub category: String,
    pub featured: bool,
}

#[derive(Debug, Serialize)]
pub struct ArticleCreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewArticleRequest {
    #[validate(length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    #[validate(custom(function = validate_optional_url))]
    pub image_url: Option<String>,

    /// Defaults to today when omitted.
    pub date: Option<NaiveDate>,

    #[serde(default)]
    #[validate(length(max = MAX_CATEGORY_LENGTH))]
    pub category: String,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub related_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[validate(length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,

    #[validate(custom(function = validate_optional_url))]
    pub image_url: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(length(max = MAX_CATEGORY_LENGTH))]
    pub category: Option<String>,

    pub featured: Option<bool>,

    /// When present, replaces the related-article links wholesale.
    pub related_ids: Option<Vec<Uuid>>,
}

/// Listing filters, clamped by the use case.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub page: u32,
    pub per_page: u32,
}

/// Articles carry rich-text HTML authored in the browser; strip anything
/// outside ammonia's conservative default allowlist before it is stored.
pub fn sanitize_content(html: &str) -> String {
    ammonia::clean(html)
}
