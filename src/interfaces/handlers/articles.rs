use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::article::{ArticleFilter, NewArticleRequest, UpdateArticleRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(claims, state, data))]
pub async fn create_article(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewArticleRequest>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    let response = state
        .article_handler
        .create_article(&caller_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, query))]
pub async fn get_all_articles(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let filter = ArticleFilter {
        category: query.get("category").cloned().filter(|c| !c.is_empty()),
        featured: query.get("featured").and_then(|v| v.parse::<bool>().ok()),
        page: query.get("page").and_then(|v| v.parse::<u32>().ok()).unwrap_or(1),
        per_page: query
            .get("per_page")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10),
    };

    let page = state.article_handler.list_articles(filter).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(article_id, state))]
pub async fn get_article_by_id(
    article_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let article = state.article_handler.get_article(&article_id).await?;
    Ok(HttpResponse::Ok().json(article))
}

#[instrument(skip(article_id, state))]
pub async fn get_related_articles(
    article_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let related = state.article_handler.related_articles(&article_id).await?;
    Ok(HttpResponse::Ok().json(related))
}

#[instrument(skip(author_id, state))]
pub async fn get_articles_by_author(
    author_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let articles = state.article_handler.articles_by_author(&author_id).await?;
    Ok(HttpResponse::Ok().json(articles))
}

#[instrument(skip(claims, article_id, state, data))]
pub async fn update_article(
    claims: AuthClaims,
    article_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateArticleRequest>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    let updated = state
        .article_handler
        .update_article(&caller_id, &article_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(claims, article_id, state))]
pub async fn delete_article(
    claims: AuthClaims,
    article_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    state
        .article_handler
        .delete_article(&caller_id, &article_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
