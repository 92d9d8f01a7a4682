use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::profile::{DirectoryFilter, UpdateProfileRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let filter = DirectoryFilter {
        search: query.get("search").cloned(),
        cohort: query.get("cohort").and_then(|v| v.parse::<i32>().ok()),
        page: query.get("page").and_then(|v| v.parse::<u32>().ok()).unwrap_or(1),
        per_page: query
            .get("per_page")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0),
    };

    let page = state.directory_handler.list(filter).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(state))]
pub async fn get_cohorts(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let cohorts = state.directory_handler.cohorts().await?;
    Ok(HttpResponse::Ok().json(cohorts))
}

#[instrument(skip(claims, state))]
pub async fn my_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;
    let profile = state.directory_handler.own_profile(&caller_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, data))]
pub async fn update_my_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    let profile = state
        .directory_handler
        .update_own_profile(&caller_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(slug, state))]
pub async fn get_profile_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let profile = state.directory_handler.get_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(profile))
}
