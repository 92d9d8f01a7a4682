use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    /// Target identity; older clients send `userId`.
    #[serde(alias = "userId")]
    pub id: Uuid,
}

#[instrument(skip(claims, state))]
#[post("/approve")]
pub async fn approve(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<ApproveRequest>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    state.lifecycle_handler.approve(&caller_id, &data.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Profile approved"})))
}

#[instrument(skip(claims, state))]
#[post("/reject")]
pub async fn reject(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<RejectRequest>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    let report = state.lifecycle_handler.reject(&caller_id, &data.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "teardown": report,
    })))
}

#[instrument(skip(claims, state))]
#[get("/pending")]
pub async fn pending_profiles(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    let pending = state.lifecycle_handler.pending_profiles(&caller_id).await?;

    Ok(HttpResponse::Ok().json(pending))
}
