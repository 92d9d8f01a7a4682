use actix_web::{post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::errors::AppError;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

/// Self-service teardown: removes the caller's articles, profile, uploaded
/// files, and authentication identity, in that order.
#[instrument(skip(claims, state))]
#[post("/delete-account")]
pub async fn delete_account(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;

    state.lifecycle_handler.delete_account(&caller_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Account deleted."})))
}
