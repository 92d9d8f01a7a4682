use actix_web::{post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::profile::RegistrationRequest;
use crate::errors::AppError;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

/// Submits (or resubmits) the caller's profile. The stored row is always
/// pending until an admin approves it.
#[instrument(skip(claims, state, data))]
#[post("/register")]
pub async fn register(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<RegistrationRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;

    let response = state
        .registration_handler
        .register(&user_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
