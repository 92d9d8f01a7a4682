use actix_web::{error::ResponseError, get, post, web, HttpResponse, Responder};

use crate::entities::token::{AuthResponse, RefreshTokenRequest};
use crate::entities::user::{LoginRequest, SignupRequest};
use crate::errors::AppError;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    user: web::Json<SignupRequest>
) -> impl Responder {
    match state.auth_handler.signup(user.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.error_response(),
    }
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginRequest>
) -> impl Responder {
    match state.auth_handler.login(user.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}

#[post("/refresh")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> impl Responder {
    match state.auth_handler.refresh_token(&request.refresh_token).await {
        Ok(auth_response) => HttpResponse::Ok().json(AuthResponse {
            access_token: auth_response.access_token,
            refresh_token: auth_response.refresh_token,
            token_type: "Bearer".to_string(),
        }),
        Err(e) => e.error_response(),
    }
}

#[get("/me")]
pub async fn me(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let account = state.auth_handler.current_account(&user_id).await?;
    Ok(HttpResponse::Ok().json(account))
}
