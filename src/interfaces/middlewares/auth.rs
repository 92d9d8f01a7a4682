use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{
    rc::Rc,
    task::{Context, Poll},
};

use crate::{entities::token::Claims, errors::AuthError, AppState};

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path();
            let method = req.method().as_str();

            if is_public_route(path, method) {
                return service.call(req).await.map(|res| res.map_into_boxed_body());
            }

            let claims = match get_valid_claims(&req) {
                Ok(claims) => claims,
                Err(AuthError::MissingCredentials) => {
                    tracing::warn!("Missing or malformed Authorization header");
                    return Ok(custom_error_response(
                        req,
                        HttpResponse::Unauthorized().json(serde_json::json!({
                            "kind": "unauthorized",
                            "error": "Missing or invalid credentials"
                        })),
                    ));
                }
                Err(AuthError::TokenExpired) => {
                    return Ok(custom_error_response(
                        req,
                        HttpResponse::Unauthorized().json(serde_json::json!({
                            "kind": "unauthorized",
                            "error": "Token expired"
                        })),
                    ));
                }
                Err(_) => {
                    tracing::warn!("Failed to decode access token");
                    return Ok(custom_error_response(
                        req,
                        HttpResponse::Unauthorized().json(serde_json::json!({
                            "kind": "unauthorized",
                            "error": "Invalid token"
                        })),
                    ));
                }
            };

            // Admin rights are checked against the database in the handlers,
            // never against token contents.
            req.extensions_mut().insert(claims);
            service.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}

fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    if method == "GET" {
        if path == "/" || path == "/health" {
            return true;
        }
        // The directory and published articles are world-readable, but
        // the caller's own profile view is not.
        if path == "/api/v1/profiles/me" {
            return false;
        }
        if path == "/api/v1/profiles" || path.starts_with("/api/v1/profiles/") {
            return true;
        }
        if path == "/api/v1/articles" || path.starts_with("/api/v1/articles/") {
            return true;
        }
    }

    matches!(
        (path, method),
        ("/api/v1/auth/signup", "POST")
            | ("/api/v1/auth/login", "POST")
            | ("/api/v1/auth/refresh", "POST")
    )
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn get_valid_claims(req: &ServiceRequest) -> Result<Claims, AuthError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(AuthError::MissingJwtService)?;

    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    let decoded = state.auth_handler.token_service.decode_jwt(&token)?;
    Ok(decoded.claims)
}

fn custom_error_response(req: ServiceRequest, res: HttpResponse) -> ServiceResponse<BoxBody> {
    req.into_response(res)
}

#[cfg(test)]
mod tests {
    use super::is_public_route;

    #[test]
    fn preflight_is_always_public() {
        assert!(is_public_route("/api/v1/admin/approve", "OPTIONS"));
    }

    #[test]
    fn directory_reads_are_public() {
        assert!(is_public_route("/api/v1/profiles", "GET"));
        assert!(is_public_route("/api/v1/profiles/jane-doe", "GET"));
        assert!(is_public_route("/api/v1/profiles/cohorts", "GET"));
        assert!(is_public_route("/api/v1/articles", "GET"));
    }

    #[test]
    fn own_profile_view_requires_auth() {
        assert!(!is_public_route("/api/v1/profiles/me", "GET"));
        assert!(!is_public_route("/api/v1/profiles/me", "PUT"));
    }

    #[test]
    fn mutations_require_auth() {
        assert!(!is_public_route("/api/v1/articles", "POST"));
        assert!(!is_public_route("/api/v1/register", "POST"));
        assert!(!is_public_route("/api/v1/admin/approve", "POST"));
        assert!(!is_public_route("/api/v1/delete-account", "POST"));
    }

    #[test]
    fn auth_endpoints_are_public() {
        assert!(is_public_route("/api/v1/auth/signup", "POST"));
        assert!(is_public_route("/api/v1/auth/login", "POST"));
        assert!(is_public_route("/api/v1/auth/refresh", "POST"));
        assert!(!is_public_route("/api/v1/auth/me", "GET"));
    }
}
