use uuid::Uuid;
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginRequest, NewAccountResponse, PublicUser, SignupRequest, User};
use crate::errors::{AppError, AuthError};
use crate::interfaces::repositories::account::AccountRepository;
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::token::TokenService;

pub struct AuthHandler<R, T>
where
    R: AccountRepository,
    T: TokenService,
{
    pub account_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: AccountRepository,
    T: TokenService,
{
    pub fn new(account_repo: R, token_service: T) -> Self {
        AuthHandler {
            account_repo,
            token_service,
        }
    }

    /// Creates a new identity after validation and password hashing.
    pub async fn signup(&self, request: SignupRequest) -> Result<NewAccountResponse, AppError> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let account_insert = request.prepare_for_insert(hashed_password);

        let id = self.account_repo.create_account(&account_insert).await?;

        Ok(NewAccountResponse {
            id,
            message: "Account created successfully".to_string(),
        })
    }

    /// Logs in a user by validating credentials and generating JWTs.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        request
            .validate()
            .map_err(|_| AuthError::MissingCredentials)?;

        let user = self.account_repo.get_account_by_email(&request.email)
            .await
            .map_err(|_e| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!("User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;
        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Refreshes the access token using the refresh token.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.account_repo.get_account_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&user)
    }

    pub async fn current_account(&self, user_id: &Uuid) -> Result<PublicUser, AppError> {
        let user = self.account_repo.get_account_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        Ok(PublicUser::from(user))
    }
}
