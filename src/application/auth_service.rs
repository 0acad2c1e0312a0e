use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{
    AuthResponse, AuthenticatedUser, CreateUser, LoginRequest, User, UserInfo, UserProfile,
    VerifyResponse,
};
use crate::domain::validation::{validate_email, validate_login_password, validate_password};
use crate::infrastructure::security::{generate_token, hash_password, validate_token, verify_password};
use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl: Duration::hours(24),
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub async fn has_user(&self, email: &str) -> Result<bool> {
        Ok(self
            .user_repository
            .find_user_by_email(email)
            .await?
            .is_some())
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUser) -> Result<AuthResponse> {
        trace!("Starting user registration");

        validate_email(&req.email)?;
        validate_password(&req.password)?;

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Err(DomainError::validation("Email already registered").into());
        }

        let password = req.password;
        let password_hash = run_blocking(move || hash_password(&password))
            .await?
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::internal(format!("Failed to hash password: {}", e))
            })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: req.email,
            password_hash,
            created_at: Utc::now(),
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        let token = self.issue_token(&user)?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");

        Ok(AuthResponse {
            token,
            user: UserInfo::from(&user),
        })
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        trace!("Starting login");

        validate_email(&req.email)?;
        validate_login_password(&req.password)?;

        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::unauthorized(INVALID_CREDENTIALS)
            })?;

        let password = req.password;
        let password_hash = user.password_hash.clone();
        let is_valid = run_blocking(move || verify_password(&password, &password_hash))
            .await?
            .map_err(|e| {
                error!(error = %e, "Failed to verify password");
                DomainError::internal(format!("Failed to verify password: {}", e))
            })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS).into());
        }

        let token = self.issue_token(&user)?;

        info!(user_id = %user.id, email = %user.email, "Login successful");

        Ok(AuthResponse {
            token,
            user: UserInfo::from(&user),
        })
    }

    /// Never fails: any decoding problem yields `{valid: false}`.
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> VerifyResponse {
        match validate_token(token, &self.jwt_secret) {
            Ok(claims) => {
                debug!(user_id = %claims.user_id, "Token verified");
                VerifyResponse {
                    valid: true,
                    user_id: Some(claims.user_id),
                    email: Some(claims.email),
                }
            }
            Err(e) => {
                debug!(error = %e, "Token rejected");
                VerifyResponse::invalid()
            }
        }
    }

    #[instrument(skip(self, caller))]
    pub async fn me(&self, caller: Option<&AuthenticatedUser>) -> Result<UserProfile> {
        let caller = caller.ok_or_else(|| DomainError::unauthorized("Authentication required"))?;

        let user = self
            .user_repository
            .find_user_by_id(&caller.user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %caller.user_id, "Authenticated user no longer exists");
                DomainError::not_found("User not found")
            })?;

        debug!(user_id = %user.id, "Profile loaded");
        Ok(UserProfile::from(user))
    }

    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        generate_token(&user.id, &user.email, &self.jwt_secret, self.token_ttl).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::internal(format!("Failed to generate token: {}", e))
        })
    }
}

/// Argon2 is CPU bound; keep it off the async workers.
async fn run_blocking<F, T>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "Blocking password task failed");
        DomainError::internal(format!("Password task failed: {}", e))
    })
}

/// Maps token decoding failures onto `Unauthorized`, distinguishing expiry.
pub fn authenticate_token(token: &str, secret: &str) -> Result<AuthenticatedUser, DomainError> {
    use jsonwebtoken::errors::ErrorKind;

    validate_token(token, secret)
        .map(|claims| AuthenticatedUser {
            user_id: claims.user_id,
            email: claims.email,
        })
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => DomainError::unauthorized("Token expired"),
            _ => DomainError::unauthorized("Invalid token"),
        })
}
