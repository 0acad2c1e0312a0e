use crate::domain::user::{AuthenticatedUser, CreateUser, LoginRequest, VerifyRequest};
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument, warn};

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let response = state.auth.register(req.into_inner()).await.map_err(|e| {
        warn!(error = %e, "Failed to register user");
        ApiError::from(e)
    })?;

    info!(user_id = %response.user.id, "User registered successfully");
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let response = state.auth.login(req.into_inner()).await.map_err(|e| {
        warn!(error = %e, "Failed to login");
        ApiError::from(e)
    })?;

    info!(user_id = %response.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip_all)]
pub async fn verify(
    state: web::Data<AppState>,
    req: web::Json<VerifyRequest>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.auth.verify(&req.token))
}

#[instrument(skip_all)]
pub async fn me(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, ApiError> {
    let profile = state.auth.me(user.as_ref()).await?;
    Ok(HttpResponse::Ok().json(profile))
}
