use crate::application::auth_service::AuthService;
use crate::application::note_service::NoteService;
use crate::data::note_repository::InMemoryNoteRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::AuthenticatedUser;
use crate::presentation::{auth, notes};
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

// AppState holding the services
pub struct AppState {
    pub notes: NoteService<InMemoryNoteRepository>,
    pub auth: AuthService<InMemoryUserRepository>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    success: bool,
    error: ErrorBody<'a>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to clients; internal details stay in the logs.
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::Internal(_) => "Internal server error",
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, status = %status, "Internal error");
        } else {
            warn!(error = %self, code = self.code(), status = %status, "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse {
            success: false,
            error: ErrorBody {
                message: self.public_message(),
                code: self.code(),
            },
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(other) => ApiError::Internal(format!("{:#}", other)),
        }
    }
}

// AuthenticatedUser extractor. Handlers take `Option<AuthenticatedUser>` and
// leave the decision to the service layer.
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string())))
    }
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

/// Registers every `/api` route plus the extractor configs they rely on.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health_check))
                .route("/auth/register", web::post().to(auth::register))
                .route("/auth/login", web::post().to(auth::login))
                .route("/auth/verify", web::post().to(auth::verify))
                .route("/auth/me", web::get().to(auth::me))
                .route("/notes", web::get().to(notes::list_notes))
                .route("/notes", web::post().to(notes::create_note))
                .route("/notes/{id}", web::get().to(notes::get_note))
                .route("/notes/{id}", web::patch().to(notes::update_note))
                .route("/notes/{id}", web::delete().to(notes::delete_note))
                .route("/categories", web::get().to(notes::list_categories))
                .default_service(web::to(route_not_found)),
        );
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn route_not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(format!(
        "Route {} {} not found",
        req.method(),
        req.path()
    )))
}
