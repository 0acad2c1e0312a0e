use actix_web::{App, HttpServer, web};
use notes_api::application::auth_service::AuthService;
use notes_api::application::note_service::NoteService;
use notes_api::application::seed::seed_demo_data;
use notes_api::data::note_repository::InMemoryNoteRepository;
use notes_api::data::user_repository::InMemoryUserRepository;
use notes_api::infrastructure::config::Config;
use notes_api::infrastructure::logging::init_logging;
use notes_api::presentation::handlers::{AppState, configure, route_not_found};
use notes_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware, cors,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("Logging initialized successfully");

    let config = Config::from_env()?;
    info!(
        host = %config.host,
        port = config.port,
        token_ttl_secs = config.jwt_expires_in.num_seconds(),
        cors_origin = %config.cors_origin,
        "Configuration loaded"
    );

    info!("Creating in-memory repositories");
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let note_repository = Arc::new(InMemoryNoteRepository::new());

    let state = web::Data::new(AppState {
        notes: NoteService::new(note_repository),
        auth: AuthService::new(user_repository, config.jwt_secret.clone())
            .with_token_ttl(config.jwt_expires_in),
    });
    info!("Application state initialized");

    if config.seed_demo_data {
        seed_demo_data(&state.auth, &state.notes).await?;
    }

    let jwt_secret = config.jwt_secret.clone();
    let cors_origin = config.cors_origin.clone();
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(cors(&cors_origin))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(configure)
            .default_service(web::to(route_not_found))
    })
    .client_request_timeout(config.request_timeout)
    .shutdown_timeout(30);

    let bind_addr = format!("{}:{}", config.host, config.port);
    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind((config.host.as_str(), config.port))?;

    info!(
        address = %bind_addr,
        routes = %"GET /api/health, POST /api/auth/register, POST /api/auth/login, POST /api/auth/verify, GET /api/auth/me, GET|POST /api/notes, GET|PATCH|DELETE /api/notes/{id}, GET /api/categories",
        "Starting HTTP server"
    );
    server.run().await?;

    // Repositories are dropped with the last AppState handle once the workers exit.
    info!("Server stopped, shutting down");
    Ok(())
}
