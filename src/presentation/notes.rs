use crate::domain::note::{CreateNote, DeleteResponse, ListNotesQuery, UpdateNote};
use crate::domain::user::AuthenticatedUser;
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument, warn};

#[instrument(skip(state, user), fields(category = ?query.category, search = ?query.search))]
pub async fn list_notes(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    query: web::Query<ListNotesQuery>,
) -> Result<HttpResponse, ApiError> {
    let notes = state.notes.list(user.as_ref(), query.into_inner()).await?;
    info!(count = notes.len(), "Notes listed");
    Ok(HttpResponse::Ok().json(notes))
}

#[instrument(skip(state, user), fields(note_id = %*path))]
pub async fn get_note(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let note = state.notes.get(user.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(note))
}

#[instrument(skip(state, user, req))]
pub async fn create_note(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    req: web::Json<CreateNote>,
) -> Result<HttpResponse, ApiError> {
    let note = state
        .notes
        .create(user.as_ref(), req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create note");
            e
        })?;
    info!(note_id = %note.id, "Note created successfully");
    Ok(HttpResponse::Created().json(note))
}

#[instrument(skip(state, user, req), fields(note_id = %*path))]
pub async fn update_note(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    path: web::Path<String>,
    req: web::Json<UpdateNote>,
) -> Result<HttpResponse, ApiError> {
    let note = state
        .notes
        .update(user.as_ref(), &path, req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update note");
            e
        })?;
    Ok(HttpResponse::Ok().json(note))
}

#[instrument(skip(state, user), fields(note_id = %*path))]
pub async fn delete_note(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.notes.delete(user.as_ref(), &path).await?;
    info!("Note deleted successfully");
    Ok(HttpResponse::Ok().json(DeleteResponse { success: true }))
}

#[instrument(skip_all)]
pub async fn list_categories(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, ApiError> {
    let categories = state.notes.categories(user.as_ref()).await?;
    Ok(HttpResponse::Ok().json(categories))
}
