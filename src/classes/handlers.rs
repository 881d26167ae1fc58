use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{dto::ClassDraft, repo_types::CharacterClass, services};
use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/class", post(create_class))
        .route("/class/random", post(create_random_class))
        .route(
            "/class/:id",
            get(get_class).patch(update_class).delete(delete_class),
        )
        .route("/notes", get(list_classes))
}

#[instrument(skip(state, draft))]
pub async fn create_class(
    State(state): State<AppState>,
    AppJson(draft): AppJson<ClassDraft>,
) -> Result<Json<CharacterClass>, AppError> {
    let class = services::create_class(state.classes.as_ref(), draft).await?;
    Ok(Json(class))
}

/// POST /class/random. The body is ignored.
#[instrument(skip(state))]
pub async fn create_random_class(
    State(state): State<AppState>,
) -> Result<Json<CharacterClass>, AppError> {
    let class = services::create_random_class(state.classes.as_ref()).await?;
    Ok(Json(class))
}

#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CharacterClass>, AppError> {
    Ok(Json(services::get_class(state.classes.as_ref(), id).await?))
}

#[instrument(skip(state))]
pub async fn list_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<CharacterClass>>, AppError> {
    Ok(Json(services::list_classes(state.classes.as_ref()).await?))
}

#[instrument(skip(state, patch))]
pub async fn update_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<ClassDraft>,
) -> Result<Json<CharacterClass>, AppError> {
    let class = services::update_class(state.classes.as_ref(), id, patch).await?;
    Ok(Json(class))
}

#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CharacterClass>, AppError> {
    Ok(Json(services::delete_class(state.classes.as_ref(), id).await?))
}
