//! Project HTTP Routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::models::{CreateProjectDto, UpdateProjectDto};
use crate::query::Paginated;

use super::errors::ApiError;
use super::extract::{JsonBody, ListQuery};
use super::state::AppState;

/// Create project routes
pub fn projects_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/projects", get(list_projects_handler).post(create_project_handler))
        .route(
            "/projects/{id}",
            get(get_project_handler)
                .patch(update_project_handler)
                .delete(delete_project_handler),
        )
        // Team membership
        .route(
            "/projects/{id}/team-members/{user_id}",
            post(add_team_member_handler).delete(remove_team_member_handler),
        )
        .with_state(state)
}

async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(dto): JsonBody<CreateProjectDto>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let project = state.projects.create(dto).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn list_projects_handler(
    State(state): State<Arc<AppState>>,
    ListQuery(query): ListQuery,
) -> Result<Json<Paginated<Value>>, ApiError> {
    Ok(Json(state.projects.find_all(&query).await?))
}

async fn get_project_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.projects.find_one(&id).await?))
}

async fn update_project_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(dto): JsonBody<UpdateProjectDto>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.projects.update(&id, dto).await?))
}

async fn delete_project_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.projects.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_team_member_handler(
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.projects.add_team_member(&id, &user_id).await?))
}

async fn remove_team_member_handler(
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.projects.remove_team_member(&id, &user_id).await?))
}
