//! User HTTP Routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::models::{CreateUserDto, UpdateUserDto};
use crate::query::Paginated;

use super::errors::ApiError;
use super::extract::{JsonBody, ListQuery};
use super::state::AppState;

/// Create user routes
pub fn users_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(state)
}

async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(dto): JsonBody<CreateUserDto>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = state.users.create(dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    ListQuery(query): ListQuery,
) -> Result<Json<Paginated<Value>>, ApiError> {
    Ok(Json(state.users.find_all(&query).await?))
}

async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.users.find_one(&id).await?))
}

async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(dto): JsonBody<UpdateUserDto>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.users.update(&id, dto).await?))
}

async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
