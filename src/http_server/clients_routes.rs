//! Client HTTP Routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::models::{CreateClientDto, UpdateClientDto};
use crate::query::Paginated;

use super::errors::ApiError;
use super::extract::{JsonBody, ListQuery};
use super::state::AppState;

/// Create client routes
pub fn clients_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/clients", get(list_clients_handler).post(create_client_handler))
        .route(
            "/clients/{id}",
            get(get_client_handler)
                .patch(update_client_handler)
                .delete(delete_client_handler),
        )
        .with_state(state)
}

async fn create_client_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(dto): JsonBody<CreateClientDto>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let client = state.clients.create(dto).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn list_clients_handler(
    State(state): State<Arc<AppState>>,
    ListQuery(query): ListQuery,
) -> Result<Json<Paginated<Value>>, ApiError> {
    Ok(Json(state.clients.find_all(&query).await?))
}

async fn get_client_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.clients.find_one(&id).await?))
}

async fn update_client_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(dto): JsonBody<UpdateClientDto>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.clients.update(&id, dto).await?))
}

async fn delete_client_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.clients.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
