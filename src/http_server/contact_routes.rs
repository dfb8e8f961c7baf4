//! Contact Form HTTP Routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::Value;

use crate::models::CreateContactDto;
use crate::query::Paginated;

use super::errors::ApiError;
use super::extract::{JsonBody, ListQuery};
use super::state::AppState;

/// Create contact routes
pub fn contact_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/contact", get(list_contacts_handler).post(create_contact_handler))
        .with_state(state)
}

async fn create_contact_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(dto): JsonBody<CreateContactDto>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let contact = state.contact.create(dto).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_contacts_handler(
    State(state): State<Arc<AppState>>,
    ListQuery(query): ListQuery,
) -> Result<Json<Paginated<Value>>, ApiError> {
    Ok(Json(state.contact.find_all(&query).await?))
}
