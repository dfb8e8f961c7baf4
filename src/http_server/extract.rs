//! Request extractors
//!
//! Body and query-string parsing that fails with [`ApiError`] so rejected
//! requests share the response shape of every other error.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::observability::Event;
use crate::query::{NormalizedQuery, QueryRequest};

use super::errors::ApiError;
use super::state::AppState;

/// JSON request body. Unknown fields and type mismatches are validation
/// failures.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// List-endpoint query string, normalized with the configured page limits
pub struct ListQuery(pub NormalizedQuery);

impl FromRequestParts<Arc<AppState>> for ListQuery {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;
        let request = QueryRequest::from_pairs(pairs).map_err(|e| {
            debug!(event = Event::QueryRejected.as_str(), code = e.code(), error = %e);
            e
        })?;
        Ok(ListQuery(request.normalize(&state.limits)))
    }
}
