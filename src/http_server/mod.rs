//! # HTTP Server Module
//!
//! axum API over the services.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/users`, `/api/users/{id}`
//! - `/api/clients`, `/api/clients/{id}`
//! - `/api/projects`, `/api/projects/{id}`, `/api/projects/{id}/team-members/{user_id}`
//! - `/api/contact`
//!
//! List endpoints accept `page`, `limit`, `sortBy`, `sortOrder`, `search`,
//! `searchFields`, `select` and `filter`.

mod clients_routes;
mod contact_routes;
mod errors;
mod extract;
mod health_routes;
mod projects_routes;
mod state;
mod users_routes;

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::ApiError;
pub use extract::{JsonBody, ListQuery};
pub use server::{build_router, HttpServer};
pub use state::AppState;
