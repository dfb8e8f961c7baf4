//! atlasdesk - project management backend
//!
//! Users, clients, projects and contact requests over a JSON HTTP API. List
//! endpoints share one query engine for pagination, search, filtering,
//! sorting and field selection.

pub mod cli;
pub mod credentials;
pub mod http_server;
pub mod models;
pub mod notify;
pub mod observability;
pub mod query;
pub mod services;
pub mod store;
