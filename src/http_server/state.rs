//! Shared handler state

use std::sync::Arc;

use crate::models::USERS;
use crate::notify::EmailSender;
use crate::query::PageLimits;
use crate::services::{ClientsService, ContactService, ProjectsService, UsersService};
use crate::store::{DocumentStore, MemoryStore};

/// Services shared across handlers
pub struct AppState {
    pub users: UsersService,
    pub clients: ClientsService,
    pub projects: ProjectsService,
    pub contact: ContactService,
    /// Page size bounds for list endpoints
    pub limits: PageLimits,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn EmailSender>,
        limits: PageLimits,
    ) -> Self {
        Self {
            users: UsersService::new(store.clone(), mailer.clone()),
            clients: ClientsService::new(store.clone()),
            projects: ProjectsService::new(store.clone()),
            contact: ContactService::new(store, mailer),
            limits,
        }
    }

    /// State over a fresh in-memory store with unique user emails
    pub fn in_memory(mailer: Arc<dyn EmailSender>, limits: PageLimits) -> Self {
        let store = Arc::new(MemoryStore::new().with_unique(USERS, "email"));
        Self::new(store, mailer, limits)
    }
}
