//! Projects with their client and team

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::models::{
    CreateProjectDto, Project, UpdateProjectDto, Validate, CLIENTS, PRIVATE_FIELDS, PROJECTS,
    USERS,
};
use crate::observability::Event;
use crate::query::{execute, NormalizedQuery, Paginated};
use crate::store::{document_id, DocumentStore, Relation, Update};

use super::{to_document, ServiceError, ServiceResult};

pub struct ProjectsService {
    store: Arc<dyn DocumentStore>,
    relations: Vec<Relation>,
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Project not found".to_string())
}

impl ProjectsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            relations: vec![
                Relation::new("client", CLIENTS),
                Relation::new("teamMembers", USERS).hiding(PRIVATE_FIELDS),
            ],
        }
    }

    async fn expand_one(&self, doc: Value) -> ServiceResult<Value> {
        let mut expanded = self.store.expand(vec![doc], &self.relations).await?;
        expanded.pop().ok_or_else(not_found)
    }

    async fn require_client(&self, id: &str) -> ServiceResult<()> {
        match self.store.find_by_id(CLIENTS, id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(format!(
                "Client with ID {} not found",
                id
            ))),
        }
    }

    async fn require_users(&self, ids: &[String]) -> ServiceResult<()> {
        for id in ids {
            if self.store.find_by_id(USERS, id).await?.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "User with ID {} not found",
                    id
                )));
            }
        }
        Ok(())
    }

    pub async fn create(&self, dto: CreateProjectDto) -> ServiceResult<Value> {
        dto.validate()?;
        self.require_client(&dto.client_id).await?;
        self.require_users(&dto.team_member_ids).await?;

        let doc = self
            .store
            .insert(PROJECTS, to_document(&dto.into_project())?)
            .await?;
        info!(
            event = Event::ProjectCreated.as_str(),
            project_id = document_id(&doc).unwrap_or_default(),
        );
        self.expand_one(doc).await
    }

    pub async fn find_all(&self, query: &NormalizedQuery) -> ServiceResult<Paginated<Value>> {
        Ok(execute(self.store.as_ref(), PROJECTS, query, &self.relations).await?)
    }

    pub async fn find_one(&self, id: &str) -> ServiceResult<Value> {
        let doc = self
            .store
            .find_by_id(PROJECTS, id)
            .await?
            .ok_or_else(not_found)?;
        self.expand_one(doc).await
    }

    pub async fn update(&self, id: &str, dto: UpdateProjectDto) -> ServiceResult<Value> {
        let current: Project = match self.store.find_by_id(PROJECTS, id).await? {
            Some(doc) => serde_json::from_value(doc)?,
            None => return Err(not_found()),
        };
        dto.validate_against(&current)?;
        if let Some(client_id) = &dto.client_id {
            self.require_client(client_id).await?;
        }
        if let Some(ids) = &dto.team_member_ids {
            self.require_users(ids).await?;
        }

        let doc = self
            .store
            .update_by_id(PROJECTS, id, &Update::Set(dto.into_changes()))
            .await?
            .ok_or_else(not_found)?;
        info!(event = Event::ProjectUpdated.as_str(), project_id = %id);
        self.expand_one(doc).await
    }

    pub async fn remove(&self, id: &str) -> ServiceResult<()> {
        if !self.store.delete_by_id(PROJECTS, id).await? {
            return Err(not_found());
        }
        info!(event = Event::ProjectDeleted.as_str(), project_id = %id);
        Ok(())
    }

    /// Add a user to the team. Adding an existing member changes nothing.
    pub async fn add_team_member(&self, id: &str, user_id: &str) -> ServiceResult<Value> {
        if self.store.find_by_id(PROJECTS, id).await?.is_none() {
            return Err(not_found());
        }
        self.require_users(&[user_id.to_string()]).await?;

        let update = Update::AddToSet {
            field: "teamMembers".to_string(),
            value: Value::String(user_id.to_string()),
        };
        let doc = self
            .store
            .update_by_id(PROJECTS, id, &update)
            .await?
            .ok_or_else(not_found)?;
        info!(
            event = Event::TeamMemberAdded.as_str(),
            project_id = %id,
            user_id = %user_id,
        );
        self.expand_one(doc).await
    }

    pub async fn remove_team_member(&self, id: &str, user_id: &str) -> ServiceResult<Value> {
        let update = Update::Pull {
            field: "teamMembers".to_string(),
            value: Value::String(user_id.to_string()),
        };
        let doc = self
            .store
            .update_by_id(PROJECTS, id, &update)
            .await?
            .ok_or_else(not_found)?;
        info!(
            event = Event::TeamMemberRemoved.as_str(),
            project_id = %id,
            user_id = %user_id,
        );
        self.expand_one(doc).await
    }
}
