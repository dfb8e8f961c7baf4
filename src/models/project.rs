//! Client projects

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::{Validate, ValidationErrors};

/// Collection holding projects
pub const PROJECTS: &str = "projects";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

/// Stored project document. `client` and `team_members` hold ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub client: String,
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

fn check_dates(errors: &mut ValidationErrors, start: NaiveDate, end: Option<NaiveDate>) {
    if let Some(end) = end {
        if end < start {
            errors.add("endDate", "endDate must not be before startDate");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProjectDto {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    pub client_id: String,
    #[serde(default)]
    pub team_member_ids: Vec<String>,
}

impl CreateProjectDto {
    pub fn into_project(self) -> Project {
        let mut team_members: Vec<String> = Vec::with_capacity(self.team_member_ids.len());
        for id in self.team_member_ids {
            if !team_members.contains(&id) {
                team_members.push(id);
            }
        }

        Project {
            id: String::new(),
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            client: self.client_id,
            team_members,
            status: self.status.unwrap_or_default(),
            is_active: true,
        }
    }
}

impl Validate for CreateProjectDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_blank("name", &self.name);
        errors.not_blank("description", &self.description);
        errors.not_blank("clientId", &self.client_id);
        if self.team_member_ids.iter().any(|id| id.trim().is_empty()) {
            errors.add("teamMemberIds", "each value in teamMemberIds should not be empty");
        }
        check_dates(&mut errors, self.start_date, self.end_date);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProjectDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub team_member_ids: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateProjectDto {
    /// Check the update against the project it modifies
    pub fn validate_against(&self, current: &Project) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        let start = self.start_date.unwrap_or(current.start_date);
        let end = self.end_date.or(current.end_date);
        if errors.get("endDate").is_none() {
            check_dates(&mut errors, start, end);
        }
        errors.into_result()
    }

    /// Fields to overwrite on the stored document
    pub fn into_changes(self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(name) = self.name {
            changes.insert("name".to_string(), Value::String(name));
        }
        if let Some(description) = self.description {
            changes.insert("description".to_string(), Value::String(description));
        }
        if let Some(start) = self.start_date {
            changes.insert("startDate".to_string(), Value::String(start.to_string()));
        }
        if let Some(end) = self.end_date {
            changes.insert("endDate".to_string(), Value::String(end.to_string()));
        }
        if let Some(status) = self.status {
            if let Ok(value) = serde_json::to_value(status) {
                changes.insert("status".to_string(), value);
            }
        }
        if let Some(client) = self.client_id {
            changes.insert("client".to_string(), Value::String(client));
        }
        if let Some(ids) = self.team_member_ids {
            let mut members: Vec<Value> = Vec::with_capacity(ids.len());
            for id in ids.into_iter().map(Value::String) {
                if !members.contains(&id) {
                    members.push(id);
                }
            }
            changes.insert("teamMembers".to_string(), Value::Array(members));
        }
        if let Some(is_active) = self.is_active {
            changes.insert("isActive".to_string(), Value::Bool(is_active));
        }
        changes
    }
}

impl Validate for UpdateProjectDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.not_blank("name", name);
        }
        if let Some(description) = &self.description {
            errors.not_blank("description", description);
        }
        if let Some(client) = &self.client_id {
            errors.not_blank("clientId", client);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            check_dates(&mut errors, start, Some(end));
        }
        errors.into_result()
    }
}
