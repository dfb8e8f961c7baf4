//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::MIN_PASSWORD_LENGTH;

use super::validation::{Validate, ValidationErrors};

/// Collection holding users
pub const USERS: &str = "users";

/// Stored fields never returned to callers
pub const PRIVATE_FIELDS: &[&str] = &["password", "resetPasswordToken", "resetPasswordExpires"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    ProjectManager,
    #[default]
    Developer,
    Qa,
}

/// Stored user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2id hash
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_email_verified: bool,
    /// SHA-256 of the outstanding reset token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_expires: Option<DateTime<Utc>>,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl CreateUserDto {
    /// Stored document for this request, given the password hash
    pub fn into_user(self, password_hash: String) -> User {
        User {
            id: String::new(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: password_hash,
            role: self.role.unwrap_or_default(),
            is_email_verified: false,
            reset_password_token: None,
            reset_password_expires: None,
            is_active: true,
        }
    }
}

impl Validate for CreateUserDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_blank("firstName", &self.first_name);
        errors.not_blank("lastName", &self.last_name);
        errors.email("email", &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl Validate for UpdateUserDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(first_name) = &self.first_name {
            errors.not_blank("firstName", first_name);
        }
        if let Some(last_name) = &self.last_name {
            errors.not_blank("lastName", last_name);
        }
        if let Some(email) = &self.email {
            errors.email("email", email);
        }
        if let Some(password) = &self.password {
            check_password(&mut errors, password);
        }
        errors.into_result()
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!(
                "password must be longer than or equal to {} characters",
                MIN_PASSWORD_LENGTH
            ),
        );
    }
}
