//! # Domain Models
//!
//! Stored document shapes and the request bodies that create and modify
//! them. Request bodies reject unknown fields and are checked with
//! [`Validate`] before they reach a service.

mod client;
mod contact;
mod project;
mod user;
mod validation;

pub use client::{Client, CreateClientDto, CustomField, UpdateClientDto, CLIENTS};
pub use contact::{Contact, CreateContactDto, CONTACTS};
pub use project::{CreateProjectDto, Project, ProjectStatus, UpdateProjectDto, PROJECTS};
pub use user::{CreateUserDto, UpdateUserDto, User, UserRole, PRIVATE_FIELDS, USERS};
pub use validation::{is_email, is_phone_number, Validate, ValidationErrors};
