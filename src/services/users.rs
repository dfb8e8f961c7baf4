//! User accounts

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::credentials::{hash_password, ResetToken};
use crate::models::{CreateUserDto, UpdateUserDto, User, Validate, PRIVATE_FIELDS, USERS};
use crate::notify::{EmailSender, EmailTemplate};
use crate::observability::Event;
use crate::query::{execute, Filter, NormalizedQuery, Paginated, Predicate};
use crate::store::{document_id, DocumentStore, Update};

use super::{reject_hidden_fields, strip_fields, to_document, ServiceError, ServiceResult};

pub struct UsersService {
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn EmailSender>,
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound(format!("User with ID {} not found", id))
}

fn public(doc: Value) -> Value {
    strip_fields(doc, PRIVATE_FIELDS)
}

impl UsersService {
    pub fn new(store: Arc<dyn DocumentStore>, mailer: Arc<dyn EmailSender>) -> Self {
        Self { store, mailer }
    }

    /// Create an account and send an invitation to set a password.
    ///
    /// A failed invitation is logged; the account is still created.
    pub async fn create(&self, dto: CreateUserDto) -> ServiceResult<Value> {
        dto.validate()?;
        if self.find_by_email(&dto.email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&dto.password)?;
        let token = ResetToken::issue();
        let mut user = dto.into_user(password_hash);
        user.reset_password_token = Some(token.hashed);
        user.reset_password_expires = Some(token.expires_at);

        let doc = self.store.insert(USERS, to_document(&user)?).await?;
        let id = document_id(&doc).unwrap_or_default().to_string();
        info!(event = Event::UserCreated.as_str(), user_id = %id);

        let invitation = EmailTemplate::Invitation {
            to: user.email.clone(),
            first_name: user.first_name.clone(),
            token: token.raw,
        };
        match self.mailer.send(invitation).await {
            Ok(()) => info!(event = Event::InvitationSent.as_str(), user_id = %id),
            Err(e) => warn!(
                event = Event::InvitationFailed.as_str(),
                user_id = %id,
                code = e.code(),
                error = %e,
            ),
        }

        Ok(public(doc))
    }

    pub async fn find_all(&self, query: &NormalizedQuery) -> ServiceResult<Paginated<Value>> {
        reject_hidden_fields(query, PRIVATE_FIELDS)?;
        let page = execute(self.store.as_ref(), USERS, query, &[]).await?;
        Ok(page.map(public))
    }

    pub async fn find_one(&self, id: &str) -> ServiceResult<Value> {
        self.store
            .find_by_id(USERS, id)
            .await?
            .map(public)
            .ok_or_else(|| not_found(id))
    }

    /// Full stored record, password hash included
    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let filter = Filter::match_all().and(Predicate::eq("email", json!(email)));
        match self.store.find_one(USERS, &filter).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn update(&self, id: &str, mut dto: UpdateUserDto) -> ServiceResult<Value> {
        dto.validate()?;

        if let Some(email) = &dto.email {
            if let Some(existing) = self.find_by_email(email).await? {
                if existing.id != id {
                    return Err(ServiceError::Conflict("Email already exists".to_string()));
                }
            }
        }
        if let Some(password) = &dto.password {
            dto.password = Some(hash_password(password)?);
        }

        let changes = match to_document(&dto)? {
            Value::Object(changes) => changes,
            _ => Default::default(),
        };
        let doc = self
            .store
            .update_by_id(USERS, id, &Update::Set(changes))
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(event = Event::UserUpdated.as_str(), user_id = %id);
        Ok(public(doc))
    }

    pub async fn remove(&self, id: &str) -> ServiceResult<()> {
        if !self.store.delete_by_id(USERS, id).await? {
            return Err(not_found(id));
        }
        info!(event = Event::UserDeleted.as_str(), user_id = %id);
        Ok(())
    }
}
