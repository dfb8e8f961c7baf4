//! Contact form submissions

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::models::{Contact, CreateContactDto, Validate, CONTACTS};
use crate::notify::{EmailSender, EmailTemplate, NotifyResult};
use crate::observability::Event;
use crate::query::{execute, NormalizedQuery, Paginated};
use crate::store::{document_id, DocumentStore, Update};

use super::{to_document, ServiceResult};

pub struct ContactService {
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn EmailSender>,
}

impl ContactService {
    pub fn new(store: Arc<dyn DocumentStore>, mailer: Arc<dyn EmailSender>) -> Self {
        Self { store, mailer }
    }

    async fn notify(&self, contact: &Contact) -> NotifyResult<()> {
        self.mailer
            .send(EmailTemplate::ContactNotification {
                first_name: contact.first_name.clone(),
                last_name: contact.last_name.clone(),
                email: contact.email.clone(),
                phone_number: contact.phone_number.clone(),
                description: contact.description.clone(),
            })
            .await?;
        self.mailer
            .send(EmailTemplate::ContactAcknowledgment {
                to: contact.email.clone(),
                first_name: contact.first_name.clone(),
            })
            .await
    }

    /// Store a submission, then notify the admin and thank the sender.
    ///
    /// The submission is marked acknowledged only when both emails went out.
    /// Once stored, email or flag failures are logged and the stored
    /// document is still returned.
    pub async fn create(&self, dto: CreateContactDto) -> ServiceResult<Value> {
        dto.validate()?;
        let contact = dto.into_contact();
        let doc = self.store.insert(CONTACTS, to_document(&contact)?).await?;
        let id = document_id(&doc).unwrap_or_default().to_string();
        info!(event = Event::ContactReceived.as_str(), contact_id = %id);

        if let Err(e) = self.notify(&contact).await {
            warn!(
                event = Event::ContactEmailFailed.as_str(),
                contact_id = %id,
                code = e.code(),
                error = %e,
            );
            return Ok(doc);
        }

        let mut changes = Map::new();
        changes.insert("isAcknowledged".to_string(), Value::Bool(true));
        match self
            .store
            .update_by_id(CONTACTS, &id, &Update::Set(changes))
            .await
        {
            Ok(acknowledged) => {
                info!(event = Event::ContactAcknowledged.as_str(), contact_id = %id);
                Ok(acknowledged.unwrap_or(doc))
            }
            // Stored and emailed; only the flag is missing
            Err(e) => {
                warn!(
                    event = Event::ContactAcknowledgeFailed.as_str(),
                    contact_id = %id,
                    code = e.code(),
                    error = %e,
                );
                Ok(doc)
            }
        }
    }

    pub async fn find_all(&self, query: &NormalizedQuery) -> ServiceResult<Paginated<Value>> {
        Ok(execute(self.store.as_ref(), CONTACTS, query, &[]).await?)
    }
}
