//! Client companies

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::models::{CreateClientDto, UpdateClientDto, Validate, CLIENTS};
use crate::observability::Event;
use crate::query::{execute, NormalizedQuery, Paginated};
use crate::store::{document_id, DocumentStore, Update};

use super::{to_document, ServiceError, ServiceResult};

pub struct ClientsService {
    store: Arc<dyn DocumentStore>,
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Client not found".to_string())
}

impl ClientsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateClientDto) -> ServiceResult<Value> {
        dto.validate()?;
        let doc = self
            .store
            .insert(CLIENTS, to_document(&dto.into_client())?)
            .await?;
        info!(
            event = Event::ClientCreated.as_str(),
            client_id = document_id(&doc).unwrap_or_default(),
        );
        Ok(doc)
    }

    pub async fn find_all(&self, query: &NormalizedQuery) -> ServiceResult<Paginated<Value>> {
        Ok(execute(self.store.as_ref(), CLIENTS, query, &[]).await?)
    }

    pub async fn find_one(&self, id: &str) -> ServiceResult<Value> {
        self.store
            .find_by_id(CLIENTS, id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn update(&self, id: &str, dto: UpdateClientDto) -> ServiceResult<Value> {
        dto.validate()?;
        let doc = self
            .store
            .update_by_id(CLIENTS, id, &Update::Set(dto.into_changes()))
            .await?
            .ok_or_else(not_found)?;
        info!(event = Event::ClientUpdated.as_str(), client_id = %id);
        Ok(doc)
    }

    pub async fn remove(&self, id: &str) -> ServiceResult<()> {
        if !self.store.delete_by_id(CLIENTS, id).await? {
            return Err(not_found());
        }
        info!(event = Event::ClientDeleted.as_str(), client_id = %id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PageLimits, QueryRequest};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn client(name: &str, email: &str) -> CreateClientDto {
        serde_json::from_value(json!({
            "companyName": name,
            "contactPerson": "Pat",
            "email": email
        }))
        .unwrap()
    }

    async fn seeded() -> ClientsService {
        let clients = ClientsService::new(Arc::new(MemoryStore::new()));
        for (name, email) in [
            ("Acme Corp", "info@acme.com"),
            ("Globex", "sales@acme-partners.io"),
            ("Initech", "hello@initech.com"),
        ] {
            clients.create(client(name, email)).await.unwrap();
        }
        clients
    }

    #[tokio::test]
    async fn test_find_all_search_across_fields() {
        let clients = seeded().await;
        let query = QueryRequest::new()
            .with_search("ACME", ["companyName", "email"])
            .normalize(&PageLimits::default());

        let page = clients.find_all(&query).await.unwrap();
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.total_pages, 1);
        assert!(!page.meta.has_next_page);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let clients = seeded().await;
        let page = clients
            .find_all(&NormalizedQuery::default())
            .await
            .unwrap();
        let id = document_id(&page.data[0]).unwrap().to_string();

        let dto: UpdateClientDto =
            serde_json::from_value(json!({"notes": "Prefers email"})).unwrap();
        let updated = clients.update(&id, dto).await.unwrap();
        assert_eq!(updated["notes"], "Prefers email");
        assert_eq!(updated["companyName"], "Acme Corp");

        clients.remove(&id).await.unwrap();
        assert_eq!(clients.find_one(&id).await.unwrap_err(), not_found());
    }

    #[tokio::test]
    async fn test_create_validation() {
        let clients = ClientsService::new(Arc::new(MemoryStore::new()));
        let err = clients
            .create(client("", "not-an-email"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert!(errors.get("companyName").is_some());
                assert!(errors.get("email").is_some());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
