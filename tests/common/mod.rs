//! Shared harness for HTTP API tests
//!
//! Requests go straight into the router through `oneshot`; no socket is
//! bound.

#![allow(dead_code)]

use std::sync::Arc;

use atlasdesk::http_server::{build_router, AppState, HttpServerConfig};
use atlasdesk::notify::{EmailSender, MockEmailSender};
use atlasdesk::query::PageLimits;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<MockEmailSender>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(Arc::new(MockEmailSender::new()))
    }

    pub fn with_mailer(mailer: Arc<MockEmailSender>) -> Self {
        let sender: Arc<dyn EmailSender> = mailer.clone();
        let state = Arc::new(AppState::in_memory(sender, PageLimits::default()));
        Self {
            router: build_router(&HttpServerConfig::default(), state),
            mailer,
        }
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            router: build_router(&HttpServerConfig::default(), Arc::new(state)),
            mailer: Arc::new(MockEmailSender::new()),
        }
    }

    /// Send a request and decode the body; an empty body decodes as `null`
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Create a user and return its id
    pub async fn create_user(&self, first_name: &str, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/users",
                json!({
                    "firstName": first_name,
                    "lastName": "Tester",
                    "email": email,
                    "password": "secret123"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        id_of(&body)
    }

    /// Create a client and return its id
    pub async fn create_client(&self, company_name: &str, industry: &str) -> String {
        let email = format!(
            "{}@example.com",
            company_name.to_lowercase().replace(' ', ".")
        );
        let (status, body) = self
            .post(
                "/api/clients",
                json!({
                    "companyName": company_name,
                    "contactPerson": "Jane Roe",
                    "email": email,
                    "industry": industry
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        id_of(&body)
    }
}

pub fn id_of(doc: &Value) -> String {
    doc["_id"].as_str().unwrap().to_string()
}
