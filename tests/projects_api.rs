//! Projects API Tests
//!
//! Reference checks, relation expansion and team membership.

mod common;

use axum::http::StatusCode;
use common::{id_of, TestApp};
use serde_json::{json, Value};

fn member_ids(project: &Value) -> Vec<String> {
    project["teamMembers"]
        .as_array()
        .unwrap()
        .iter()
        .map(id_of)
        .collect()
}

#[tokio::test]
async fn test_create_project_expands_references() {
    let app = TestApp::new();
    let client_id = app.create_client("Acme", "Retail").await;
    let ada = app.create_user("Ada", "ada@example.com").await;

    let (status, body) = app
        .post(
            "/api/projects",
            json!({
                "name": "Storefront",
                "description": "New online store",
                "startDate": "2024-03-01",
                "endDate": "2024-09-30",
                "clientId": client_id,
                "teamMemberIds": [ada, ada]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["status"], "PLANNING");
    assert_eq!(body["client"]["companyName"], "Acme");
    assert_eq!(member_ids(&body), [ada.clone()]);
    assert_eq!(body["teamMembers"][0]["firstName"], "Ada");
    assert!(body["teamMembers"][0].get("password").is_none());
}

#[tokio::test]
async fn test_create_project_requires_existing_client() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/projects",
            json!({
                "name": "Orphan",
                "description": "No client",
                "startDate": "2024-03-01",
                "clientId": "nope"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Client with ID nope not found");
}

#[tokio::test]
async fn test_end_date_before_start_is_invalid() {
    let app = TestApp::new();
    let client_id = app.create_client("Acme", "Retail").await;
    let (status, body) = app
        .post(
            "/api/projects",
            json!({
                "name": "Backwards",
                "description": "Ends before it starts",
                "startDate": "2024-03-01",
                "endDate": "2024-01-01",
                "clientId": client_id
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["endDate"].is_array());
}

#[tokio::test]
async fn test_team_membership_has_set_semantics() {
    let app = TestApp::new();
    let client_id = app.create_client("Acme", "Retail").await;
    let ada = app.create_user("Ada", "ada@example.com").await;
    let grace = app.create_user("Grace", "grace@example.com").await;

    let (_, project) = app
        .post(
            "/api/projects",
            json!({
                "name": "Storefront",
                "description": "New online store",
                "startDate": "2024-03-01",
                "clientId": client_id
            }),
        )
        .await;
    let project_id = id_of(&project);
    let member_uri = |user: &str| format!("/api/projects/{}/team-members/{}", project_id, user);

    let (status, _) = app.post(&member_uri(&ada), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    app.post(&member_uri(&grace), json!({})).await;
    let (_, body) = app.post(&member_uri(&ada), json!({})).await;
    assert_eq!(member_ids(&body), [ada.clone(), grace.clone()]);

    let (status, body) = app.post(&member_uri("ghost"), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User with ID ghost not found");

    let (status, body) = app.delete(&member_uri(&ada)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member_ids(&body), [grace]);
}

#[tokio::test]
async fn test_update_status_and_filter_by_it() {
    let app = TestApp::new();
    let client_id = app.create_client("Acme", "Retail").await;

    let mut ids = Vec::new();
    for name in ["Alpha", "Beta", "Gamma"] {
        let (_, project) = app
            .post(
                "/api/projects",
                json!({
                    "name": name,
                    "description": "Internal work",
                    "startDate": "2024-01-15",
                    "clientId": client_id
                }),
            )
            .await;
        ids.push(id_of(&project));
    }

    let (status, body) = app
        .patch(&format!("/api/projects/{}", ids[1]), json!({"status": "IN_PROGRESS"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "IN_PROGRESS");
    assert_eq!(body["client"]["companyName"], "Acme");

    let (_, body) = app.get("/api/projects?filter%5Bstatus%5D=IN_PROGRESS").await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Beta");
    assert_eq!(body["data"][0]["client"]["companyName"], "Acme");

    let (status, _) = app
        .patch(&format!("/api/projects/{}", ids[0]), json!({"status": "DONE"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_project() {
    let app = TestApp::new();
    let client_id = app.create_client("Acme", "Retail").await;
    let (_, project) = app
        .post(
            "/api/projects",
            json!({
                "name": "Short lived",
                "description": "Deleted right away",
                "startDate": "2024-01-15",
                "clientId": client_id
            }),
        )
        .await;
    let uri = format!("/api/projects/{}", id_of(&project));

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");
}
