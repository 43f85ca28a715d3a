//! REST API integration tests
//!
//! Drives the full router over the in-memory store.

#![cfg(feature = "ssr")]

#[macro_use]
mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{parse_id, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_banner_and_json_fallback() {
    let app = TestApp::new();

    let banner = app.request(Method::GET, "/", None, None).await;
    assert_status!(banner, StatusCode::OK);
    assert_eq!(banner.body["message"], "Task Collaboration Platform API");

    let missing = app.request(Method::GET, "/api/nowhere", None, None).await;
    assert_status!(missing, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["status"], 404);
}

#[tokio::test]
async fn test_register_login_profile() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let login = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": TEST_PASSWORD })),
        )
        .await;
    assert_status!(login, StatusCode::OK);
    assert_eq!(parse_id(&login.body["user"]["id"]), alice.id);
    assert!(login.body["user"].get("passwordHash").is_none());

    let wrong = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "not-the-password" })),
        )
        .await;
    assert_status!(wrong, StatusCode::UNAUTHORIZED);

    let profile = app.get("/api/auth/profile", &alice.token).await;
    assert_status!(profile, StatusCode::OK);
    assert_eq!(profile.body["username"], "alice");
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = TestApp::new();
    app.register("alice").await;

    let again = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "alice2",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
            })),
        )
        .await;
    assert_status!(again, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let anonymous = app.request(Method::GET, "/api/projects", None, None).await;
    assert_status!(anonymous, StatusCode::UNAUTHORIZED);

    let garbage = app.get("/api/projects", "not-a-jwt").await;
    assert_status!(garbage, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_is_member_and_add_member_twice() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let project = app.create_project(&alice, "Sprint 1").await;
    let project_id = parse_id(&project["id"]);
    assert_eq!(project["members"], json!([alice.id]));

    let added = app.add_member(&alice, project_id, &bob).await;
    assert_status!(added, StatusCode::OK);
    assert_eq!(added.body["members"], json!([alice.id, bob.id]));

    let twice = app.add_member(&alice, project_id, &bob).await;
    assert_status!(twice, StatusCode::BAD_REQUEST);

    let reread = app.get(&format!("/api/projects/{}", project_id), &alice.token).await;
    assert_eq!(reread.body["members"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_add_unknown_user_is_not_found() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let project_id = parse_id(&app.create_project(&alice, "Sprint 1").await["id"]);

    let response = app
        .post(
            &format!("/api/projects/{}/members", project_id),
            &alice.token,
            json!({ "userId": uuid::Uuid::new_v4() }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_member_forbidden() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let mallory = app.register("mallory").await;
    let project_id = parse_id(&app.create_project(&alice, "Sprint 1").await["id"]);
    let task_id = parse_id(&app.create_task(&alice, project_id, "Fix bug").await["id"]);

    let project = app.get(&format!("/api/projects/{}", project_id), &mallory.token).await;
    assert_status!(project, StatusCode::FORBIDDEN);

    let task = app.get(&format!("/api/tasks/{}", task_id), &mallory.token).await;
    assert_status!(task, StatusCode::FORBIDDEN);

    let listing = app
        .get(&format!("/api/tasks/project/{}", project_id), &mallory.token)
        .await;
    assert_status!(listing, StatusCode::FORBIDDEN);

    let member_view = app.get(&format!("/api/tasks/{}", task_id), &alice.token).await;
    assert_status!(member_view, StatusCode::OK);

    let missing = app
        .get(&format!("/api/projects/{}", uuid::Uuid::new_v4()), &alice.token)
        .await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_owner_updates_project() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let project_id = parse_id(&app.create_project(&alice, "Sprint 1").await["id"]);
    app.add_member(&alice, project_id, &bob).await;

    let by_member = app
        .put(
            &format!("/api/projects/{}", project_id),
            &bob.token,
            json!({ "title": "Hijacked" }),
        )
        .await;
    assert_status!(by_member, StatusCode::FORBIDDEN);

    let by_owner = app
        .put(
            &format!("/api/projects/{}", project_id),
            &alice.token,
            json!({ "status": "completed" }),
        )
        .await;
    assert_status!(by_owner, StatusCode::OK);
    assert_eq!(by_owner.body["status"], "completed");
    assert_eq!(by_owner.body["title"], "Sprint 1");
}

#[tokio::test]
async fn test_task_delete_permissions() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;
    let project_id = parse_id(&app.create_project(&alice, "Sprint 1").await["id"]);
    app.add_member(&alice, project_id, &bob).await;
    app.add_member(&alice, project_id, &carol).await;

    let by_bob = parse_id(&app.create_task(&bob, project_id, "Bob's task").await["id"]);
    let other = parse_id(&app.create_task(&bob, project_id, "Another").await["id"]);

    let carol_tries = app.delete(&format!("/api/tasks/{}", by_bob), &carol.token).await;
    assert_status!(carol_tries, StatusCode::FORBIDDEN);

    let creator = app.delete(&format!("/api/tasks/{}", by_bob), &bob.token).await;
    assert_status!(creator, StatusCode::OK);
    assert_eq!(creator.body["message"], "Task removed");

    let owner = app.delete(&format!("/api/tasks/{}", other), &alice.token).await;
    assert_status!(owner, StatusCode::OK);

    let gone = app.get(&format!("/api/tasks/{}", other), &alice.token).await;
    assert_status!(gone, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_explicit_presence_updates() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let project_id = parse_id(&app.create_project(&alice, "Sprint 1").await["id"]);

    let created = app
        .post(
            "/api/tasks",
            &alice.token,
            json!({
                "title": "Write docs",
                "project": project_id,
                "description": "first draft",
                "priority": "high",
                "assignedTo": alice.id,
                "dueDate": "2026-12-01T00:00:00Z",
            }),
        )
        .await;
    assert_status!(created, StatusCode::CREATED);
    let task_id = parse_id(&created.body["id"]);
    let uri = format!("/api/tasks/{}", task_id);

    let emptied = app.put(&uri, &alice.token, json!({ "description": "" })).await;
    assert_status!(emptied, StatusCode::OK);
    assert_eq!(emptied.body["description"], "");
    assert_eq!(emptied.body["priority"], "high");
    assert_eq!(emptied.body["title"], "Write docs");

    let cleared = app
        .put(&uri, &alice.token, json!({ "assignedTo": null, "dueDate": null }))
        .await;
    assert_status!(cleared, StatusCode::OK);
    assert!(cleared.body["assignedTo"].is_null());
    assert!(cleared.body["dueDate"].is_null());
    assert_eq!(cleared.body["priority"], "high");

    let blank_title = app.put(&uri, &alice.token, json!({ "title": "   " })).await;
    assert_status!(blank_title, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_project_removes_tasks() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let project_id = parse_id(&app.create_project(&alice, "Sprint 1").await["id"]);
    let task_id = parse_id(&app.create_task(&alice, project_id, "Fix bug").await["id"]);

    let deleted = app.delete(&format!("/api/projects/{}", project_id), &alice.token).await;
    assert_status!(deleted, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Project removed");

    let task = assert_ok!(app.state.store.task_by_id(task_id).await);
    assert!(task.is_none());

    let projects = app.get("/api/projects", &alice.token).await;
    assert_eq!(projects.body, json!([]));
}

#[tokio::test]
async fn test_listings_newest_first() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let first = parse_id(&app.create_project(&alice, "First").await["id"]);
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = parse_id(&app.create_project(&alice, "Second").await["id"]);

    let projects = app.get("/api/projects", &alice.token).await;
    let ids: Vec<_> = projects
        .body
        .as_array()
        .expect("array")
        .iter()
        .map(|p| parse_id(&p["id"]))
        .collect();
    assert_eq!(ids, vec![second, first]);

    let a = parse_id(&app.create_task(&alice, first, "A").await["id"]);
    tokio::time::sleep(Duration::from_millis(5)).await;
    let b = parse_id(&app.create_task(&alice, first, "B").await["id"]);
    let tasks = app.get(&format!("/api/tasks/project/{}", first), &alice.token).await;
    let ids: Vec<_> = tasks
        .body
        .as_array()
        .expect("array")
        .iter()
        .map(|t| parse_id(&t["id"]))
        .collect();
    assert_eq!(ids, vec![b, a]);
}
