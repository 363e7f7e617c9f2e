use std::{collections::HashSet, sync::Arc};

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_api::{
    db::entities::todo,
    state::AppState,
    test_helpers::{sqlite_state, state_for, test_router},
};

async fn send(state: &Arc<AppState>, request: Request<Body>) -> axum::response::Response {
    test_router(state).oneshot(request).await.unwrap()
}

async fn json_response(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(state, request).await;
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

fn get(uri: impl AsRef<str>) -> Request<Body> {
    Request::builder()
        .uri(uri.as_ref())
        .body(Body::empty())
        .unwrap()
}

fn with_json(method: &str, uri: impl AsRef<str>, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri.as_ref())
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn delete(uri: impl AsRef<str>) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri.as_ref())
        .body(Body::empty())
        .unwrap()
}

async fn create(state: &Arc<AppState>, status: &str, task: &str) -> Value {
    let (code, created) = json_response(
        state,
        with_json("POST", "/api/todo", json!({ "status": status, "task": task })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    created
}

async fn list(state: &Arc<AppState>) -> Vec<Value> {
    let (status, todos) = json_response(state, get("/api/todo")).await;
    assert_eq!(status, StatusCode::OK);
    todos.as_array().unwrap().clone()
}

#[tokio::test]
async fn health_reports_stored_count() {
    let state = sqlite_state().await;
    let (status, body) = json_response(&state, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["todos"], 0);

    create(&state, "open", "buy milk").await;
    let (_, body) = json_response(&state, get("/health")).await;
    assert_eq!(body["todos"], 1);
}

#[tokio::test]
async fn health_fails_when_store_is_down() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("no route to host".to_owned())])
        .into_connection();
    let state = state_for(db);

    let (status, body) = json_response(&state, get("/health")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().contains("no route"));
}

#[tokio::test]
async fn list_is_empty_on_fresh_store() {
    let state = sqlite_state().await;
    assert!(list(&state).await.is_empty());
}

#[tokio::test]
async fn create_returns_created_todo_with_location() {
    let state = sqlite_state().await;
    let before = Utc::now();

    let response = send(
        &state,
        with_json(
            "POST",
            "/api/todo",
            json!({ "status": "open", "task": "buy milk" }),
        ),
    )
    .await;
    let after = Utc::now();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/todo/1"
    );
    let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let created: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(created["id"], 1);
    assert_eq!(created["status"], "open");
    assert_eq!(created["task"], "buy milk");
    let created_time = DateTime::parse_from_rfc3339(created["createdTime"].as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(created_time >= before - Duration::seconds(1));
    assert!(created_time <= after + Duration::seconds(1));
}

#[tokio::test]
async fn created_todo_round_trips_through_list() {
    let state = sqlite_state().await;
    let created = create(&state, "open", "water plants").await;

    let todos = list(&state).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0], created);
    assert!(todos[0]["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn create_rejects_missing_or_blank_fields() {
    let state = sqlite_state().await;

    for payload in [
        json!({ "status": "", "task": "buy milk" }),
        json!({ "status": "open", "task": "" }),
        json!({ "status": "", "task": "" }),
        json!({ "status": "   ", "task": "buy milk" }),
        json!({ "task": "buy milk" }),
        json!({ "status": "open" }),
        json!({}),
    ] {
        let (status, body) =
            json_response(&state, with_json("POST", "/api/todo", payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    assert!(list(&state).await.is_empty());
}

#[tokio::test]
async fn create_reports_which_field_is_missing() {
    let state = sqlite_state().await;

    let (status, body) = json_response(
        &state,
        with_json("POST", "/api/todo", json!({ "status": "", "task": "buy milk" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "status must not be empty");
}

#[tokio::test]
async fn create_ignores_client_supplied_id_and_time() {
    let state = sqlite_state().await;

    let (status, created) = json_response(
        &state,
        with_json(
            "POST",
            "/api/todo",
            json!({
                "Id": 99,
                "CreatedTime": "1999-01-01T00:00:00+00:00",
                "Status": "open",
                "Task": "file taxes",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["task"], "file taxes");
    assert!(!created["createdTime"].as_str().unwrap().starts_with("1999"));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let state = sqlite_state().await;

    let response = send(
        &state,
        Request::builder()
            .method("POST")
            .uri("/api/todo")
            .header("content-type", "application/json")
            .body(Body::from("{\"status\": "))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = json_response(
        &state,
        with_json("POST", "/api/todo", json!({ "status": 5, "task": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_content_type_is_unsupported_media_type() {
    let state = sqlite_state().await;

    let (status, body) = json_response(
        &state,
        Request::builder()
            .method("POST")
            .uri("/api/todo")
            .body(Body::from(json!({ "status": "open", "task": "x" }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());
    assert!(list(&state).await.is_empty());
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let state = sqlite_state().await;
    let task = "x".repeat(3 * 1024 * 1024);

    let response = send(
        &state,
        with_json("POST", "/api/todo", json!({ "status": "open", "task": task })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(list(&state).await.is_empty());
}

#[tokio::test]
async fn long_task_round_trips() {
    let state = sqlite_state().await;
    let task = "walk the dog ".repeat(40);
    assert!(task.trim().len() > 255);

    let created = create(&state, "open", &task).await;
    let (status, fetched) =
        json_response(&state, get(format!("/api/todo/{}", created["id"]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["task"], task.trim());
}

#[tokio::test]
async fn two_creates_list_both_with_distinct_ids() {
    let state = sqlite_state().await;
    create(&state, "open", "buy milk").await;
    create(&state, "done", "walk dog").await;

    let todos = list(&state).await;
    assert_eq!(todos.len(), 2);
    assert_ne!(todos[0]["id"], todos[1]["id"]);
    assert_eq!(todos[0]["task"], "buy milk");
    assert_eq!(todos[1]["task"], "walk dog");
}

#[tokio::test]
async fn ids_are_unique_across_creates() {
    let state = sqlite_state().await;

    let mut ids = HashSet::new();
    for n in 0..10 {
        let created = create(&state, "open", &format!("task {n}")).await;
        ids.insert(created["id"].as_i64().unwrap());
    }

    assert_eq!(ids.len(), 10);
}

#[tokio::test]
async fn get_returns_single_todo() {
    let state = sqlite_state().await;
    let created = create(&state, "open", "buy milk").await;

    let (status, fetched) =
        json_response(&state, get(format!("/api/todo/{}", created["id"]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn unknown_id_is_not_found_for_get_update_delete() {
    let state = sqlite_state().await;
    create(&state, "open", "buy milk").await;

    let (status, body) = json_response(&state, get("/api/todo/404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Todo 404 not found");

    let (status, _) = json_response(
        &state,
        with_json("PUT", "/api/todo/404", json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = send(&state, delete("/api/todo/404")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(list(&state).await.len(), 1);
}

#[tokio::test]
async fn non_integer_id_is_a_bad_request() {
    let state = sqlite_state().await;

    let (status, body) = json_response(&state, get("/api/todo/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "id must be an integer");
}

#[tokio::test]
async fn update_applies_partial_changes() {
    let state = sqlite_state().await;
    let created = create(&state, "open", "buy milk").await;
    let uri = format!("/api/todo/{}", created["id"]);

    let (status, updated) =
        json_response(&state, with_json("PUT", &uri, json!({ "status": "done" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdTime"], created["createdTime"]);
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["task"], "buy milk");

    let (status, updated) = json_response(
        &state,
        with_json("PUT", &uri, json!({ "task": "buy oat milk", "id": 77 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["task"], "buy oat milk");

    let (_, fetched) = json_response(&state, get(&uri)).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_rejects_invalid_payloads() {
    let state = sqlite_state().await;
    let created = create(&state, "open", "buy milk").await;
    let uri = format!("/api/todo/{}", created["id"]);

    for payload in [json!({}), json!({ "status": "" }), json!({ "task": "  " })] {
        let (status, _) = json_response(&state, with_json("PUT", &uri, payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
    }

    let (_, fetched) = json_response(&state, get(&uri)).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn deleted_todo_is_gone() {
    let state = sqlite_state().await;
    let created = create(&state, "open", "buy milk").await;
    let uri = format!("/api/todo/{}", created["id"]);

    let response = send(&state, delete(&uri)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = json_response(&state, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = send(&state, delete(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(list(&state).await.is_empty());
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let state = sqlite_state().await;
    let first = create(&state, "open", "one").await;
    send(&state, delete(format!("/api/todo/{}", first["id"]))).await;

    let second = create(&state, "open", "two").await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn storage_failure_is_an_opaque_server_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset by peer".to_owned())])
        .into_connection();
    let state = state_for(db);

    let (status, body) = json_response(&state, get("/api/todo")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(!message.contains("connection reset"));
}

#[tokio::test]
async fn list_serializes_camel_case_fields() {
    let created_time = Utc::now().fixed_offset();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![todo::Model {
            id: 7,
            created_time,
            status: "open".to_owned(),
            task: "buy milk".to_owned(),
        }]])
        .into_connection();
    let state = state_for(db);

    let todos = list(&state).await;

    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["id"], 7);
    assert_eq!(todos[0]["status"], "open");
    assert_eq!(todos[0]["task"], "buy milk");
    assert_eq!(
        DateTime::parse_from_rfc3339(todos[0]["createdTime"].as_str().unwrap()).unwrap(),
        created_time
    );
}
