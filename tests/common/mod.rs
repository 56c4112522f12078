#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

use edutrack::router::{App, init_app};
use edutrack::state::AppState;
use edutrack_config::{CorsConfig, JwtConfig};

pub fn setup_test_app(pool: PgPool) -> App {
    let state = AppState::new(pool, JwtConfig::default(), CorsConfig::default());
    init_app(state, None)
}

/// Sends one request and returns the status with the decoded JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &App,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &App, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn post(app: &App, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body), None).await
}

pub async fn patch(app: &App, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PATCH", uri, Some(body), None).await
}

pub async fn delete(app: &App, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None, None).await
}

/// POSTs and asserts 201, returning the created id.
pub async fn create(app: &App, uri: &str, body: Value) -> i64 {
    let (status, value) = post(app, uri, body).await;
    assert_eq!(status, StatusCode::CREATED, "POST {} failed: {}", uri, value);
    value["id"].as_i64().unwrap()
}

pub async fn create_level(app: &App, name: &str) -> i64 {
    create(app, "/levels", json!({ "name": name })).await
}

pub async fn create_classroom(app: &App, level_id: i64, name: &str, capacity: i32) -> i64 {
    create(
        app,
        "/classrooms",
        json!({ "name": name, "capacity": capacity, "level_id": level_id }),
    )
    .await
}

pub async fn create_parent(app: &App, last_name: &str) -> i64 {
    create(
        app,
        "/parents",
        json!({ "first_name": "Fatou", "last_name": last_name }),
    )
    .await
}

pub async fn create_student(app: &App, first_name: &str, parent_id: i64, class_id: i64) -> i64 {
    create(
        app,
        "/students",
        json!({
            "first_name": first_name,
            "last_name": "Diallo",
            "birth_date": "2015-04-02",
            "gender": "female",
            "parent_id": parent_id,
            "class_id": class_id
        }),
    )
    .await
}

/// A level, a classroom of the given capacity and one parent.
pub struct School {
    pub level_id: i64,
    pub class_id: i64,
    pub parent_id: i64,
}

pub async fn create_school(app: &App, capacity: i32) -> School {
    let level_id = create_level(app, "Grade 1").await;
    let class_id = create_classroom(app, level_id, "1A", capacity).await;
    let parent_id = create_parent(app, "Diallo").await;
    School {
        level_id,
        class_id,
        parent_id,
    }
}

pub async fn create_user(app: &App, username: &str, password: &str, role: &str) -> i64 {
    create(
        app,
        "/users",
        json!({ "username": username, "password": password, "role": role }),
    )
    .await
}
