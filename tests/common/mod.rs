use account_service::{app, config::Config, schema, state::AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

pub async fn test_app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await.expect("connect sqlite");
    schema::apply(&conn).await.expect("apply schema");

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: Some("sqlite::memory:".to_string()),
        db_max_connections: 1,
        db_connect_timeout_seconds: 1,
        log_json: false,
    };
    app(AppState::from_connection(conn, config))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Option<String>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let body = body.map(Body::from).unwrap_or_else(Body::empty);
    let request = builder.body(body).expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let header_text = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let location = header_text(header::LOCATION);
    let content_type = header_text(header::CONTENT_TYPE);
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");

    TestResponse {
        status,
        location,
        content_type,
        text: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub async fn send_json(app: &Router, method: Method, uri: &str, body: &Value) -> TestResponse {
    send(
        app,
        method,
        uri,
        Some("application/json"),
        Some(body.to_string()),
    )
    .await
}

pub fn sample_account(n: usize) -> Value {
    serde_json::json!({
        "name": format!("Account {n}"),
        "email": format!("account{n}@example.com"),
        "address": format!("{n} Market Street"),
        "phone_number": format!("555-01{n:02}"),
    })
}
