//! Common test utilities for study planner integration tests
//!
//! Shared setup for driving the router in-process: an isolated in-memory
//! database per app, a fake completion service on a local port, and request
//! helpers that speak JSON.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, Method, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use study_planner::{
    completion::{CompletionClient, CompletionSettings},
    create_app,
    db::{init_pool, DbPool},
    run_migrations, AppState,
};
use tower::ServiceExt;

/// A router together with the pool behind it
pub struct TestApp {
    pub router: Router,
    pub pool: Arc<DbPool>,
}

fn test_pool() -> Arc<DbPool> {
    // Each app gets its own named shared-cache database so pooled
    // connections see the same schema
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url).unwrap());
    run_migrations(&mut pool.get().unwrap()).unwrap();
    pool
}

fn build_app(base_url: &str, api_key: Option<&str>) -> TestApp {
    let pool = test_pool();
    let completions = CompletionClient::new(CompletionSettings {
        base_url: base_url.to_string(),
        model: "test-model".to_string(),
        api_key: api_key.map(str::to_string),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let router = create_app(AppState {
        pool: pool.clone(),
        completions: Arc::new(completions),
        session_ttl: chrono::Duration::hours(1),
    });

    TestApp { router, pool }
}

/// Creates a test application whose completion client points nowhere
pub fn create_test_app() -> TestApp {
    build_app("http://127.0.0.1:9", Some("test-key"))
}

/// Creates a test application talking to the given completion service
pub fn create_test_app_with_upstream(base_url: &str) -> TestApp {
    build_app(base_url, Some("test-key"))
}

/// Creates a test application with no completion API key configured
pub fn create_test_app_without_api_key(base_url: &str) -> TestApp {
    build_app(base_url, None)
}

/// A fake completion service and the prompts it has received
pub struct FakeUpstream {
    pub base_url: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    content: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

async fn fake_completions(State(state): State<FakeState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default().to_string();
    state.prompts.lock().unwrap().push(prompt);

    let reply = match &state.content {
        Some(content) => json!({"choices": [{"message": {"role": "assistant", "content": content}}]}),
        None => json!({"error": {"message": "upstream unavailable"}}),
    };
    (state.status, Json(reply))
}

/// Starts a completion service that replies 200 with `content`
pub async fn spawn_upstream(content: &str) -> FakeUpstream {
    spawn_upstream_with(StatusCode::OK, Some(content.to_string())).await
}

/// Starts a completion service that fails every request with `status`
pub async fn spawn_failing_upstream(status: StatusCode) -> FakeUpstream {
    spawn_upstream_with(status, None).await
}

async fn spawn_upstream_with(status: StatusCode, content: Option<String>) -> FakeUpstream {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/chat/completions", post(fake_completions))
        .with_state(FakeState { status, content, prompts: prompts.clone() });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeUpstream { base_url: format!("http://{}", addr), prompts }
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

/// Sends a request, authenticating with a bearer token when one is given
pub async fn send(app: &TestApp, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
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

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_string());

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    TestResponse { status, set_cookie, body }
}

/// Extracts the session token from a `Set-Cookie` header value
pub fn session_token(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("sid="))
        .expect("sid cookie")
        .to_string()
}

/// Registers a user and returns its session token
pub async fn register(app: &TestApp, username: &str, grade: Option<&str>) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({"username": username, "password": "secret", "grade": grade})),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "register failed: {}", response.body);
    session_token(&response.set_cookie.expect("session cookie"))
}

/// Creates a subject for the user behind `token` and returns its JSON
pub async fn create_subject(app: &TestApp, token: &str, name: &str) -> Value {
    let response = send(
        app,
        Method::POST,
        "/api/subjects",
        Some(token),
        Some(json!({"name": name, "examDate": "2024-06-01T00:00:00Z"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "create subject failed: {}", response.body);
    response.body
}
