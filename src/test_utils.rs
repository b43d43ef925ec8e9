use crate::completion::{CompletionClient, CompletionSettings};
use crate::models::{SubjectUpdate, User};
use crate::*;
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sets up a test database with migrations applied
///
/// Plain ":memory:" gives each pooled connection its own database, so each
/// test gets a uniquely named shared-cache in-memory database instead.
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to build test pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");

    Arc::new(pool)
}

/// Parses an RFC 3339 timestamp, panicking on malformed input
pub fn exam_date(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// Builds application state around a test pool
///
/// The completion client points at `upstream_base_url` with a fixed API key,
/// or at an unroutable address when no upstream is needed.
pub fn test_state(pool: Arc<db::DbPool>, upstream_base_url: Option<&str>) -> AppState {
    let settings = CompletionSettings {
        base_url: upstream_base_url.unwrap_or("http://127.0.0.1:9").to_string(),
        model: "test-model".to_string(),
        api_key: Some("test-key".to_string()),
        timeout: Duration::from_secs(5),
    };

    AppState {
        pool,
        completions: Arc::new(CompletionClient::new(settings).expect("Failed to build client")),
        session_ttl: chrono::Duration::hours(1),
    }
}

/// Registers a user directly through the repository layer
pub fn create_test_user(pool: &db::DbPool, username: &str, grade: Option<&str>) -> User {
    repo::create_user(pool, username, &auth::hash_password("secret").expect("Failed to hash password"), grade.map(str::to_string))
        .expect("Failed to create test user")
}

/// Wraps `content` in the response shape of a chat completions endpoint
pub fn completion_reply(content: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

/// A request received by a fake completions server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

/// Handle to a fake completions server running on a local port
pub struct FakeUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeUpstream {
    /// Returns every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn fake_completions_handler(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(RecordedRequest { authorization, body });
    (state.status, Json(state.reply))
}

async fn serve_locally(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Starts a completions server that answers every request with `status` and `reply`
pub async fn spawn_fake_completions(status: StatusCode, reply: Value) -> FakeUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState { status, reply, requests: requests.clone() };

    let app = Router::new()
        .route("/chat/completions", post(fake_completions_handler))
        .with_state(state);

    FakeUpstream { base_url: serve_locally(app).await, requests }
}

/// Starts a completions server that never answers in time
pub async fn spawn_stalled_completions() -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(completion_reply("too late"))
        }),
    );

    serve_locally(app).await
}

/// Timestamps with whole-second precision between 2020 and 2030
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Arbitrary partial subject updates, including the empty one
pub fn arb_subject_update() -> impl Strategy<Value = SubjectUpdate> {
    (
        prop::option::of("[A-Za-z][A-Za-z0-9 ]{0,20}"),
        prop::option::of(arb_datetime_utc()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(name, exam_date, completed)| SubjectUpdate { name, exam_date, completed })
}

#[test]
fn test_setup_test_db_creates_tables() {
    use diesel::sql_types::Text;
    use diesel::{QueryableByName, RunQueryDsl};

    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();

    let tables: Vec<String> = diesel::sql_query("SELECT name FROM sqlite_master WHERE type = 'table'")
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

    for expected in ["users", "sessions", "subjects", "tasks", "study_logs"] {
        assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
    }
}

#[test]
fn test_databases_are_isolated() {
    let first = setup_test_db();
    let second = setup_test_db();

    create_test_user(&first, "ada", None);

    assert!(repo::get_user_by_username(&first, "ada").unwrap().is_some());
    assert!(repo::get_user_by_username(&second, "ada").unwrap().is_none());
}
