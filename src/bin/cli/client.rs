use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Utc};
use reqwest::header::SET_COOKIE;
use reqwest::{Client, Method, RequestBuilder};
use study_planner::auth::SESSION_COOKIE;
use study_planner::dto::{
    ChatRequestDto, ChatResponseDto, CreateStudyLogDto, CreateSubjectDto, CreateTaskDto, LoginDto, RegisterDto,
};
use study_planner::models::{StudyLog, Subject, SubjectUpdate, Task, TaskUpdate, User};

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    Request(reqwest::Error),
    /// The server accepted a login but sent no session cookie
    MissingSession,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
            ClientError::MissingSession => write!(f, "Server did not return a session"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Server { .. } | ClientError::MissingSession => None,
        }
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body.get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// Pulls the session token out of a response's `Set-Cookie` headers
fn session_from_response(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_string()).ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// HTTP client wrapper for communicating with the study planner server
pub struct StudyPlannerClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// Session token sent as a bearer credential, when logged in
    token: Option<String>,
    /// The underlying HTTP client
    client: Client,
}

impl StudyPlannerClient {
    /// Creates a new StudyPlannerClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the server
    /// * `token` - A saved session token, if any
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}/api{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        builder.send().await.map_err(ClientError::Request)?.check().await
    }

    // ── Account endpoints ────────────────────────────────────────────

    /// Registers an account, returning the user and its session token
    pub async fn register(&self, username: String, password: String, grade: Option<String>) -> Result<(User, String), ClientError> {
        let dto = RegisterDto { username, password, grade };
        let response = self.send(self.request(Method::POST, "/register").json(&dto)).await?;
        let token = session_from_response(&response).ok_or(ClientError::MissingSession)?;
        let user = response.json().await.map_err(ClientError::Request)?;
        Ok((user, token))
    }

    /// Logs in, returning the user and its session token
    pub async fn login(&self, username: String, password: String) -> Result<(User, String), ClientError> {
        let dto = LoginDto { username, password };
        let response = self.send(self.request(Method::POST, "/login").json(&dto)).await?;
        let token = session_from_response(&response).ok_or(ClientError::MissingSession)?;
        let user = response.json().await.map_err(ClientError::Request)?;
        Ok((user, token))
    }

    /// Ends the current session on the server
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.send(self.request(Method::POST, "/logout")).await?;
        Ok(())
    }

    /// Gets the logged-in user
    pub async fn current_user(&self) -> Result<User, ClientError> {
        let response = self.send(self.request(Method::GET, "/user")).await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Subject endpoints ────────────────────────────────────────────

    /// Lists the user's subjects
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, ClientError> {
        let response = self.send(self.request(Method::GET, "/subjects")).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Creates a new subject
    pub async fn create_subject(&self, name: String, exam_date: DateTime<Utc>) -> Result<Subject, ClientError> {
        let dto = CreateSubjectDto { name, exam_date };
        let response = self.send(self.request(Method::POST, "/subjects").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Applies a partial update to a subject
    pub async fn update_subject(&self, id: i32, changes: &SubjectUpdate) -> Result<Subject, ClientError> {
        let path = format!("/subjects/{}", id);
        let response = self.send(self.request(Method::PATCH, &path).json(changes)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Lists the tasks of a subject
    pub async fn list_tasks(&self, subject_id: i32) -> Result<Vec<Task>, ClientError> {
        let path = format!("/subjects/{}/tasks", subject_id);
        let response = self.send(self.request(Method::GET, &path)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Generates chapter tasks for a subject
    pub async fn fetch_chapters(&self, subject_id: i32) -> Result<Vec<Task>, ClientError> {
        let path = format!("/subjects/{}/fetch-chapters", subject_id);
        let response = self.send(self.request(Method::POST, &path)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Task endpoints ───────────────────────────────────────────────

    /// Creates a new task
    pub async fn create_task(&self, subject_id: i32, description: String) -> Result<Task, ClientError> {
        let dto = CreateTaskDto { description, subject_id };
        let response = self.send(self.request(Method::POST, "/tasks").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Applies a partial update to a task
    pub async fn update_task(&self, id: i32, changes: &TaskUpdate) -> Result<Task, ClientError> {
        let path = format!("/tasks/{}", id);
        let response = self.send(self.request(Method::PATCH, &path).json(changes)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Study log endpoints ──────────────────────────────────────────

    /// Records study time
    pub async fn create_study_log(&self, subject_id: i32, duration: i32, date: DateTime<Utc>) -> Result<StudyLog, ClientError> {
        let dto = CreateStudyLogDto { subject_id, duration, date };
        let response = self.send(self.request(Method::POST, "/study-logs").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Lists the user's study logs
    pub async fn list_study_logs(&self) -> Result<Vec<StudyLog>, ClientError> {
        let response = self.send(self.request(Method::GET, "/study-logs")).await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Assistant ────────────────────────────────────────────────────

    /// Sends a message to the study assistant
    pub async fn chat(&self, message: String) -> Result<String, ClientError> {
        let dto = ChatRequestDto { message };
        let response = self.send(self.request(Method::POST, "/chat").json(&dto)).await?;
        let reply: ChatResponseDto = response.json().await.map_err(ClientError::Request)?;
        Ok(reply.response)
    }
}
