//! In-process fake of the Bubble backend for client tests.
//!
//! Implements the seven endpoints the client consumes on an ephemeral port
//! and records every request's path and `Authorization` header.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::config::ApiConfig;

#[derive(Debug, Clone)]
struct StoredPost {
    id: Uuid,
    owner: String,
    caption: String,
    url: String,
    file_type: &'static str,
    file_name: String,
    created_at: String,
}

#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    authorization: Option<String>,
}

#[derive(Default)]
struct FakeState {
    users: Mutex<HashMap<String, String>>,
    tokens: Mutex<HashMap<String, String>>,
    posts: Mutex<Vec<StoredPost>>,
    requests: Mutex<Vec<RecordedRequest>>,
    feed_failure: Mutex<Option<u16>>,
    delete_failure: Mutex<Option<u16>>,
    health_delay: Mutex<Option<Duration>>,
    profile_delay: Mutex<Option<Duration>>,
}

type Shared = Arc<FakeState>;

/// Running fake backend
pub struct FakeBackend {
    base_url: String,
    state: Shared,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(FakeState::default());

        let router = Router::new()
            .route("/health", get(health))
            .route("/auth/jwt/login", post(login))
            .route("/auth/register", post(register))
            .route("/users/me", get(me))
            .route("/feed", get(feed))
            .route("/post/:id", delete(delete_post))
            .route("/upload", post(upload))
            .layer(DefaultBodyLimit::max(60 * 1024 * 1024))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    pub fn add_user(&self, email: &str, password: &str) {
        self.state
            .users
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
    }

    pub fn issue_token(&self, email: &str) -> String {
        issue_token(&self.state, email)
    }

    /// Seed a post owned by `owner`; returns its id
    pub fn add_post(&self, owner: &str, caption: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.posts.lock().unwrap().insert(
            0,
            StoredPost {
                id,
                owner: owner.to_string(),
                caption: caption.to_string(),
                url: format!("https://cdn.example.com/{}.jpg", id),
                file_type: "photo",
                file_name: format!("{}.jpg", id),
                created_at: Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            },
        );
        id
    }

    pub fn post_ids(&self) -> Vec<Uuid> {
        self.state.posts.lock().unwrap().iter().map(|p| p.id).collect()
    }

    pub fn fail_feed_with(&self, status: Option<u16>) {
        *self.state.feed_failure.lock().unwrap() = status;
    }

    pub fn fail_delete_with(&self, status: Option<u16>) {
        *self.state.delete_failure.lock().unwrap() = status;
    }

    pub fn delay_health(&self, delay: Duration) {
        *self.state.health_delay.lock().unwrap() = Some(delay);
    }

    pub fn delay_profile(&self, delay: Duration) {
        *self.state.profile_delay.lock().unwrap() = Some(delay);
    }

    pub fn request_count(&self, path_prefix: &str) -> usize {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path.starts_with(path_prefix))
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// `Authorization` headers seen on requests to `path`, in order
    pub fn authorizations(&self, path: &str) -> Vec<Option<String>> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.authorization.clone())
            .collect()
    }
}

fn issue_token(state: &FakeState, email: &str) -> String {
    let token = format!("tok-{}", Uuid::new_v4().simple());
    state
        .tokens
        .lock()
        .unwrap()
        .insert(token.clone(), email.to_string());
    token
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        path: request.uri().path().to_string(),
        authorization,
    });
    next.run(request).await
}

fn detail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn current_user(state: &FakeState, headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    state.tokens.lock().unwrap().get(token).cloned()
}

fn user_json(email: &str) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "email": email,
        "is_active": true,
        "is_superuser": false,
        "is_verified": false,
    })
}

fn post_json(post: &StoredPost, viewer: &str) -> serde_json::Value {
    json!({
        "id": post.id.to_string(),
        "email": post.owner,
        "caption": post.caption,
        "url": post.url,
        "file_type": post.file_type,
        "file_name": post.file_name,
        "created_at": post.created_at,
        "is_owner": post.owner == viewer,
    })
}

async fn health(State(state): State<Shared>) -> Json<serde_json::Value> {
    let delay = *state.health_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(json!({ "status": "Healthy", "message": "Server is working perfectly" }))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    let valid = state.users.lock().unwrap().get(&form.username) == Some(&form.password);
    if !valid {
        return detail(StatusCode::BAD_REQUEST, "LOGIN_BAD_CREDENTIALS");
    }
    let token = issue_token(&state, &form.username);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
}

async fn register(State(state): State<Shared>, Json(body): Json<RegisterBody>) -> Response {
    let mut users = state.users.lock().unwrap();
    if users.contains_key(&body.email) {
        return detail(StatusCode::BAD_REQUEST, "REGISTER_USER_ALREADY_EXISTS");
    }
    users.insert(body.email.clone(), body.password);
    (StatusCode::CREATED, Json(user_json(&body.email))).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let delay = *state.profile_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    match current_user(&state, &headers) {
        Some(email) => Json(user_json(&email)).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn feed(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let failure = *state.feed_failure.lock().unwrap();
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap();
        return detail(status, "feed unavailable");
    }
    let Some(viewer) = current_user(&state, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    let posts: Vec<_> = state
        .posts
        .lock()
        .unwrap()
        .iter()
        .map(|p| post_json(p, &viewer))
        .collect();
    Json(json!({ "posts": posts })).into_response()
}

async fn delete_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let failure = *state.delete_failure.lock().unwrap();
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap();
        return detail(status, "delete failed");
    }
    let Some(viewer) = current_user(&state, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    let Ok(id) = Uuid::parse_str(&id) else {
        return detail(StatusCode::BAD_REQUEST, "Invalid post ID format");
    };

    let mut posts = state.posts.lock().unwrap();
    let Some(index) = posts.iter().position(|p| p.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    };
    if posts[index].owner != viewer {
        return detail(StatusCode::FORBIDDEN, "Not your post");
    }
    posts.remove(index);
    Json(json!({ "message": "Post deleted successfully" })).into_response()
}

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let Some(owner) = current_user(&state, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let mut file_name = None;
    let mut caption = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                field.bytes().await.unwrap();
            }
            Some("caption") => caption = field.text().await.unwrap(),
            _ => {}
        }
    }
    let Some(file_name) = file_name else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "file missing");
    };

    let id = Uuid::new_v4();
    let post = StoredPost {
        id,
        owner: owner.clone(),
        caption,
        url: format!("https://cdn.example.com/{}", file_name),
        file_type: if file_name.ends_with(".mp4") || file_name.ends_with(".mov") {
            "video"
        } else {
            "photo"
        },
        file_name,
        created_at: Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    };
    let body = post_json(&post, &owner);
    state.posts.lock().unwrap().insert(0, post);
    Json(body).into_response()
}
