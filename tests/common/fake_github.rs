//! A local stand-in for the GitHub contents API.
//!
//! Serves `GET /user` and `GET/PUT/DELETE /repos/{owner}/{repo}/contents/{path}`
//! over real HTTP with the remote's status codes, and records every request.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::TcpListener;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mdocs::github::{DeleteContentRequest, PutContentRequest};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

pub const OWNER: &str = "octo";
pub const REPO: &str = "handbook";
pub const TOKEN: &str = "ghp_integration";
pub const LOGIN: &str = "octocat";

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub path: String,
    pub git_ref: Option<String>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub accept: Option<String>,
    pub api_version: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct FakeFile {
    text: String,
    sha: String,
}

#[derive(Default)]
struct FakeState {
    files: BTreeMap<String, FakeFile>,
    requests: Vec<SeenRequest>,
    fail_next: Option<(StatusCode, String)>,
}

type Shared = Arc<Mutex<FakeState>>;

/// Running fake server; lives until the test process exits.
#[derive(Clone)]
pub struct FakeGitHub {
    base_url: String,
    state: Shared,
}

impl FakeGitHub {
    /// Bind an ephemeral port and serve from a dedicated thread, so both
    /// blocking and async tests can talk to it.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake server");
        listener
            .set_nonblocking(true)
            .expect("Failed to make listener non-blocking");
        let addr = listener.local_addr().expect("Listener has no address");

        let state: Shared = Arc::default();
        let app = router(Arc::clone(&state));

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build fake server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("Failed to adopt listener");
                axum::serve(listener, app)
                    .await
                    .expect("Fake server stopped");
            });
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Seed a file and return its hash.
    pub fn insert_file(&self, path: &str, text: &str) -> String {
        let sha = content_sha(path, text);
        self.state.lock().files.insert(
            path.to_string(),
            FakeFile {
                text: text.to_string(),
                sha: sha.clone(),
            },
        );
        sha
    }

    pub fn file_text(&self, path: &str) -> Option<String> {
        self.state.lock().files.get(path).map(|f| f.text.clone())
    }

    pub fn file_sha(&self, path: &str) -> Option<String> {
        self.state.lock().files.get(path).map(|f| f.sha.clone())
    }

    /// Answer the next request with `status` and `message`.
    pub fn fail_next(&self, status: StatusCode, message: &str) {
        self.state.lock().fail_next = Some((status, message.to_string()));
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.lock().requests.clone()
    }

    /// Requests with `method`, in arrival order.
    pub fn requests_with(&self, method: Method) -> Vec<SeenRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/user", get(current_user))
        .route(
            "/repos/{owner}/{repo}/contents/{*path}",
            get(get_contents).put(put_contents).delete(delete_contents),
        )
        .with_state(state)
}

fn content_sha(path: &str, text: &str) -> String {
    Sha256::digest(format!("{path}\0{text}").as_bytes())
        .iter()
        .take(20)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Base64 wrapped at 60 columns, the way the API returns file bodies.
fn wrapped_base64(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    let mut out = String::new();
    for chunk in encoded.as_bytes().chunks(60) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest",
        })),
    )
        .into_response()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn item_json(path: &str, file: &FakeFile, with_content: bool) -> Value {
    let mut item = json!({
        "name": file_name(path),
        "path": path,
        "sha": file.sha,
        "size": file.text.len(),
        "type": "file",
        "download_url": format!("https://raw.example.test/{OWNER}/{REPO}/main/{path}"),
    });
    if with_content {
        item["content"] = json!(wrapped_base64(&file.text));
        item["encoding"] = json!("base64");
    }
    item
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Record the request, then apply injected failures and the credential check.
fn admit(
    state: &Shared,
    method: Method,
    path: String,
    git_ref: Option<String>,
    headers: &HeaderMap,
    body: Option<Value>,
) -> Result<(), Response> {
    let mut state = state.lock();
    let authorization = header(headers, "authorization");
    state.requests.push(SeenRequest {
        method,
        path,
        git_ref,
        authorization: authorization.clone(),
        user_agent: header(headers, "user-agent"),
        accept: header(headers, "accept"),
        api_version: header(headers, "x-github-api-version"),
        body,
    });

    if let Some((status, message)) = state.fail_next.take() {
        return Err(error(status, &message));
    }
    if authorization.as_deref() != Some(format!("Bearer {TOKEN}").as_str()) {
        return Err(error(StatusCode::UNAUTHORIZED, "Bad credentials"));
    }
    Ok(())
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = admit(&state, Method::GET, "/user".into(), None, &headers, None) {
        return response;
    }
    Json(json!({ "login": LOGIN, "name": "The Octocat" })).into_response()
}

#[derive(Debug, Deserialize)]
struct RefQuery {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

async fn get_contents(
    State(state): State<Shared>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    Query(query): Query<RefQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = admit(&state, Method::GET, path.clone(), query.git_ref, &headers, None)
    {
        return response;
    }

    let state = state.lock();
    if let Some(file) = state.files.get(&path) {
        return Json(item_json(&path, file, true)).into_response();
    }

    let prefix = format!("{}/", path.trim_end_matches('/'));
    let children: Vec<Value> = state
        .files
        .iter()
        .filter(|(p, _)| p.starts_with(&prefix) && !p[prefix.len()..].contains('/'))
        .map(|(p, f)| item_json(p, f, false))
        .collect();
    if children.is_empty() {
        return error(StatusCode::NOT_FOUND, "Not Found");
    }
    Json(Value::Array(children)).into_response()
}

async fn put_contents(
    State(state): State<Shared>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(request): Json<PutContentRequest>,
) -> Response {
    let body = serde_json::to_value(&request).ok();
    if let Err(response) = admit(&state, Method::PUT, path.clone(), None, &headers, body) {
        return response;
    }

    let mut state = state.lock();
    let existing = state.files.get(&path).map(|f| f.sha.clone());
    match (existing.as_deref(), request.sha.as_deref()) {
        (Some(_), None) => {
            return error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid request.\n\n\"sha\" wasn't supplied.",
            )
        }
        (Some(current), Some(sent)) if current != sent => {
            return error(
                StatusCode::CONFLICT,
                &format!("{path} does not match {sent}"),
            )
        }
        (None, Some(_)) => return error(StatusCode::NOT_FOUND, "Not Found"),
        _ => {}
    }

    let text = match STANDARD
        .decode(request.content.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    {
        Some(text) => text,
        None => return error(StatusCode::UNPROCESSABLE_ENTITY, "content is not valid Base64"),
    };

    let file = FakeFile {
        sha: content_sha(&path, &text),
        text,
    };
    let item = item_json(&path, &file, false);
    state.files.insert(path, file);

    let status = if existing.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (
        status,
        Json(json!({ "content": item, "commit": { "message": request.message } })),
    )
        .into_response()
}

async fn delete_contents(
    State(state): State<Shared>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(request): Json<DeleteContentRequest>,
) -> Response {
    let body = serde_json::to_value(&request).ok();
    if let Err(response) = admit(&state, Method::DELETE, path.clone(), None, &headers, body) {
        return response;
    }

    let mut state = state.lock();
    match state.files.get(&path) {
        None => error(StatusCode::NOT_FOUND, "Not Found"),
        Some(file) if file.sha != request.sha => error(
            StatusCode::CONFLICT,
            &format!("{path} does not match {}", request.sha),
        ),
        Some(_) => {
            state.files.remove(&path);
            Json(json!({ "content": null, "commit": { "message": request.message } }))
                .into_response()
        }
    }
}
