// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end tests.
//!
//! Runs an in-process mock of the administration backend, and spawns the
//! real `orgconsole` binary against it.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Password the mock backend accepts for every user.
pub const PASSWORD: &str = "Secret#1";

/// How the mock answers the refresh endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// New pair under `token.access_token` / `token.refresh_token`.
    Issue,
    /// New pair as top-level `accessToken` / `refreshToken`.
    IssueCamelCase,
    Reject401,
    Reject400,
    /// 200 with no access token.
    Malformed,
    /// Never answers.
    Hang,
}

/// One request as the backend saw it. `path` is the raw, still-encoded path.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

impl Recorded {
    pub fn action(&self) -> &str {
        self.path.split('/').nth(6).unwrap_or("")
    }
}

struct BackendState {
    refresh_mode: Mutex<RefreshMode>,
    refresh_delay: Mutex<Duration>,
    org_delay: Mutex<Duration>,
    orgs: Mutex<Value>,
    username: Mutex<String>,
    valid_token: Mutex<Option<String>>,
    reject_all: AtomicBool,
    issued: AtomicU32,
    refresh_calls: AtomicU32,
    logout_calls: AtomicU32,
    requests: Mutex<Vec<Recorded>>,
}

impl BackendState {
    fn issue(&self) -> (String, String) {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let username = self.username.lock().clone();
        let claims = json!({ "preferred_username": username, "sub": format!("id-{username}"), "n": n });
        let access = format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.sig{n}",
            URL_SAFE_NO_PAD.encode(claims.to_string())
        );
        *self.valid_token.lock() = Some(access.clone());
        (access, format!("refresh-{n}"))
    }

    fn authorized(&self, authorization: Option<&str>) -> bool {
        if self.reject_all.load(Ordering::SeqCst) {
            return false;
        }
        match (self.valid_token.lock().as_deref(), authorization) {
            (Some(valid), Some(header)) => header.strip_prefix("Bearer ") == Some(valid),
            _ => false,
        }
    }
}

/// A mock administration backend bound to an ephemeral local port.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(BackendState {
            refresh_mode: Mutex::new(RefreshMode::Issue),
            refresh_delay: Mutex::new(Duration::ZERO),
            org_delay: Mutex::new(Duration::ZERO),
            orgs: Mutex::new(json!([
                { "orgCustomId": "acme", "orgName": "Acme" },
                { "orgCustomId": "globex", "orgName": "Globex" },
            ])),
            username: Mutex::new(String::new()),
            valid_token: Mutex::new(None),
            reject_all: AtomicBool::new(false),
            issued: AtomicU32::new(0),
            refresh_calls: AtomicU32::new(0),
            logout_calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new().fallback(dispatch).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(Self { addr, state, handle })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        *self.state.refresh_mode.lock() = mode;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.state.refresh_delay.lock() = delay;
    }

    pub fn set_org_delay(&self, delay: Duration) {
        *self.state.org_delay.lock() = delay;
    }

    pub fn set_orgs(&self, orgs: Value) {
        *self.state.orgs.lock() = orgs;
    }

    /// Answer 401 to every protected call, even with a freshly issued token.
    pub fn reject_all(&self, on: bool) {
        self.state.reject_all.store(on, Ordering::SeqCst);
    }

    /// Revoke the current access token without telling the client.
    pub fn expire(&self) {
        *self.state.valid_token.lock() = Some("revoked".to_owned());
    }

    pub fn refresh_calls(&self) -> u32 {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> u32 {
        self.state.logout_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().clone()
    }

    /// Requests that addressed `action`.
    pub fn requests_to(&self, action: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.action() == action).collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn dispatch(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let authorization =
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_owned);
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let recorded =
        Recorded { method, path: uri.path().to_owned(), authorization: authorization.clone(), body };
    state.requests.lock().push(recorded.clone());

    // /api/{area}/org/{org}/action/{action}[/{tail}]
    let segments: Vec<&str> = recorded.path.split('/').collect();
    if segments.get(1) != Some(&"api") || segments.get(5) != Some(&"action") {
        return StatusCode::NOT_FOUND.into_response();
    }
    let action = recorded.action();
    let tail = segments.get(7).copied().unwrap_or("");

    match action {
        "Login" => login(&state, &recorded.body),
        "RefreshToken" => refresh(&state, &recorded.body).await,
        "Logout" => {
            state.logout_calls.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "status": "OK" })).into_response()
        }
        "Forbidden" => {
            (StatusCode::FORBIDDEN, Json(json!({ "message": "not allowed here" }))).into_response()
        }
        _ if !state.authorized(authorization.as_deref()) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": "token expired" }))).into_response()
        }
        _ => protected(&state, action, tail).await,
    }
}

fn login(state: &BackendState, body: &Value) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    if body["password"] != PASSWORD {
        return Json(json!({ "status": "Fail", "message": "Invalid username or password" }))
            .into_response();
    }
    *state.username.lock() = username.to_owned();
    let (access, refresh) = state.issue();
    Json(json!({
        "status": "Success",
        "userName": username,
        "token": { "access_token": access, "refresh_token": refresh },
    }))
    .into_response()
}

async fn refresh(state: &BackendState, body: &Value) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = *state.refresh_delay.lock();
    tokio::time::sleep(delay).await;

    if body["refreshToken"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "missing refreshToken" })))
            .into_response();
    }

    let mode = *state.refresh_mode.lock();
    match mode {
        RefreshMode::Issue => {
            let (access, refresh) = state.issue();
            Json(json!({ "token": { "access_token": access, "refresh_token": refresh } }))
                .into_response()
        }
        RefreshMode::IssueCamelCase => {
            let (access, refresh) = state.issue();
            Json(json!({ "accessToken": access, "refreshToken": refresh })).into_response()
        }
        RefreshMode::Reject401 => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": "refresh token expired" })))
                .into_response()
        }
        RefreshMode::Reject400 => {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": "invalid_grant" }))).into_response()
        }
        RefreshMode::Malformed => Json(json!({ "token": {} })).into_response(),
        RefreshMode::Hang => {
            std::future::pending::<()>().await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

fn user(id: &str, name: &str) -> Value {
    json!({
        "orgUserId": format!("ou-{id}"),
        "userId": id,
        "userName": name,
        "userEmail": format!("{name}@example.com"),
        "tmpUserEmail": null,
        "userStatus": "Active",
        "roles": ["VIEWER"],
        "rolesList": "VIEWER",
        "tags": "ops",
        "createdDate": "2026-01-02",
        "customRoleId": null,
        "customRoleName": null,
        "isOrgInitialUser": null,
    })
}

async fn protected(state: &BackendState, action: &str, tail: &str) -> Response {
    let body = match action {
        "GetUserAllowedOrg" => {
            let delay = *state.org_delay.lock();
            tokio::time::sleep(delay).await;
            state.orgs.lock().clone()
        }
        "GetUsers" => json!([user("u-1", "alice"), user("u-2", "bob")]),
        "GetUserCount" => json!(2),
        "GetUserById" => user(tail, "alice"),
        "InviteUser" => json!({
            "status": "Success",
            "description": "Invitation sent",
            "RegistrationUrl": "https://admin.example.test/register/abc",
        }),
        "GetCustomRoles" => json!([{
            "roleId": "r-1",
            "orgId": "acme",
            "roleName": "Auditor",
            "roleDescription": "Reads logs",
            "permissions": [],
            "tags": null,
        }]),
        "GetCustomRoleCount" => json!(1),
        "GetInitialUserRolePermissions" => json!([
            { "permissionId": "p-1", "permissionName": "Read", "permissionGroup": "Logs" },
        ]),
        "GetUserByUserName" => json!({ "userName": tail, "name": "Alice", "lastName": "Liddell" }),
        _ => json!({ "status": "OK" }),
    };
    Json(body).into_response()
}

/// Resolve the path to the compiled `orgconsole` binary.
pub fn console_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs -> tests -> workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("orgconsole")
}

/// Captured result of one console invocation.
#[derive(Debug)]
pub struct ConsoleOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the console binary against a backend with an isolated state dir.
pub struct Console {
    api_url: String,
    state_dir: tempfile::TempDir,
}

impl Console {
    pub fn new(backend: &MockBackend) -> anyhow::Result<Self> {
        Ok(Self { api_url: backend.base_url(), state_dir: tempfile::tempdir()? })
    }

    pub fn state_dir(&self) -> &Path {
        self.state_dir.path()
    }

    pub async fn run(&self, args: &[&str]) -> anyhow::Result<ConsoleOutput> {
        let binary = console_binary();
        anyhow::ensure!(binary.exists(), "orgconsole binary not found at {}", binary.display());

        let child = tokio::process::Command::new(&binary)
            .arg("--api-url")
            .arg(&self.api_url)
            .arg("--state-dir")
            .arg(self.state_dir.path())
            .args(["--log-format", "text", "--log-level", "warn"])
            .args(args)
            .env_remove("ORGCONSOLE_PASSWORD")
            .env_remove("ORGCONSOLE_ORG_ENCODING")
            .kill_on_drop(true)
            .output();
        let out = tokio::time::timeout(Duration::from_secs(20), child).await??;

        Ok(ConsoleOutput {
            code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    /// The persisted session, or `Value::Null` when none has been written.
    pub fn session(&self) -> anyhow::Result<Value> {
        let path = self.state_dir.path().join(orgconsole_client::credential::persist::SESSION_FILE);
        if !path.exists() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}
