//! An in-process stand-in for the attendance API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{delete, get, post, put},
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use attendance_client::{AttendanceClient, Config, SessionStore};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "correct-horse";

#[derive(Clone)]
pub struct FakeUser {
    pub id: String,
    pub email: String,
    pub pass: String,
    pub display_name: String,
    pub role: &'static str,
}

impl FakeUser {
    fn profile(&self) -> Value {
        json!({
            "_id": self.id,
            "email": self.email,
            "displayName": self.display_name,
            "role": self.role,
        })
    }
}

#[derive(Default)]
pub struct FakeState {
    pub users: Vec<FakeUser>,
    pub tokens: HashMap<String, String>,
    pub records: Vec<Value>,
    /// The Authorization header of every request, in arrival order.
    pub seen_auth: Vec<Option<String>>,
    /// Holds health, login and status responses back this long.
    pub delay: Option<Duration>,
    /// Served verbatim by the health route instead of its usual envelope.
    pub health_reply: Option<Value>,
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeServer {
    pub base_url: String,
    pub state: Shared,
}

impl FakeServer {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            users: vec![
                FakeUser {
                    id: Uuid::new_v4().to_string(),
                    email: ADMIN_EMAIL.into(),
                    pass: PASSWORD.into(),
                    display_name: "Admin".into(),
                    role: "admin",
                },
                FakeUser {
                    id: Uuid::new_v4().to_string(),
                    email: USER_EMAIL.into(),
                    pass: PASSWORD.into(),
                    display_name: "Ana".into(),
                    role: "user",
                },
            ],
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/", get(health))
            .route("/api/auth/register/", post(register))
            .route("/api/auth/login/", post(login))
            .route("/api/attendance/check-in", post(check_in))
            .route("/api/attendance/check-out", post(check_out))
            .route("/api/attendance/status", get(status))
            .route("/api/attendance/today/", get(today))
            .route("/api/attendance/user/all/", get(user_history))
            .route("/api/attendance/admin/history", get(admin_history))
            .route("/api/profile/all", get(all_profiles))
            .route("/api/profile/admin/delete/{user_id}", delete(delete_user))
            .route("/api/profile/admin/update", put(admin_update))
            .route("/api/profile/user/update", put(self_update))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> AttendanceClient {
        direct_client(&self.base_url, None)
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> AttendanceClient {
        direct_client(&self.base_url, Some(timeout))
    }

    pub fn user_id(&self, email: &str) -> String {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|user| user.email == email)
            .map(|user| user.id.clone())
            .unwrap()
    }

    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn set_health_reply(&self, body: Value) {
        self.state.lock().unwrap().health_reply = Some(body);
    }

    pub fn seen_auth(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().seen_auth.clone()
    }
}

/// A client that bypasses any proxy configured in the environment.
pub fn direct_client(base_url: &str, timeout: Option<Duration>) -> AttendanceClient {
    let mut config = Config::with_api_url(base_url).unwrap();
    config.system_proxy = false;
    if let Some(timeout) = timeout {
        config.request_timeout = timeout;
    }
    AttendanceClient::new(&config, SessionStore::in_memory()).unwrap()
}

type Reply = (StatusCode, Json<Value>);

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(json!({ "success": true, "body": body })))
}

fn soft_fail(error: &str) -> Reply {
    (
        StatusCode::OK,
        Json(json!({ "success": false, "body": { "message": error, "error": error } })),
    )
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn record_auth(state: &mut FakeState, headers: &HeaderMap) -> Option<String> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.seen_auth.push(auth.clone());
    auth
}

/// Resolves the caller, or the reply to send when it cannot be resolved.
fn caller(state: &mut FakeState, headers: &HeaderMap, admin_only: bool) -> Result<FakeUser, Reply> {
    let unauthorized = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "body": { "message": "Unauthorized" } })),
        )
    };
    let token = record_auth(state, headers).ok_or_else(unauthorized)?;
    let user_id = state.tokens.get(&token).cloned().ok_or_else(unauthorized)?;
    let user = state
        .users
        .iter()
        .find(|user| user.id == user_id)
        .cloned()
        .ok_or_else(unauthorized)?;
    if admin_only && user.role != "admin" {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "body": { "message": "Admins only" } })),
        ));
    }
    Ok(user)
}

async fn hold(state: &Shared) {
    let delay = state.lock().unwrap().delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

async fn health(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let canned = {
        let mut state = state.lock().unwrap();
        record_auth(&mut state, &headers);
        state.health_reply.clone()
    };
    hold(&state).await;
    match canned {
        Some(body) => (StatusCode::OK, Json(body)),
        None => ok(json!({ "message": "Attendance API up" })),
    }
}

async fn register(State(state): State<Shared>, headers: HeaderMap, Json(payload): Json<Value>) -> Reply {
    let mut state = state.lock().unwrap();
    record_auth(&mut state, &headers);
    let email = payload["email"].as_str().unwrap_or_default().to_string();
    if state.users.iter().any(|user| user.email == email) {
        return soft_fail("Email already registered");
    }
    let user = FakeUser {
        id: Uuid::new_v4().to_string(),
        email,
        pass: payload["pass"].as_str().unwrap_or_default().to_string(),
        display_name: payload["displayName"].as_str().unwrap_or_default().to_string(),
        role: "user",
    };
    let body = json!({
        "message": "User registered",
        "user": { "id": user.id, "email": user.email, "displayName": user.display_name },
    });
    state.users.push(user);
    ok(body)
}

async fn login(State(shared): State<Shared>, headers: HeaderMap, Json(payload): Json<Value>) -> Reply {
    hold(&shared).await;
    let mut state = shared.lock().unwrap();
    record_auth(&mut state, &headers);
    let user = state
        .users
        .iter()
        .find(|user| user.email == payload["email"] && user.pass == payload["pass"])
        .cloned();
    let Some(user) = user else {
        return ok(json!({ "message": "Login failed", "error": "Invalid credentials" }));
    };
    let token = format!("Bearer {}", Uuid::new_v4());
    state.tokens.insert(token.clone(), user.id.clone());
    ok(json!({
        "message": "Login successful",
        "token": token,
        "user": { "id": user.id, "email": user.email, "displayName": user.display_name, "role": user.role },
    }))
}

async fn check_in(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    let user = match caller(&mut state, &headers, false) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    if state
        .records
        .iter()
        .any(|record| record["userId"] == user.id && record["checkOut"].is_null())
    {
        return soft_fail("Already checked in");
    }
    let stamp = now();
    state.records.push(json!({
        "_id": Uuid::new_v4().to_string(),
        "userId": user.id,
        "date": format!("{}T00:00:00.000Z", &stamp[..10]),
        "checkIn": stamp,
        "checkOut": null,
        "createdAt": stamp,
        "updatedAt": stamp,
    }));
    ok(json!({ "message": "Check-in registered" }))
}

async fn check_out(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    let user = match caller(&mut state, &headers, false) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    let Some(record) = state
        .records
        .iter_mut()
        .find(|record| record["userId"] == user.id && record["checkOut"].is_null())
    else {
        return soft_fail("No open check-in");
    };
    let check_in = chrono::DateTime::parse_from_rfc3339(record["checkIn"].as_str().unwrap()).unwrap();
    // Check-out must land strictly after check-in even within the same millisecond.
    let out = std::cmp::max(
        Utc::now(),
        check_in.with_timezone(&Utc) + chrono::Duration::milliseconds(1),
    )
    .to_rfc3339_opts(SecondsFormat::Millis, true);
    record["checkOut"] = json!(out);
    record["updatedAt"] = json!(out);
    ok(json!({ "message": "Check-out registered" }))
}

async fn status(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    hold(&shared).await;
    let mut state = shared.lock().unwrap();
    let user = match caller(&mut state, &headers, false) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    let last = state.records.iter().rev().find(|record| record["userId"] == user.id);
    match last {
        Some(record) if record["checkOut"].is_null() => {
            ok(json!({ "status": "checked-in", "lastRecord": record["checkIn"] }))
        }
        Some(record) => ok(json!({ "status": "checked-out", "lastRecord": record["checkOut"] })),
        None => ok(json!({ "status": "none" })),
    }
}

async fn today(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    let user = match caller(&mut state, &headers, false) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    let stamp = now();
    let day = &stamp[..10];
    let record = state
        .records
        .iter()
        .rev()
        .find(|record| record["userId"] == user.id && record["date"].as_str().unwrap().starts_with(day));
    match record {
        Some(record) => ok(json!({
            "hasAttendance": true,
            "attendance": { "checkIn": record["checkIn"], "checkOut": record["checkOut"] },
        })),
        None => ok(json!({ "hasAttendance": false, "attendance": null })),
    }
}

async fn user_history(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    let user = match caller(&mut state, &headers, false) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    let attendance: Vec<Value> = state
        .records
        .iter()
        .filter(|record| record["userId"] == user.id)
        .cloned()
        .collect();
    ok(json!({ "attendance": attendance }))
}

async fn admin_history(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    if let Err(reply) = caller(&mut state, &headers, true) {
        return reply;
    }
    let history: Vec<Value> = state
        .records
        .iter()
        .filter_map(|record| {
            let owner = state.users.iter().find(|user| record["userId"] == user.id)?;
            let mut joined = record.clone();
            joined["user"] = owner.profile();
            Some(joined)
        })
        .collect();
    ok(json!({ "history": history }))
}

async fn all_profiles(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    if let Err(reply) = caller(&mut state, &headers, true) {
        return reply;
    }
    let profiles: Vec<Value> = state.users.iter().map(FakeUser::profile).collect();
    ok(json!({ "message": "Profiles loaded", "profiles": profiles }))
}

async fn delete_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Reply {
    let mut state = state.lock().unwrap();
    if let Err(reply) = caller(&mut state, &headers, true) {
        return reply;
    }
    let before = state.users.len();
    state.users.retain(|user| user.id != user_id);
    if state.users.len() == before {
        return soft_fail("User not found");
    }
    ok(json!({ "message": "User deleted" }))
}

fn apply_update(state: &mut FakeState, payload: &Value) -> Reply {
    let Some(user) = state.users.iter_mut().find(|user| payload["_id"] == user.id) else {
        return soft_fail("User not found");
    };
    user.email = payload["email"].as_str().unwrap_or_default().to_string();
    user.display_name = payload["displayName"].as_str().unwrap_or_default().to_string();
    ok(json!({ "message": "User updated" }))
}

async fn admin_update(State(state): State<Shared>, headers: HeaderMap, Json(payload): Json<Value>) -> Reply {
    let mut state = state.lock().unwrap();
    if let Err(reply) = caller(&mut state, &headers, true) {
        return reply;
    }
    apply_update(&mut state, &payload)
}

async fn self_update(State(state): State<Shared>, headers: HeaderMap, Json(payload): Json<Value>) -> Reply {
    let mut state = state.lock().unwrap();
    let user = match caller(&mut state, &headers, false) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    if payload["_id"] != user.id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "body": { "message": "Cannot edit another user" } })),
        );
    }
    apply_update(&mut state, &payload)
}
