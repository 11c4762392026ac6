//! Fake hosted backend served on a local port, plus an app wired against it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use salesdesk::backend::{AdminBackend, RestBackend};
use salesdesk::domain::role::Role;
use salesdesk::domain::types::UserId;
use salesdesk::domain::user::AuthenticatedUser;
use salesdesk::state::session::SessionState;

pub const ANON_KEY: &str = "anon-key";
pub const SERVICE_KEY: &str = "service-key";
pub const USER_ID: &str = "11111111-1111-4111-8111-111111111111";
pub const ADMIN_ID: &str = "22222222-2222-4222-8222-222222222222";

/// A request as seen by the fake backend.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub apikey: Option<String>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakeState {
    pub requests: Mutex<Vec<Recorded>>,
    pub clients: Mutex<Vec<Value>>,
    /// Makes `get_auth_users` fail with this message.
    pub auth_users_failure: Mutex<Option<String>>,
}

impl FakeState {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn seed_client(&self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        self.clients.lock().unwrap().push(json!({
            "id": id,
            "name": name,
            "email": null,
            "phone": null,
            "company": "Acme Corp",
            "address": null,
            "status": "active",
            "created_at": now,
            "updated_at": now,
        }));
        id
    }
}

pub struct FakeBackend {
    pub url: String,
    pub state: web::Data<FakeState>,
}

impl FakeBackend {
    pub fn user_client(&self) -> RestBackend {
        RestBackend::new(&self.url, ANON_KEY).unwrap()
    }

    pub fn admin_client(&self) -> AdminBackend {
        AdminBackend::new(&self.url, SERVICE_KEY).unwrap()
    }
}

fn record(req: &HttpRequest, state: &FakeState, body: &web::Bytes) {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Recorded {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        apikey: header("apikey"),
        bearer: header("authorization").and_then(|v| v.strip_prefix("Bearer ").map(str::to_string)),
        body: serde_json::from_slice(body).ok(),
    });
}

fn bearer(req: &HttpRequest) -> String {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}

fn id_filter(query: &HashMap<String, String>) -> Option<String> {
    query.get("id").and_then(|v| v.strip_prefix("eq.")).map(str::to_string)
}

async fn token(req: HttpRequest, state: web::Data<FakeState>, body: web::Bytes) -> HttpResponse {
    record(&req, &state, &body);
    let payload: Value = serde_json::from_slice(&body).unwrap_or_default();
    let access_token = match (payload["email"].as_str(), payload["password"].as_str()) {
        (Some("rep@example.com"), Some("secret")) => "user-token",
        (Some("admin@example.com"), Some("secret")) => "admin-token",
        _ => {
            return HttpResponse::BadRequest().json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            }));
        }
    };
    HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh"
    }))
}

async fn auth_user(req: HttpRequest, state: web::Data<FakeState>, body: web::Bytes) -> HttpResponse {
    record(&req, &state, &body);
    match bearer(&req).as_str() {
        "user-token" => HttpResponse::Ok().json(json!({"id": USER_ID, "email": "rep@example.com"})),
        "admin-token" => {
            HttpResponse::Ok().json(json!({"id": ADMIN_ID, "email": "admin@example.com"}))
        }
        _ => HttpResponse::Unauthorized().json(json!({"msg": "invalid JWT"})),
    }
}

async fn logout(req: HttpRequest, state: web::Data<FakeState>, body: web::Bytes) -> HttpResponse {
    record(&req, &state, &body);
    HttpResponse::NoContent().finish()
}

async fn profiles(
    req: HttpRequest,
    state: web::Data<FakeState>,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
) -> HttpResponse {
    record(&req, &state, &body);
    let rows = match id_filter(&query).as_deref() {
        Some(USER_ID) => json!([{"full_name": "Rep", "role": "user"}]),
        Some(ADMIN_ID) => json!([{"full_name": null, "role": "admin"}]),
        _ => json!([]),
    };
    HttpResponse::Ok().json(rows)
}

async fn get_auth_users(
    req: HttpRequest,
    state: web::Data<FakeState>,
    body: web::Bytes,
) -> HttpResponse {
    record(&req, &state, &body);
    if req.headers().get("apikey").and_then(|v| v.to_str().ok()) != Some(SERVICE_KEY) {
        return HttpResponse::Unauthorized().json(json!({"message": "permission denied"}));
    }
    if let Some(message) = state.auth_users_failure.lock().unwrap().clone() {
        return HttpResponse::InternalServerError().json(json!({"message": message}));
    }
    HttpResponse::Ok().json(json!([
        {
            "id": USER_ID,
            "email": "rep@example.com",
            "full_name": "Rep",
            "role": "user",
            "created_at": "2024-05-01T10:00:00Z",
            "last_sign_in_at": "2024-06-01T08:30:00Z"
        },
        {
            "id": ADMIN_ID,
            "email": "admin@example.com",
            "full_name": null,
            "role": "admin",
            "created_at": "2024-05-02T10:00:00Z",
            "last_sign_in_at": null
        }
    ]))
}

async fn list_clients(
    req: HttpRequest,
    state: web::Data<FakeState>,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
) -> HttpResponse {
    record(&req, &state, &body);
    let clients = state.clients.lock().unwrap();
    let rows: Vec<Value> = match id_filter(&query) {
        Some(id) => clients.iter().filter(|c| c["id"] == id.as_str()).cloned().collect(),
        None => clients.clone(),
    };
    let range = if rows.is_empty() {
        "*/0".to_string()
    } else {
        format!("0-{}/{}", rows.len() - 1, rows.len())
    };
    HttpResponse::Ok()
        .insert_header(("Content-Range", range))
        .json(rows)
}

async fn insert_client(
    req: HttpRequest,
    state: web::Data<FakeState>,
    body: web::Bytes,
) -> HttpResponse {
    record(&req, &state, &body);
    let mut row: Value = serde_json::from_slice(&body).unwrap_or_default();
    let now = Utc::now().to_rfc3339();
    row["id"] = json!(Uuid::new_v4().to_string());
    row["created_at"] = json!(now);
    row["updated_at"] = json!(now);
    state.clients.lock().unwrap().push(row.clone());
    HttpResponse::Created().json(json!([row]))
}

async fn update_client(
    req: HttpRequest,
    state: web::Data<FakeState>,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
) -> HttpResponse {
    record(&req, &state, &body);
    let changes: Value = serde_json::from_slice(&body).unwrap_or_default();
    let id = id_filter(&query).unwrap_or_default();
    let mut clients = state.clients.lock().unwrap();
    let updated: Vec<Value> = clients
        .iter_mut()
        .filter(|c| c["id"] == id.as_str())
        .map(|c| {
            if let (Some(row), Some(changes)) = (c.as_object_mut(), changes.as_object()) {
                row.extend(changes.clone());
            }
            c.clone()
        })
        .collect();
    HttpResponse::Ok().json(updated)
}

async fn delete_client(
    req: HttpRequest,
    state: web::Data<FakeState>,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
) -> HttpResponse {
    record(&req, &state, &body);
    let id = id_filter(&query).unwrap_or_default();
    let mut clients = state.clients.lock().unwrap();
    let (removed, kept): (Vec<Value>, Vec<Value>) =
        clients.drain(..).partition(|c| c["id"] == id.as_str());
    *clients = kept;
    HttpResponse::Ok().json(removed)
}

/// Starts the fake backend on an ephemeral port.
pub async fn start_backend() -> FakeBackend {
    let state = web::Data::new(FakeState::default());
    let data = state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/auth/v1/token", web::post().to(token))
            .route("/auth/v1/user", web::get().to(auth_user))
            .route("/auth/v1/logout", web::post().to(logout))
            .route("/rest/v1/profiles", web::get().to(profiles))
            .route("/rest/v1/rpc/get_auth_users", web::post().to(get_auth_users))
            .route("/rest/v1/clients", web::get().to(list_clients))
            .route("/rest/v1/clients", web::post().to(insert_client))
            .route("/rest/v1/clients", web::patch().to(update_client))
            .route("/rest/v1/clients", web::delete().to(delete_client))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind fake backend");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    FakeBackend {
        url: format!("http://{addr}"),
        state,
    }
}

pub fn signed_in(role: Role) -> SessionState {
    let (id, email, token) = match role {
        Role::User => (USER_ID, "rep@example.com", "user-token"),
        Role::Admin | Role::SuperAdmin => (ADMIN_ID, "admin@example.com", "admin-token"),
    };
    SessionState::Authenticated(AuthenticatedUser {
        id: id.parse::<UserId>().unwrap(),
        email: email.into(),
        name: None,
        role,
        access_token: token.into(),
    })
}

/// Initializes the application wired against a [`FakeBackend`].
///
/// With a session state given, it is injected before the session loader runs,
/// which then keeps it regardless of cookies.
#[macro_export]
macro_rules! test_app {
    ($backend:expr) => {
        $crate::test_app!($backend, None::<salesdesk::state::session::SessionState>)
    };
    ($backend:expr, $session:expr) => {{
        use actix_web::HttpMessage as _;
        use actix_web::dev::Service as _;

        let key = actix_web::cookie::Key::generate();
        let message_store =
            actix_web_flash_messages::storage::CookieMessageStore::builder(key.clone()).build();
        let message_framework =
            actix_web_flash_messages::FlashMessagesFramework::builder(message_store).build();
        let tera = tera::Tera::new("templates/**/*").expect("templates");
        let session: Option<salesdesk::state::session::SessionState> = $session;

        actix_web::test::init_service(
            actix_web::App::new()
                .wrap_fn(move |req, srv| {
                    if let Some(state) = &session {
                        req.extensions_mut().insert(state.clone());
                    }
                    srv.call(req)
                })
                .wrap(message_framework)
                .wrap(actix_identity::IdentityMiddleware::default())
                .wrap(actix_session::SessionMiddleware::new(
                    actix_session::storage::CookieSessionStore::default(),
                    key,
                ))
                .configure(salesdesk::configure)
                .app_data(actix_web::web::Data::new(tera))
                .app_data(actix_web::web::Data::new($backend.user_client()))
                .app_data(actix_web::web::Data::new($backend.admin_client())),
        )
        .await
    }};
}
