//! REST client for the hosted backend.
//!
//! Table rows are served PostgREST-style under `/rest/v1`, sign-in and user
//! lookup GoTrue-style under `/auth/v1`. Every request carries the project
//! API key in the `apikey` header and a bearer token: the signed-in user's
//! access token for user-scoped calls, or the API key itself otherwise.

use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use crate::backend::errors::{BackendError, BackendResult};
use crate::backend::{
    AuthGateway, AuthTokens, AuthUserReader, ListQuery, RecordReader, RecordWriter,
};
use crate::domain::entity::Entity;
use crate::domain::role::Role;
use crate::domain::types::UserId;
use crate::domain::user::{AuthUser, AuthenticatedUser};

const AUTH_USERS_RPC: &str = "get_auth_users";

#[derive(Clone)]
pub struct RestBackend {
    http: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

/// Subset of the auth surface's user object the application reads.
#[derive(Debug, Deserialize)]
struct AuthUserObject {
    id: UserId,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    full_name: Option<String>,
    #[serde(default)]
    role: Role,
}

impl RestBackend {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client authenticating with `api_key` (anon or service role).
    pub fn new(base_url: &str, api_key: &str) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("salesdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::ConnectionError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
        })
    }

    /// Copy of this client acting on behalf of the signed-in user.
    pub fn for_user(&self, user: &AuthenticatedUser) -> Self {
        self.with_access_token(&user.access_token)
    }

    pub fn with_access_token(&self, access_token: &str) -> Self {
        Self {
            access_token: Some(access_token.to_string()),
            ..self.clone()
        }
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.base_url)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    async fn send(builder: RequestBuilder) -> BackendResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = BackendError::from_response(status, &body);
        error!("Backend request failed: {err}");
        Err(err)
    }

    fn row_filter(id: impl std::fmt::Display) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }
}

/// Client holding the service-role key. It bypasses row-level security and
/// only serves the admin listing of auth users.
#[derive(Clone)]
pub struct AdminBackend(RestBackend);

impl AdminBackend {
    pub fn new(base_url: &str, service_role_key: &str) -> BackendResult<Self> {
        RestBackend::new(base_url, service_role_key).map(Self)
    }
}

/// Builds an `or` filter matching `term` case-insensitively in any column.
///
/// Characters with meaning in the filter grammar are dropped from the term.
pub fn search_filter(columns: &[&str], term: &str) -> Option<String> {
    let cleaned: String = term
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '"' | '\\' | ':'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || columns.is_empty() {
        return None;
    }
    let clauses = columns
        .iter()
        .map(|column| format!("{column}.ilike.*{cleaned}*"))
        .collect::<Vec<_>>()
        .join(",");
    Some(format!("({clauses})"))
}

/// Reads the total from a `Content-Range` header such as `0-19/57`.
pub fn parse_content_range(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl RecordReader for RestBackend {
    async fn list_records<E: Entity>(&self, query: ListQuery) -> BackendResult<(usize, Vec<E>)> {
        let mut request = self
            .request(Method::GET, self.rest_url(E::KIND.table()))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .header("Prefer", "count=exact");

        if let Some(filter) = query
            .search
            .as_ref()
            .and_then(|term| search_filter(E::SEARCH_COLUMNS, term.as_str()))
        {
            request = request.query(&[("or", filter)]);
        }
        if let Some(pagination) = query.pagination {
            request = request.query(&[
                ("limit", pagination.per_page),
                ("offset", pagination.offset()),
            ]);
        }

        let response = Self::send(request).await?;
        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range);
        let rows: Vec<E> = response.json().await?;

        Ok((total.unwrap_or(rows.len()), rows))
    }

    async fn get_record<E: Entity>(&self, id: E::Id) -> BackendResult<Option<E>> {
        let request = self
            .request(Method::GET, self.rest_url(E::KIND.table()))
            .query(&[("select", "*"), ("limit", "1")])
            .query(&Self::row_filter(id));

        let rows: Vec<E> = Self::send(request).await?.json().await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl RecordWriter for RestBackend {
    async fn insert_record<E: Entity>(&self, draft: &E::Draft) -> BackendResult<E> {
        let request = self
            .request(Method::POST, self.rest_url(E::KIND.table()))
            .header("Prefer", "return=representation")
            .json(draft);

        let rows: Vec<E> = Self::send(request).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            BackendError::DecodeError(format!("insert into {} returned no row", E::KIND.table()))
        })
    }

    async fn update_record<E: Entity>(&self, id: E::Id, draft: &E::Draft) -> BackendResult<E> {
        let request = self
            .request(Method::PATCH, self.rest_url(E::KIND.table()))
            .query(&Self::row_filter(id))
            .header("Prefer", "return=representation")
            .json(draft);

        let rows: Vec<E> = Self::send(request).await?.json().await?;
        rows.into_iter().next().ok_or(BackendError::NotFound)
    }

    async fn delete_record<E: Entity>(&self, id: E::Id) -> BackendResult<()> {
        let request = self
            .request(Method::DELETE, self.rest_url(E::KIND.table()))
            .query(&Self::row_filter(id))
            .header("Prefer", "return=representation");

        let rows: Vec<serde_json::Value> = Self::send(request).await?.json().await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthUserReader for RestBackend {
    async fn list_auth_users(&self) -> BackendResult<Vec<AuthUser>> {
        let request = self
            .request(Method::POST, self.rest_url(&format!("rpc/{AUTH_USERS_RPC}")))
            .json(&json!({}));

        Ok(Self::send(request).await?.json().await?)
    }
}

#[async_trait]
impl AuthUserReader for AdminBackend {
    async fn list_auth_users(&self) -> BackendResult<Vec<AuthUser>> {
        self.0.list_auth_users().await
    }
}

#[async_trait]
impl AuthGateway for RestBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthTokens> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }));

        Ok(Self::send(request).await?.json().await?)
    }

    async fn fetch_user(&self, access_token: &str) -> BackendResult<AuthenticatedUser> {
        let user_client = self.with_access_token(access_token);

        let request = user_client.request(Method::GET, user_client.auth_url("user"));
        let auth_user: AuthUserObject = Self::send(request).await?.json().await?;

        let request = user_client
            .request(Method::GET, user_client.rest_url("profiles"))
            .query(&[("select", "full_name,role"), ("limit", "1")])
            .query(&Self::row_filter(auth_user.id));
        let profiles: Vec<ProfileRow> = Self::send(request).await?.json().await?;
        let (name, role) = profiles
            .into_iter()
            .next()
            .map(|p| (p.full_name, p.role))
            .unwrap_or_default();

        Ok(AuthenticatedUser {
            id: auth_user.id,
            email: auth_user.email.unwrap_or_default(),
            name,
            role,
            access_token: access_token.to_string(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        let request = self
            .with_access_token(access_token)
            .request(Method::POST, self.auth_url("logout"));

        Self::send(request).await?;
        Ok(())
    }
}
