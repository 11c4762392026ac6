//! Seams to the hosted backend service.
//!
//! Persistence, authentication and row-level security all live in the
//! backend; this module only describes the calls the application makes and
//! provides [`rest::RestBackend`], the JSON-over-HTTPS implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::errors::BackendResult;
use crate::domain::entity::Entity;
use crate::domain::types::NonEmptyString;
use crate::domain::user::{AuthUser, AuthenticatedUser};

pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod rest;

pub use rest::{AdminBackend, RestBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows to skip; page numbers start at 1.
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Filters applied when listing the rows of one entity table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<NonEmptyString>,
    pub pagination: Option<Pagination>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts rows to those matching `term`; blank terms are ignored.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = NonEmptyString::new(term).ok();
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Tokens issued by the auth surface after a password sign-in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[async_trait]
pub trait RecordReader: Send + Sync {
    /// Returns the total number of matching rows and the requested page.
    async fn list_records<E: Entity>(&self, query: ListQuery) -> BackendResult<(usize, Vec<E>)>;
    async fn get_record<E: Entity>(&self, id: E::Id) -> BackendResult<Option<E>>;
}

#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn insert_record<E: Entity>(&self, draft: &E::Draft) -> BackendResult<E>;
    async fn update_record<E: Entity>(&self, id: E::Id, draft: &E::Draft) -> BackendResult<E>;
    async fn delete_record<E: Entity>(&self, id: E::Id) -> BackendResult<()>;
}

/// The `get_auth_users` procedure, callable with service-role credentials only.
#[async_trait]
pub trait AuthUserReader: Send + Sync {
    async fn list_auth_users(&self) -> BackendResult<Vec<AuthUser>>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthTokens>;
    /// Resolves the user behind an access token, including the profile role.
    async fn fetch_user(&self, access_token: &str) -> BackendResult<AuthenticatedUser>;
    async fn sign_out(&self, access_token: &str) -> BackendResult<()>;
}
