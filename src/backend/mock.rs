//! Mock auth collaborators for isolating services in tests.
//!
//! Record access is generic over the entity type, which `mockall` cannot
//! mock; services touching records are tested against
//! [`crate::backend::memory::MemoryBackend`] instead.

use async_trait::async_trait;
use mockall::mock;

use crate::backend::errors::BackendResult;
use crate::backend::{AuthGateway, AuthTokens, AuthUserReader};
use crate::domain::user::{AuthUser, AuthenticatedUser};

mock! {
    pub AuthBackend {}

    #[async_trait]
    impl AuthGateway for AuthBackend {
        async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthTokens>;
        async fn fetch_user(&self, access_token: &str) -> BackendResult<AuthenticatedUser>;
        async fn sign_out(&self, access_token: &str) -> BackendResult<()>;
    }

    #[async_trait]
    impl AuthUserReader for AuthBackend {
        async fn list_auth_users(&self) -> BackendResult<Vec<AuthUser>>;
    }
}
