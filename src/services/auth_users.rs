use log::error;

use crate::backend::AuthUserReader;
use crate::domain::role::Capability;
use crate::domain::user::{AuthUser, AuthenticatedUser};
use crate::services::{ServiceError, ServiceResult};

/// Returns every auth user joined with its profile.
///
/// Backend failures, including a rejected service key, are passed through
/// as [`ServiceError::Backend`] so the API can echo the backend's message.
pub async fn list_auth_users<R>(
    backend: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<AuthUser>>
where
    R: AuthUserReader + ?Sized,
{
    if !user.can(Capability::ListAuthUsers) {
        return Err(ServiceError::Unauthorized);
    }

    backend.list_auth_users().await.map_err(|err| {
        error!("Failed to list auth users: {err}");
        ServiceError::Backend(err)
    })
}
