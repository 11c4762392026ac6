//! Sign-in, sign-out and per-request session resolution.

use log::{error, warn};

use crate::backend::AuthGateway;
use crate::backend::errors::BackendError;
use crate::domain::user::AuthenticatedUser;
use crate::forms::auth::SignInForm;
use crate::services::{ServiceError, ServiceResult};
use crate::state::session::{SessionHolder, SessionState};

/// A completed password sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    /// Token to remember in the identity cookie.
    pub access_token: String,
    pub user: AuthenticatedUser,
}

pub async fn sign_in<G>(gateway: &G, form: SignInForm) -> ServiceResult<SignedIn>
where
    G: AuthGateway + ?Sized,
{
    let credentials = form.into_credentials().map_err(|err| {
        warn!("Rejected sign-in form: {err}");
        ServiceError::Form("Enter a valid email and password".to_string())
    })?;

    let tokens = gateway
        .sign_in(&credentials.email, &credentials.password)
        .await
        .map_err(|err| match err {
            BackendError::Unauthorized(message)
            | BackendError::Http {
                status: 400,
                message,
            } => ServiceError::Form(message),
            other => {
                error!("Sign-in request failed: {other}");
                ServiceError::Backend(other)
            }
        })?;

    let user = gateway.fetch_user(&tokens.access_token).await?;

    Ok(SignedIn {
        access_token: tokens.access_token,
        user,
    })
}

/// Resolves the session behind a stored access token.
///
/// A missing token and a failed lookup both yield
/// [`SessionState::Unauthenticated`].
pub async fn resolve_session<G>(gateway: &G, access_token: Option<&str>) -> SessionState
where
    G: AuthGateway + ?Sized,
{
    let mut holder = SessionHolder::new();
    holder.begin_loading();

    let result = match access_token {
        Some(token) => gateway.fetch_user(token).await.map(Some),
        None => Ok(None),
    };
    if let Err(err) = &result {
        warn!("Session lookup failed: {err}");
    }

    holder.resolve(result);
    holder.into_state()
}

/// Revokes the access token. Local sign-out does not depend on the outcome.
pub async fn sign_out<G>(gateway: &G, access_token: &str) -> ServiceResult<()>
where
    G: AuthGateway + ?Sized,
{
    gateway.sign_out(access_token).await.map_err(|err| {
        warn!("Failed to revoke session: {err}");
        ServiceError::from(err)
    })
}
