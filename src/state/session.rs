//! Session state holder consulted by the route guards.

use crate::domain::user::AuthenticatedUser;

/// Where session resolution currently stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    /// Resolution in flight; `previous` is the last known user, if any.
    Loading { previous: Option<AuthenticatedUser> },
    Authenticated(AuthenticatedUser),
    Unauthenticated,
}

impl SessionState {
    /// The user to act as: the resolved one, or the cached one while loading.
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Loading { previous } => previous.as_ref(),
            SessionState::Uninitialized | SessionState::Unauthenticated => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            SessionState::Authenticated(_) | SessionState::Unauthenticated
        )
    }
}

/// Owns the [`SessionState`] and applies the resolution transitions.
#[derive(Clone, Debug, Default)]
pub struct SessionHolder {
    state: SessionState,
}

impl SessionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Marks resolution as started, keeping any known user as cache.
    pub fn begin_loading(&mut self) {
        let previous = match std::mem::take(&mut self.state) {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Loading { previous } => previous,
            SessionState::Uninitialized | SessionState::Unauthenticated => None,
        };
        self.state = SessionState::Loading { previous };
    }

    /// Settles the session. Both "no session" and a failed lookup end up
    /// as [`SessionState::Unauthenticated`].
    pub fn resolve<E>(&mut self, result: Result<Option<AuthenticatedUser>, E>) -> &SessionState {
        self.state = match result {
            Ok(Some(user)) => SessionState::Authenticated(user),
            Ok(None) | Err(_) => SessionState::Unauthenticated,
        };
        &self.state
    }

    pub fn sign_out(&mut self) {
        self.state = SessionState::Unauthenticated;
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::role::Role;
    use crate::domain::types::UserId;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(Uuid::new_v4()),
            email: "rep@example.com".into(),
            name: Some("Rep".into()),
            role: Role::User,
            access_token: "token".into(),
        }
    }

    #[test]
    fn starts_uninitialized_and_resolves() {
        let mut holder = SessionHolder::new();
        assert_eq!(holder.state(), &SessionState::Uninitialized);

        holder.begin_loading();
        assert_eq!(holder.state(), &SessionState::Loading { previous: None });
        assert!(!holder.state().is_resolved());

        let state = holder.resolve::<String>(Ok(Some(user())));
        assert!(matches!(state, SessionState::Authenticated(_)));
        assert!(state.is_resolved());
    }

    #[test]
    fn failed_resolution_is_unauthenticated() {
        let mut holder = SessionHolder::new();
        holder.begin_loading();
        holder.resolve::<&str>(Err("network down"));
        assert_eq!(holder.state(), &SessionState::Unauthenticated);

        holder.begin_loading();
        holder.resolve::<&str>(Ok(None));
        assert_eq!(holder.into_state(), SessionState::Unauthenticated);
    }

    #[test]
    fn reloading_keeps_previous_user_as_cache() {
        let mut holder = SessionHolder::new();
        let user = user();
        holder.resolve::<String>(Ok(Some(user.clone())));

        holder.begin_loading();

        assert_eq!(holder.state().user(), Some(&user));
        assert!(!holder.state().is_resolved());

        holder.sign_out();
        assert_eq!(holder.state().user(), None);
    }
}
