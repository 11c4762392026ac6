//! Route-tree guards deciding between rendering, waiting and redirecting.

use crate::domain::role::Capability;
use crate::state::session::SessionState;
use crate::{ADMIN_ENTRY, DASHBOARD_ENTRY, PUBLIC_ENTRY};

/// Route subtree protected by a guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardScope {
    /// Sign-in and other pages for visitors without a session.
    Public,
    /// Any page that needs a signed-in user.
    Authenticated,
    /// The regular `/app` dashboard.
    Dashboard,
    /// The `/admin` area.
    Admin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Session not known yet; show a placeholder instead of the content.
    Loading,
    Redirect(&'static str),
}

/// Decides what a guard over `scope` does for the given session state.
pub fn evaluate(scope: GuardScope, state: &SessionState) -> GuardDecision {
    let user = state.user();

    if !state.is_resolved() && user.is_none() {
        return GuardDecision::Loading;
    }

    match (scope, user) {
        (GuardScope::Public, None) => GuardDecision::Render,
        (GuardScope::Public, Some(user)) => GuardDecision::Redirect(user.role.home_path()),
        (_, None) => GuardDecision::Redirect(PUBLIC_ENTRY),
        (GuardScope::Authenticated, Some(_)) => GuardDecision::Render,
        (GuardScope::Dashboard, Some(user)) => {
            if user.can(Capability::UseAdminArea) {
                GuardDecision::Redirect(ADMIN_ENTRY)
            } else {
                GuardDecision::Render
            }
        }
        (GuardScope::Admin, Some(user)) => {
            if user.can(Capability::UseAdminArea) {
                GuardDecision::Render
            } else {
                GuardDecision::Redirect(DASHBOARD_ENTRY)
            }
        }
    }
}
