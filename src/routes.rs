//! Role gate: the pure mapping from session state to the area the UI may
//! enter. Total over every state, no side effects; callers consult it on
//! every protected-area entry and act on the outcome.

use serde::{Deserialize, Serialize};

use crate::models::{Role, UserProfile};
use crate::session::SessionState;

/// Portal areas, one per recognized role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Portal {
    Admin,
    Doctor,
    Patient,
}

/// Outcome of consulting the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Startup restore still pending; show the loader and decide later.
    AwaitSession,
    /// Nobody signed in; only the login area is reachable.
    Login,
    Portal(Portal),
    /// Signed in, but with no role this client recognizes. Deliberately not
    /// a portal: an unknown role must never land in someone else's area.
    AccessError,
}

impl Route {
    /// True when the gate admits `portal`.
    pub fn allows(&self, portal: Portal) -> bool {
        matches!(self, Route::Portal(p) if *p == portal)
    }
}

pub fn route_for(state: &SessionState) -> Route {
    match state {
        SessionState::Restoring => Route::AwaitSession,
        SessionState::Anonymous => Route::Login,
        SessionState::Authenticated(user) => portal_for(user),
    }
}

fn portal_for(user: &UserProfile) -> Route {
    match user.role {
        Role::Admin => Route::Portal(Portal::Admin),
        Role::Doctor => Route::Portal(Portal::Doctor),
        Role::Patient => Route::Portal(Portal::Patient),
        Role::Unknown => Route::AccessError,
    }
}
