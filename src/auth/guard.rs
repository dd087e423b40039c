//! Route guard for role-gated views

use super::session::StoredSession;
use crate::api::Role;
use crate::state::View;
use chrono::{DateTime, Utc};

/// What to do with a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Show this view instead
    Redirect(View),
    /// Drop the stored session and go to login
    SignOut,
}

/// Decide whether `view` may be shown for the stored session
pub fn check_access(
    view: View,
    session: Option<&StoredSession>,
    now: DateTime<Utc>,
) -> GuardDecision {
    if view == View::Login {
        return match session {
            Some(s) if !s.is_expired(now) && s.role() != Role::Unknown => {
                GuardDecision::Redirect(View::dashboard_for(s.role()))
            }
            _ => GuardDecision::Allow,
        };
    }
    let Some(required) = view.required_role() else {
        return GuardDecision::Allow;
    };
    let Some(session) = session else {
        return GuardDecision::Redirect(View::Login);
    };
    if session.is_expired(now) {
        return GuardDecision::SignOut;
    }
    match session.role() {
        Role::Unknown => GuardDecision::SignOut,
        role if role == required => GuardDecision::Allow,
        role => GuardDecision::Redirect(View::dashboard_for(role)),
    }
}
