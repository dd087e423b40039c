//! Session persistence and role-based access to views

mod guard;
mod session;

pub use guard::{check_access, GuardDecision};
pub use session::{SessionStore, StoredSession};

#[cfg(test)]
pub(crate) use session::tests as session_fixtures;
