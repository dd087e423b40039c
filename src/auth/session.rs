//! Persisted login session
//!
//! The session file holds the token and user record returned by the login
//! endpoint. It is a display hint for the route guard only; the backend
//! stays the authority on what the user may do.

use crate::api::{Role, UserRecord};
use anyhow::Result;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user: UserRecord,
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    pub fn new(token: Option<String>, user: UserRecord) -> Self {
        let expires_at = token.as_deref().and_then(token_expiry);
        Self {
            token,
            user,
            expires_at,
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying it. The client holds no
/// signing key, so only the claims are decoded.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp?, 0)
}

/// Session file location and persistence
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Session file under the user's data directory
    pub fn open_default() -> Self {
        match ProjectDirs::from("edu", "admissions", "admissions-tui") {
            Some(dirs) => Self::at(dirs.data_dir().join("session.json")),
            None => Self { path: None },
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the stored session. Expired or unreadable sessions are removed.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> Result<Option<StoredSession>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let session: StoredSession = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding unreadable session file: {}", e);
                self.clear()?;
                return Ok(None);
            }
        };
        if session.is_expired(now) {
            tracing::info!(user = %session.user.email, "stored session expired");
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(session)?)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
