//! Wire types of the admissions backend

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Backend record identifier. Sent as a number or a string; kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self(n.to_string()),
            Raw::Str(s) => Self(s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Admin => "Admin",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default = "unknown_role")]
    pub role: Role,
}

fn unknown_role() -> Role {
    Role::Unknown
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: UserRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    /// Lenient parse of a status string; unrecognised values are `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Student {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub university: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub be_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub be_ranking: Option<i64>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "nullable_string")]
    pub location: String,
}

/// Editable subset of [`Student`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub university: String,
    pub be_percentage: Option<f64>,
    pub be_ranking: Option<i64>,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub status_counts: HashMap<String, u64>,
    #[serde(default)]
    pub recent_applications: Vec<serde_json::Value>,
}

impl DashboardStats {
    pub fn count(&self, status: ApplicationStatus) -> u64 {
        self.status_counts
            .get(status.label())
            .copied()
            .unwrap_or(0)
    }
}

/// The logged-in student's submitted application
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl ApplicationRecord {
    /// Review status; a record without one is still pending
    pub fn status(&self) -> ApplicationStatus {
        self.status
            .as_deref()
            .map(ApplicationStatus::parse)
            .unwrap_or_default()
    }

    /// A scalar field rendered as text
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A binary part of the multipart submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
}

/// Everything the submission endpoint receives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub text_parts: Vec<(String, String)>,
    pub file_parts: Vec<FilePart>,
}

impl SubmissionPayload {
    pub fn len(&self) -> usize {
        self.text_parts.len() + self.file_parts.len()
    }
}

#[cfg(test)]
impl SubmissionPayload {
    pub fn contains(&self, name: &str) -> bool {
        self.text_parts.iter().any(|(n, _)| n == name)
            || self.file_parts.iter().any(|p| p.name == name)
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.text_parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Numbers arrive as JSON numbers, numeric strings, "" or null
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.to_string().parse().ok(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
