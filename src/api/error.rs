//! Classified failures of backend calls

use reqwest::StatusCode;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not reach the admissions service: {0}")]
    Network(String),

    #[error("The admissions service did not respond in time")]
    Timeout,

    #[error("Not authorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("The admissions service failed ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from the admissions service: {0}")]
    Decode(String),

    #[error("Could not read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Classify a non-success response from its status and body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && trimmed.len() <= 200).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
        let code = status.as_u16();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized {
                status: code,
                message,
            },
            s if s.is_client_error() => Self::Rejected {
                status: code,
                message,
            },
            _ => Self::Server {
                status: code,
                message,
            },
        }
    }

    /// Whether the server refused the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Short tag for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout => "timeout",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Rejected { .. } => "rejected",
            Self::Server { .. } => "server",
            Self::Decode(_) => "decode",
            Self::Attachment { .. } => "attachment",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
