//! HTTP client for the admissions backend

mod client;
mod error;
mod models;
mod traits;

pub use client::{PortalClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use models::{
    ApplicationRecord, ApplicationStatus, DashboardStats, FilePart, RecordId, Role, Student,
    StudentInput, SubmissionPayload, UserRecord,
};
pub use traits::PortalApi;

#[cfg(test)]
pub use models::LoginResponse;
#[cfg(test)]
pub use traits::MockPortalApi;
