//! Trait abstraction for the portal client to enable mocking in tests

use super::error::ApiError;
use super::models::{
    ApplicationRecord, ApplicationStatus, DashboardStats, LoginResponse, RecordId, Role,
    Student, StudentInput, SubmissionPayload,
};
use async_trait::async_trait;

/// Operations of the admissions backend used by the app
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Bearer token sent with every request; `None` stops sending it
    fn set_token(&mut self, token: Option<String>);

    /// Exchange credentials for a session
    async fn login(&self, email: &str, password: &str, role: Role)
        -> Result<LoginResponse, ApiError>;

    /// Register a new student account
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    /// Send the complete application as one multipart POST
    async fn submit_application(&self, payload: &SubmissionPayload) -> Result<(), ApiError>;

    /// The logged-in student's application; `None` when nothing was submitted yet
    async fn get_my_application(&self) -> Result<Option<ApplicationRecord>, ApiError>;

    async fn list_students(&self) -> Result<Vec<Student>, ApiError>;

    async fn create_student(&self, input: &StudentInput) -> Result<(), ApiError>;

    async fn update_student(&self, id: &RecordId, input: &StudentInput) -> Result<(), ApiError>;

    async fn update_student_status(
        &self,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<(), ApiError>;

    async fn delete_student(&self, id: &RecordId) -> Result<(), ApiError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}
