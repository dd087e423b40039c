//! REST client for the admissions backend
//!
//! One `reqwest::Client` is kept for the life of the process so the cookie
//! session set by the login endpoint is replayed on later calls.

use super::error::ApiError;
use super::models::{
    ApplicationRecord, ApplicationStatus, DashboardStats, LoginRequest, LoginResponse, RecordId,
    Role, SignupRequest, StatusUpdate, Student, StudentInput, SubmissionPayload,
};
use super::traits::PortalApi;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Backend address used when neither the environment nor the config names one
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PortalClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .user_agent(concat!("admissions-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send and turn any non-2xx status into a classified error
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        tracing::debug!(status = status.as_u16(), kind = err.kind(), "request failed");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn build_form(payload: &SubmissionPayload) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in &payload.text_parts {
            form = form.text(name.clone(), value.clone());
        }
        for file in &payload.file_parts {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| ApiError::Attachment {
                    path: file.path.clone(),
                    source,
                })?;
            let part = Part::bytes(bytes)
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part(file.name.clone(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl PortalApi for PortalClient {
    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email,
            password,
            role,
        };
        self.send_json(self.http.post(self.url("/api/auth/login")).json(&body))
            .await
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = SignupRequest {
            name,
            email,
            password,
        };
        self.send(self.http.post(self.url("/api/auth/signup")).json(&body))
            .await?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.http.post(self.url("/api/auth/logout")))
            .await?;
        Ok(())
    }

    async fn submit_application(&self, payload: &SubmissionPayload) -> Result<(), ApiError> {
        let form = Self::build_form(payload).await?;
        tracing::info!(
            parts = payload.len(),
            files = payload.file_parts.len(),
            "submitting application"
        );
        self.send(self.http.post(self.url("/submit")).multipart(form))
            .await?;
        Ok(())
    }

    async fn get_my_application(&self) -> Result<Option<ApplicationRecord>, ApiError> {
        match self
            .send_json(self.http.get(self.url("/student/get-details")))
            .await
        {
            Ok(record) => Ok(Some(record)),
            Err(ApiError::Rejected { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.send_json(self.http.get(self.url("/admin/students")))
            .await
    }

    async fn create_student(&self, input: &StudentInput) -> Result<(), ApiError> {
        self.send(self.http.post(self.url("/admin/student")).json(input))
            .await?;
        Ok(())
    }

    async fn update_student(&self, id: &RecordId, input: &StudentInput) -> Result<(), ApiError> {
        let url = self.url(&format!("/admin/student/{}", id));
        self.send(self.http.put(url).json(input)).await?;
        Ok(())
    }

    async fn update_student_status(
        &self,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/admin/student/{}/status", id));
        self.send(self.http.put(url).json(&StatusUpdate { status }))
            .await?;
        Ok(())
    }

    async fn delete_student(&self, id: &RecordId) -> Result<(), ApiError> {
        let url = self.url(&format!("/admin/student/{}", id));
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.send_json(self.http.get(self.url("/admin/dashboard/stats")))
            .await
    }
}
