//! Typed client for the job-marketplace REST backend and the text extraction service.

use portal_core::error::AppError;
use portal_core::observability::{TracedClientExt, TracedRequest};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::BackendSettings;
use crate::models::{
    AdminStats, Application, ApplicationStatus, ExtractedJob, JobFile, JobOffer, Listing,
    LoginRequest, RegisterRequest, User,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend refused the request itself (4xx), as opposed to failing.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_client_error())
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
                AppError::NotFound(anyhow::Error::new(err))
            }
            ApiError::Status { status, .. } if status.is_client_error() => {
                AppError::BadRequest(anyhow::Error::new(err))
            }
            _ => AppError::BadGateway(err.to_string()),
        }
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    extractor_url: String,
}

impl ApiClient {
    pub fn new(settings: &BackendSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
            extractor_url: settings.extractor_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Auth

    /// Raw login answer. Whether it carries an identity is decided by the caller.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Value, ApiError> {
        let url = self.url("/auth/login");
        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        let request = self.client.traced_post(&url).json(&body);
        lenient_json(send(&url, request).await?).await
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<Value, ApiError> {
        let url = self.url("/auth/register");
        let body = json!({
            "name": registration.name,
            "email": registration.email,
            "password": registration.password.expose_secret(),
            "role": registration.role,
        });
        let request = self.client.traced_post(&url).json(&body);
        lenient_json(send(&url, request).await?).await
    }

    // Administration

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.url("/auth/users");
        let request = self.client.traced_get(&url);
        decode::<Listing<User>>(&url, send(&url, request).await?)
            .await
            .map(Listing::into_items)
    }

    pub async fn set_user_active(&self, user_id: i64, active: bool) -> Result<User, ApiError> {
        let url = self.url(&format!("/auth/users/{}/activate", user_id));
        let request = self.client.traced_put(&url).query(&[("active", active)]);
        decode(&url, send(&url, request).await?).await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let url = self.url("/admin/stats");
        let request = self.client.traced_get(&url);
        decode(&url, send(&url, request).await?).await
    }

    // Job offers

    pub async fn list_job_offers(&self) -> Result<Vec<JobOffer>, ApiError> {
        self.job_offer_listing("/api/job-offers").await
    }

    pub async fn job_offers_by_offerer(&self, offerer_id: i64) -> Result<Vec<JobOffer>, ApiError> {
        self.job_offer_listing(&format!("/api/job-offers/offerer/{}", offerer_id))
            .await
    }

    async fn job_offer_listing(&self, path: &str) -> Result<Vec<JobOffer>, ApiError> {
        let url = self.url(path);
        let request = self.client.traced_get(&url);
        decode::<Listing<JobOffer>>(&url, send(&url, request).await?)
            .await
            .map(Listing::into_items)
    }

    pub async fn job_offer(&self, id: i64) -> Result<JobOffer, ApiError> {
        let url = self.url(&format!("/api/job-offers/{}", id));
        let request = self.client.traced_get(&url);
        decode(&url, send(&url, request).await?).await
    }

    pub async fn create_job_offer(
        &self,
        offerer_id: i64,
        title: &str,
        company: &str,
        description: &str,
    ) -> Result<JobOffer, ApiError> {
        let url = self.url("/api/job-offers");
        let offerer_id = offerer_id.to_string();
        let request = self.client.traced_post(&url).form(&[
            ("offererId", offerer_id.as_str()),
            ("title", title),
            ("company", company),
            ("description", description),
        ]);
        decode(&url, send(&url, request).await?).await
    }

    /// Multipart upload of a job description document; the new offer starts active.
    pub async fn upload_job_offer(
        &self,
        offerer_id: i64,
        file: JobFile,
    ) -> Result<JobOffer, ApiError> {
        let url = self.url("/api/job-offers/upload");

        let part = Part::bytes(file.data).file_name(file.file_name);
        let part = match file.content_type.as_deref() {
            Some(content_type) => part.mime_str(content_type).map_err(|source| {
                ApiError::Transport {
                    url: url.clone(),
                    source,
                }
            })?,
            None => part,
        };
        let form = Form::new()
            .text("offererId", offerer_id.to_string())
            .text("title", file.title)
            .text("isActive", "true")
            .part("file", part);

        let request = self.client.traced_post(&url).multipart(form);
        decode(&url, send(&url, request).await?).await
    }

    pub async fn set_job_offer_active(&self, id: i64, active: bool) -> Result<JobOffer, ApiError> {
        let url = self.url(&format!("/api/job-offers/{}/status", id));
        let request = self
            .client
            .traced_put(&url)
            .json(&json!({ "isActive": active }));
        decode(&url, send(&url, request).await?).await
    }

    pub async fn delete_job_offer(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/job-offers/{}", id));
        let request = self.client.traced_delete(&url);
        send(&url, request).await?;
        Ok(())
    }

    // Applications

    pub async fn apply(&self, seeker_id: i64, job_offer_id: i64) -> Result<Application, ApiError> {
        let url = self.url("/api/applications/apply");
        let request = self
            .client
            .traced_post(&url)
            .query(&[("seekerId", seeker_id), ("jobOfferId", job_offer_id)]);
        decode(&url, send(&url, request).await?).await
    }

    pub async fn applications_by_seeker(&self, seeker_id: i64) -> Result<Vec<Application>, ApiError> {
        self.application_listing(&format!("/api/applications/seeker/{}", seeker_id))
            .await
    }

    pub async fn applications_by_offerer(
        &self,
        offerer_id: i64,
    ) -> Result<Vec<Application>, ApiError> {
        self.application_listing(&format!("/api/applications/offerer/{}", offerer_id))
            .await
    }

    async fn application_listing(&self, path: &str) -> Result<Vec<Application>, ApiError> {
        let url = self.url(path);
        let request = self.client.traced_get(&url);
        decode::<Listing<Application>>(&url, send(&url, request).await?)
            .await
            .map(Listing::into_items)
    }

    pub async fn set_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Application, ApiError> {
        let url = self.url(&format!("/api/applications/{}/status", id));
        let request = self
            .client
            .traced_put(&url)
            .query(&[("status", status.as_str())]);
        decode(&url, send(&url, request).await?).await
    }

    // Extraction

    pub async fn extract_text(&self, text: &str) -> Result<ExtractedJob, ApiError> {
        let url = format!("{}/api/extract", self.extractor_url);
        let request = self.client.traced_post(&url).json(&json!({ "text": text }));
        decode(&url, send(&url, request).await?).await
    }
}

async fn send(url: &str, request: TracedRequest) -> Result<reqwest::Response, ApiError> {
    let response = request.send().await.map_err(|source| {
        tracing::error!(url = %url, error = %source, "Backend request failed");
        ApiError::Transport {
            url: url.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        tracing::error!(url = %url, status = %status, "Backend returned an error");
    } else {
        tracing::warn!(url = %url, status = %status, "Backend rejected request");
    }
    Err(ApiError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

async fn read_body(url: &str, response: reqwest::Response) -> Result<String, ApiError> {
    response.text().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })
}

async fn decode<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T, ApiError> {
    let body = read_body(url, response).await?;
    serde_json::from_str(&body).map_err(|source| {
        tracing::error!(url = %url, error = %source, "Unexpected response shape");
        ApiError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

/// A body that is not JSON reads as `Value::Null`.
async fn lenient_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let url = response.url().to_string();
    let body = read_body(&url, response).await?;
    Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
}
