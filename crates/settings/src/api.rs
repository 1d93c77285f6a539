//! Persistence API used by the settings synchronizer.
//!
//! [`SettingsApi`] is the seam; [`HttpSettingsApi`] implements it against the
//! Luminar REST endpoints using [`reqwest`].

use std::future::Future;

use luminar_core::project::{ProjectPatch, ProjectSettings};
use luminar_core::project_config::{ProjectConfigPatch, ProjectConfigSettings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors from the persistence API layer.
///
/// `Display` yields the bare message so it can be shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an `error` field or a non-2xx status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message taken from the `error` field.
        message: String,
    },

    /// A 2xx body that did not match the expected record shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The configured base URL cannot carry the endpoint path.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// The read and partial-update endpoints for one project's settings.
pub trait SettingsApi: Send + Sync {
    fn fetch_project(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<ProjectSettings, ApiError>> + Send;

    fn fetch_project_config(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<ProjectConfigSettings, ApiError>> + Send;

    fn patch_project(
        &self,
        slug: &str,
        patch: &ProjectPatch,
    ) -> impl Future<Output = Result<ProjectSettings, ApiError>> + Send;

    fn patch_project_config(
        &self,
        slug: &str,
        patch: &ProjectConfigPatch,
    ) -> impl Future<Output = Result<ProjectConfigSettings, ApiError>> + Send;
}

// ---------------------------------------------------------------------------
// Error body parsing
// ---------------------------------------------------------------------------

/// The `error` field comes either as a bare message or as
/// `{ "message": .., "status": .. }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Message(String),
    Detailed { message: String, status: Option<u16> },
}

/// Turn a response body into a record, or into [`ApiError::Rejected`] when
/// it carries an `error` field or the status is not a success.
pub(crate) fn parse_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) if !(200..300).contains(&status) => {
            return Err(ApiError::Rejected {
                status,
                message: body.to_string(),
            })
        }
        Err(e) => return Err(ApiError::Decode(e.to_string())),
    };

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let (message, detailed_status) = match serde_json::from_value::<ErrorField>(error.clone()) {
            Ok(ErrorField::Message(message)) => (message, None),
            Ok(ErrorField::Detailed { message, status }) => (message, status),
            Err(_) => (error.to_string(), None),
        };
        return Err(ApiError::Rejected {
            status: detailed_status.unwrap_or(status),
            message,
        });
    }

    if !(200..300).contains(&status) {
        return Err(ApiError::Rejected {
            status,
            message: format!("Request failed with status {status}"),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// HttpSettingsApi
// ---------------------------------------------------------------------------

/// HTTP client for the Luminar settings endpoints.
pub struct HttpSettingsApi {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpSettingsApi {
    /// * `base_url` - Server origin, e.g. `https://app.luminar.so`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// `{base}/api/v1/projects/{slug}[/{tail}]`, with the slug encoded as a
    /// single path segment.
    fn endpoint(&self, slug: &str, tail: Option<&str>) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v1", "projects", slug])
            .extend(tail);
        Ok(url)
    }

    fn project_url(&self, slug: &str) -> Result<reqwest::Url, ApiError> {
        self.endpoint(slug, None)
    }

    fn config_url(&self, slug: &str) -> Result<reqwest::Url, ApiError> {
        self.endpoint(slug, Some("config"))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: reqwest::Url) -> Result<T, ApiError> {
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::read(response).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: reqwest::Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(self.client.patch(url))
            .json(body)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_body(status, &body)
    }
}

impl SettingsApi for HttpSettingsApi {
    async fn fetch_project(&self, slug: &str) -> Result<ProjectSettings, ApiError> {
        self.get(self.project_url(slug)?).await
    }

    async fn fetch_project_config(&self, slug: &str) -> Result<ProjectConfigSettings, ApiError> {
        self.get(self.config_url(slug)?).await
    }

    async fn patch_project(
        &self,
        slug: &str,
        patch: &ProjectPatch,
    ) -> Result<ProjectSettings, ApiError> {
        self.patch(self.project_url(slug)?, patch).await
    }

    async fn patch_project_config(
        &self,
        slug: &str,
        patch: &ProjectConfigPatch,
    ) -> Result<ProjectConfigSettings, ApiError> {
        self.patch(self.config_url(slug)?, patch).await
    }
}
