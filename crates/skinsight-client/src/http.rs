//! HTTP client for the classification service's REST endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use skinsight_core::{ClassificationResult, ErrorBody, Health};
use tracing::{debug, info};

use crate::backend::ClassifierBackend;
use crate::error::ClientError;
use crate::upload::ImageUpload;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PING_CONTEXT: &str = "could not connect to the server";
const CLASSIFY_CONTEXT: &str = "could not send the image to the server";
const HISTORY_CONTEXT: &str = "could not get the previous classifications";
const IMAGE_CONTEXT: &str = "could not download the classified image";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for the classification service.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the given configuration.
    ///
    /// A trailing slash on `base_url` is dropped so paths join cleanly.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ClientError::Http {
                context: "could not build HTTP client",
                source,
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a result's stored image.
    pub fn image_url(&self, result: &ClassificationResult) -> String {
        join_url(&self.base_url, &result.image_url)
    }

    /// Health check. Returns the service's greeting message.
    pub async fn ping(&self) -> Result<String, ClientError> {
        let url = format!("{}/", self.base_url);
        debug!(url = %url, "pinging classification service");
        let health: Health = self.get_json(&url, PING_CONTEXT).await?;
        Ok(health.message)
    }

    /// Submit an image for classification.
    ///
    /// The form carries the image under `file` and its name under `filename`.
    pub async fn classify_image(
        &self,
        upload: &ImageUpload,
    ) -> Result<ClassificationResult, ClientError> {
        let url = format!("{}/classify-image", self.base_url);
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime())
            .map_err(|source| ClientError::Http {
                context: CLASSIFY_CONTEXT,
                source,
            })?;
        let form = Form::new()
            .part("file", part)
            .text("filename", upload.file_name.clone());

        info!(url = %url, file = %upload.file_name, bytes = upload.size(), "submitting image");
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                context: CLASSIFY_CONTEXT,
                source,
            })?;

        let result: ClassificationResult = read_json(resp, CLASSIFY_CONTEXT).await?;
        info!(
            class_idx = result.class_idx,
            label = result.predicted_label(),
            "classification received"
        );
        Ok(result)
    }

    /// Fetch every classification the service has made, oldest first.
    pub async fn previous_classifications(
        &self,
    ) -> Result<Vec<ClassificationResult>, ClientError> {
        let url = format!("{}/previous-classifications", self.base_url);
        let history: Vec<ClassificationResult> = self.get_json(&url, HISTORY_CONTEXT).await?;
        debug!(count = history.len(), "fetched previous classifications");
        Ok(history)
    }

    /// Download the stored image behind a result.
    pub async fn fetch_image(&self, result: &ClassificationResult) -> Result<Vec<u8>, ClientError> {
        let url = self.image_url(result);
        debug!(url = %url, "downloading classified image");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                context: IMAGE_CONTEXT,
                source,
            })?;
        let resp = check_status(resp, IMAGE_CONTEXT).await?;
        let bytes = resp.bytes().await.map_err(|source| ClientError::Http {
            context: IMAGE_CONTEXT,
            source,
        })?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &'static str,
    ) -> Result<T, ClientError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Http { context, source })?;
        read_json(resp, context).await
    }
}

#[async_trait]
impl ClassifierBackend for BackendClient {
    async fn ping(&self) -> Result<String, ClientError> {
        BackendClient::ping(self).await
    }

    async fn classify(&self, upload: &ImageUpload) -> Result<ClassificationResult, ClientError> {
        self.classify_image(upload).await
    }

    async fn previous_classifications(&self) -> Result<Vec<ClassificationResult>, ClientError> {
        BackendClient::previous_classifications(self).await
    }

    async fn fetch_image(&self, result: &ClassificationResult) -> Result<Vec<u8>, ClientError> {
        BackendClient::fetch_image(self, result).await
    }
}

async fn check_status(
    resp: reqwest::Response,
    context: &'static str,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Server {
        context,
        status: status.as_u16(),
        message: server_message(&body),
    })
}

async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    context: &'static str,
) -> Result<T, ClientError> {
    let resp = check_status(resp, context).await?;
    let body = resp
        .text()
        .await
        .map_err(|source| ClientError::Http { context, source })?;
    serde_json::from_str(&body).map_err(|source| ClientError::Json { context, source })
}

/// The service reports failures as `{"error": "..."}`; fall back to the raw body.
fn server_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(envelope) => envelope.error,
        Err(_) => body.trim().to_string(),
    }
}

/// Join the service base URL and a server-relative path. Absolute URLs pass
/// through unchanged.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
