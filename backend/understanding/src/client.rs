//! Analysis client: sends the selected image to the remote service.
//!
//! One POST per call with a multipart `file` part. No retries; the user
//! re-presses the button.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use vizassist_core::{AssistError, ImageHandle, Operation, Result};

use crate::response::normalize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Returned when the service answered successfully but with nothing usable.
pub const NO_RESULT_TEXT: &str = "No result.";

/// The remote analysis capability as the workflow sees it.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Run `operation` on `image` and return normalized display text.
    async fn analyze(&self, operation: Operation, image: &ImageHandle) -> Result<String>;
}

pub struct AnalysisClient {
    base_url: String,
    no_result: String,
    client: Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct HealthBody {
    message: String,
}

impl AnalysisClient {
    /// Build a client for `base_url`. `timeout` bounds each whole request.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AssistError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            no_result: NO_RESULT_TEXT.to_string(),
            client,
        })
    }

    /// Replace the fixed no-result text (e.g. with a localized one).
    pub fn with_no_result_text(mut self, text: impl Into<String>) -> Self {
        self.no_result = text.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /`, returning the service's greeting message.
    pub async fn health(&self) -> Result<String> {
        let resp = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(network_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AssistError::service(
                Some(status.as_u16()),
                "health check failed",
            ));
        }
        let body: HealthBody = resp
            .json()
            .await
            .map_err(|e| AssistError::service(Some(status.as_u16()), e.to_string()))?;
        Ok(body.message)
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn analyze(&self, operation: Operation, image: &ImageHandle) -> Result<String> {
        let url = self.url(operation.endpoint());
        info!(operation = %operation, url = %url, bytes = image.len(), "Sending analysis request");

        let part = Part::bytes(image.data.to_vec())
            .file_name(image.name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| AssistError::InvalidImage(format!("bad MIME type {}: {e}", image.mime_type)))?;
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(network_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            warn!(operation = %operation, status = status.as_u16(), message = %message, "Analysis service returned an error");
            return Err(AssistError::service(Some(status.as_u16()), message));
        }

        let text = normalize(operation, &body)?.unwrap_or_else(|| {
            debug!(operation = %operation, "Response carried no result");
            self.no_result.clone()
        });
        info!(operation = %operation, chars = text.len(), "Analysis completed");
        Ok(text)
    }
}

fn network_error(e: reqwest::Error) -> AssistError {
    if e.is_timeout() {
        AssistError::Network(format!("request timed out: {e}"))
    } else {
        AssistError::Network(e.to_string())
    }
}
