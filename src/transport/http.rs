//! Reqwest-backed transport adapter

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::traits::{
    HttpTransport, Method, RawResponse, RequestBody, RequestDescriptor, MULTIPART_FIELD,
};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// [`HttpTransport`] over a shared [`reqwest::Client`].
///
/// This is the adapter every host with a real socket uses; tests use
/// [`MockTransport`](super::MockTransport) instead.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Builds the adapter with the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, request: &RequestDescriptor) -> String {
        build_url(&self.base_url, &request.path, &request.query)
    }
}

/// Joins origin, path, and percent-encoded query pairs. No pairs, no `?`.
fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{base_url}{path}");
    if !query.is_empty() {
        let params: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<RawResponse> {
        let url = self.url_for(request);
        debug!(method = request.method.as_str(), %url, "dispatching request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart { filename, bytes } => {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.clone())
                    .mime_str("application/octet-stream")
                    .map_err(|e| ApiError::Transport(format!("invalid upload part: {e}")))?;
                builder.multipart(reqwest::multipart::Form::new().part(MULTIPART_FIELD, part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("could not read response body: {e}")))?
            .to_vec();

        Ok(RawResponse::new(status, body))
    }
}
