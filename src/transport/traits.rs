//! Transport trait and request/response shapes

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ApiError, Result};

/// Multipart field name expected by the upload endpoints.
pub const MULTIPART_FIELD: &str = "file";

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Request payload variants the API consumes
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// JSON object with `Content-Type: application/json`
    Json(serde_json::Value),
    /// URL-encoded form fields (the login endpoint)
    Form(Vec<(String, String)>),
    /// Single file part under [`MULTIPART_FIELD`], sent as octet-stream
    Multipart { filename: String, bytes: Vec<u8> },
}

/// Complete wire intent for one request: everything except the base URL,
/// percent-encoding, and the bearer header, which the adapter supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path rooted at the server origin, `/api/...`
    pub path: String,
    /// Raw (unencoded) query pairs; empty means no query string at all
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestDescriptor {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Replaces the query pairs wholesale (filter output goes here).
    pub fn with_query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Serializes `body` as the JSON payload. Fails before any network
    /// activity when the value cannot be encoded.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("could not encode request body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn with_form(mut self, fields: &[(&str, &str)]) -> Self {
        self.body = RequestBody::Form(
            fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        );
        self
    }

    pub fn with_multipart(mut self, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::Multipart { filename: filename.into(), bytes };
        self
    }
}

/// Whatever came back over the wire, untouched
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The per-platform HTTP primitive.
///
/// Implementations perform exactly one exchange per call: build the URL from
/// their configured origin plus the descriptor, attach
/// `Authorization: Bearer <token>` when a bearer is supplied, and return the
/// status and body as-is. A request that produces no response at all maps to
/// [`ApiError::Transport`]; status codes are never interpreted here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<RawResponse>;
}
