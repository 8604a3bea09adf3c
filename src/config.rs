//! Client configuration

/// Configuration for a SwapSpec API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server, without the `/api` prefix
    /// (e.g. `http://localhost:8000`)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Config pointing at the given server, everything else default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
