use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Body of `GET /api/status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    pub version: String,
}

/// A response the executor accepted as successful (status in `200..400`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// One logical JSON GET.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSpec {
    pub url: String,
    /// Overrides [`ClientOptions::timeout_ms`](crate::ClientOptions) per attempt.
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
