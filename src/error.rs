/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// Network or request execution error from `reqwest` (DNS, refused
    /// connection, timeout, interrupted body).
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// 5xx status, or any status outside the success and client ranges.
    #[error("server error {status} {reason}")]
    Server {
        status: u16,
        reason: String,
        body: String,
    },
    /// 4xx status. Never retried.
    #[error("client error {status} {reason}")]
    Client {
        status: u16,
        reason: String,
        body: String,
    },
    /// Successful response whose body is not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Rejected backoff or client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StatusError {
    /// Returns `true` when another attempt may still succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server { .. })
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::Decode(_) | Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StatusError;

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        let server = StatusError::Server {
            status: 503,
            reason: "Service Unavailable".to_owned(),
            body: String::new(),
        };
        let client = StatusError::Client {
            status: 404,
            reason: "Not Found".to_owned(),
            body: String::new(),
        };

        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(!StatusError::Decode("eof".to_owned()).is_retryable());
        assert_eq!(server.status(), Some(503));
        assert_eq!(client.status(), Some(404));
    }

    #[test]
    fn display_names_status_and_reason() {
        let err = StatusError::Client {
            status: 404,
            reason: "Not Found".to_owned(),
            body: "{}".to_owned(),
        };
        assert_eq!(err.to_string(), "client error 404 Not Found");
    }
}
