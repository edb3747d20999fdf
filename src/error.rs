use std::error::Error as StdError;

use http::StatusCode;
use thiserror::Error;

/// Substrings that identify a host-resolution failure somewhere in the
/// transport error chain.
const DNS_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
    "nodename nor servname",
    "temporary failure in name resolution",
];

/// Phrases rustls and the platform verifiers use for certificate or handshake
/// failures. Anything vaguer is left to the `InvalidData` check.
const TLS_MARKERS: &[&str] = &[
    "invalid peer certificate",
    "certificate verify failed",
    "bad certificate",
    "unknownissuer",
    "certificate has expired",
    "tls handshake",
    "handshake failure",
    "received corrupt message",
];

/// The failure taxonomy every API call resolves to.
///
/// Callers branch on this and nothing else: transport problems, HTTP status
/// failures and envelope-level soft failures all end up here exactly once per
/// failed call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The host could not be resolved.
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// No response arrived within the configured deadline.
    #[error("Request timed out")]
    Timeout,

    /// Certificate or handshake failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A non-2xx response. The raw body is kept for diagnostics.
    #[error("HTTP error {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// A 2xx response whose envelope reported a logical error.
    #[error("Application error: {0}")]
    Application(String),

    /// Anything else.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A `Result` type that uses `ApiError` as the error type.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Builds the error for a non-2xx response.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` when the server rejected the call for missing or
    /// insufficient credentials (401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Http { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    /// A short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkUnreachable(_) => {
                "Cannot reach the server. Check your internet connection.".to_string()
            }
            ApiError::Timeout => {
                "The server is taking too long to respond. Try again later.".to_string()
            }
            ApiError::Tls(_) => "Security error: invalid certificate.".to_string(),
            ApiError::Http { status, body } => format!("Request failed: {} - {}", status.as_u16(), body),
            ApiError::Application(message) => message.clone(),
            ApiError::Unknown(message) => format!("Unexpected error: {}", message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        classify_transport(&err)
    }
}

/// Maps a transport failure onto the taxonomy.
///
/// reqwest only exposes coarse predicates, so the source chain is inspected
/// for I/O error kinds and the messages produced by the resolver and the TLS
/// layer.
pub fn classify_transport(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() || chain_has_io_kind(err, std::io::ErrorKind::TimedOut) {
        return ApiError::Timeout;
    }

    // The top-level message embeds the URL, so only the causes are matched.
    let messages = cause_messages(err);
    let detail = std::iter::once(err.to_string())
        .chain(messages.iter().cloned())
        .collect::<Vec<_>>()
        .join(": ");

    if messages.iter().any(|m| mentions(m, DNS_MARKERS)) {
        return ApiError::NetworkUnreachable(detail);
    }

    let is_https = err.url().is_some_and(|url| url.scheme() == "https");
    let tls_marked = messages.iter().any(|m| mentions(m, TLS_MARKERS));
    // rustls handshake failures surface as InvalidData I/O errors.
    let tls_io = is_https && err.is_connect() && chain_has_io_kind(err, std::io::ErrorKind::InvalidData);
    if tls_marked || tls_io {
        return ApiError::Tls(detail);
    }

    ApiError::Unknown(detail)
}

fn mentions(message: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| message.contains(marker))
}

fn cause_messages(err: &reqwest::Error) -> Vec<String> {
    let mut messages = Vec::new();
    let mut source = err.source();
    while let Some(current) = source {
        messages.push(current.to_string().to_lowercase());
        source = current.source();
    }
    messages
}

fn chain_has_io_kind(err: &reqwest::Error, kind: std::io::ErrorKind) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = source {
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            if io.kind() == kind {
                return true;
            }
        }
        source = current.source();
    }
    false
}
