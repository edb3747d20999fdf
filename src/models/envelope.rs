use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// Message used when a soft failure carries neither `error` nor `message`.
const DEFAULT_SOFT_FAILURE: &str = "The server rejected the request";

/// The `{success, body}` wrapper around every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub body: T,
}

/// What a decoded envelope turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    SoftFail(String),
}

/// The parts of a body that matter when deciding on a soft failure. A
/// failing envelope may carry an object, bare text, `null` or nothing at all.
#[derive(Deserialize)]
#[serde(untagged)]
enum FailureBody {
    Fields {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
struct FailureCheck {
    success: bool,
    #[serde(default)]
    body: Option<FailureBody>,
}

impl FailureCheck {
    /// The soft-failure message, or `None` when the envelope succeeded.
    fn failure(self) -> Option<String> {
        let (error, message) = match self.body {
            Some(FailureBody::Fields { error, message }) => (error, message),
            Some(FailureBody::Text(text)) => (None, Some(text)),
            Some(FailureBody::Other(_)) | None => (None, None),
        };
        if self.success && error.is_none() {
            return None;
        }
        Some(
            error
                .or(message)
                .unwrap_or_else(|| DEFAULT_SOFT_FAILURE.to_string()),
        )
    }
}

/// Decodes an envelope once.
///
/// `success: false`, or a body carrying `error`, is a soft failure whatever
/// the payload type; otherwise the body is decoded as `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Outcome<T>, sonic_rs::Error> {
    let check: FailureCheck = sonic_rs::from_slice(bytes)?;
    if let Some(message) = check.failure() {
        return Ok(Outcome::SoftFail(message));
    }

    let envelope: Envelope<T> = sonic_rs::from_slice(bytes)?;
    Ok(Outcome::Ok(envelope.body))
}
