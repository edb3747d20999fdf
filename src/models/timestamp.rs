use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A wire timestamp (`yyyy-MM-ddTHH:mm:ss.SSSZ`).
///
/// The raw text is always kept so that re-encoding is byte-identical. A value
/// that does not parse still decodes; `as_datetime` then returns `None` and
/// the caller decides how to display it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Timestamp {
    raw: String,
    parsed: Option<DateTime<Utc>>,
}

impl Timestamp {
    /// Parses a wire value, keeping it verbatim if it is not a valid
    /// ISO-8601 instant.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = match DateTime::parse_from_rfc3339(&raw) {
            Ok(value) => Some(value.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!("⚠️ Unparseable timestamp {:?}: {}", raw, e);
                None
            }
        };
        Self { raw, parsed }
    }

    /// The current instant, truncated to millisecond precision.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.parsed
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Formats the instant with `fmt`, or returns `placeholder` when the
    /// wire value could not be parsed.
    pub fn display_or(&self, fmt: &str, placeholder: &str) -> String {
        match self.parsed {
            Some(value) => value.format(fmt).to_string(),
            None => placeholder.to_string(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::parse(value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.raw
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
