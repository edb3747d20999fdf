use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

/// The production API origin.
pub const DEFAULT_API_URL: &str = "https://apiasistenciajava.codevalcanos.com";
/// Default connect and request deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// The client's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The origin every endpoint path is resolved against.
    pub api_url: Url,
    /// Deadline for establishing a connection.
    pub connect_timeout: Duration,
    /// Deadline for a whole request, from send to last body byte.
    pub request_timeout: Duration,
    /// Where to persist the session token, if anywhere.
    pub token_file: Option<PathBuf>,
    /// Whether to honor the `HTTP(S)_PROXY` environment variables.
    pub system_proxy: bool,
}

impl Config {
    /// Creates a `Config` with default deadlines for the given origin.
    pub fn with_api_url(api_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: Url::parse(api_url)
                .with_context(|| format!("Invalid API URL: {}", api_url))?,
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_file: None,
            system_proxy: true,
        })
    }

    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("ATTENDANCE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let mut config = Self::with_api_url(&api_url)?;
        config.connect_timeout = Duration::from_secs(
            env::var("ATTENDANCE_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .context("Invalid ATTENDANCE_CONNECT_TIMEOUT_SECS")?,
        );
        config.request_timeout = Duration::from_secs(
            env::var("ATTENDANCE_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .context("Invalid ATTENDANCE_REQUEST_TIMEOUT_SECS")?,
        );
        config.token_file = env::var("ATTENDANCE_TOKEN_FILE").ok().map(PathBuf::from);
        config.system_proxy = env::var("ATTENDANCE_SYSTEM_PROXY")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .context("Invalid ATTENDANCE_SYSTEM_PROXY")?;

        Ok(config)
    }
}
