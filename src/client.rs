use http::{Method, StatusCode, header::CONTENT_TYPE};
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::Config,
    error::{ApiError, Result},
    middleware_layer::auth::authenticate,
    models::envelope::{self, Outcome},
    session::{FileTokenSlot, SessionStore},
};

/// Typed access to the attendance API.
///
/// Cheap to clone; clones share the connection pool and the session. Every
/// operation is an independent future: dropping it abandons the call without
/// touching the session.
#[derive(Clone, Debug)]
pub struct AttendanceClient {
    base_url: Url,
    http: reqwest::Client,
    session: SessionStore,
}

impl AttendanceClient {
    /// Creates a client that reads and writes its token through `session`.
    ///
    /// # Arguments
    ///
    /// * `config` - The client configuration.
    /// * `session` - The session store shared with the rest of the process.
    pub fn new(config: &Config, session: SessionStore) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        tracing::debug!("✅ HTTP client ready for {}", config.api_url);

        Ok(Self {
            base_url: config.api_url.clone(),
            http,
            session,
        })
    }

    /// Creates a client whose session comes from the configured token file,
    /// or lives in memory when none is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let session = match &config.token_file {
            Some(path) => SessionStore::init(FileTokenSlot::new(path)),
            None => SessionStore::in_memory(),
        };
        Self::new(config, session)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an absolute endpoint path against the configured origin.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Unknown(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// Resolves `path` and appends `segment` as one percent-encoded path
    /// segment.
    pub(crate) fn endpoint_with(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Unknown(format!("Base URL cannot have a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Sends a request without a body.
    pub(crate) async fn call<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T> {
        self.execute(method, url, None).await
    }

    /// Sends a request with a JSON body.
    pub(crate) async fn call_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T> {
        let body = sonic_rs::to_string(body)
            .map_err(|e| ApiError::Unknown(format!("Request serialization failed: {}", e)))?;
        self.execute(method, url, Some(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<T> {
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        let (request, sent_token) = authenticate(builder.build()?, &self.session)?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!("➡️ {} {}", method, path);

        let response = self.http.execute(request).await.map_err(|e| {
            let err = ApiError::from(e);
            tracing::warn!("❌ {} {} failed: {}", method, path, err);
            err
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            let err = ApiError::from(e);
            tracing::warn!("❌ {} {} body read failed: {}", method, path, err);
            err
        })?;
        tracing::debug!("⬅️ {} {} -> {}", method, path, status);

        if !status.is_success() {
            // Only the token this request carried is invalidated; a newer
            // one saved while it was in flight stays.
            if status == StatusCode::UNAUTHORIZED {
                if let Some(sent) = sent_token.as_deref() {
                    if self.session.clear_token_if(sent).await {
                        tracing::warn!("🔒 Session rejected by server, token cleared");
                    }
                }
            }
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::warn!("❌ {} {} returned {}: {}", method, path, status, body);
            return Err(ApiError::from_status(status, body));
        }

        match envelope::decode::<T>(&bytes) {
            Ok(Outcome::Ok(payload)) => Ok(payload),
            Ok(Outcome::SoftFail(message)) => {
                tracing::info!("⚠️ {} {} rejected: {}", method, path, message);
                Err(ApiError::Application(message))
            }
            Err(e) => {
                tracing::error!("❌ {} {} returned an undecodable body: {}", method, path, e);
                Err(ApiError::Unknown(format!("Invalid response body: {}", e)))
            }
        }
    }
}
