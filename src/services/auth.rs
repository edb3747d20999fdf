use http::Method;

use crate::{
    client::AttendanceClient,
    error::{ApiError, Result},
    models::responses::{LoginBody, Message, RegisterBody},
    models::user::{Credentials, Registration},
};

const HEALTH_PATH: &str = "/api/";
const REGISTER_PATH: &str = "/api/auth/register/";
const LOGIN_PATH: &str = "/api/auth/login/";

impl AttendanceClient {
    /// Checks that the API is reachable. Does not need a session.
    pub async fn test_connection(&self) -> Result<Message> {
        let url = self.endpoint(HEALTH_PATH)?;
        let message: Message = self.call(Method::GET, url).await?;
        tracing::info!("✅ API reachable: {}", message.message);
        Ok(message)
    }

    /// Creates an account. The session is left as it was.
    pub async fn register(&self, registration: &Registration) -> Result<RegisterBody> {
        tracing::info!("📝 Register attempt for {}", registration.email);
        let url = self.endpoint(REGISTER_PATH)?;
        let body: RegisterBody = self.call_json(Method::POST, url, registration).await?;
        tracing::info!("✅ User registered: {}", registration.email);
        Ok(body)
    }

    /// Logs in and stores the issued token in the session.
    ///
    /// # Arguments
    ///
    /// * `credentials` - The email and password to log in with.
    ///
    /// # Returns
    ///
    /// The login body, including the user whose `role` decides the caller's
    /// landing screen (see `LoginBody::landing`). A successful response
    /// without a token is reported as an application error and leaves the
    /// session untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginBody> {
        tracing::info!("🔐 Login attempt for {}", credentials.email);
        let url = self.endpoint(LOGIN_PATH)?;
        let body: LoginBody = self.call_json(Method::POST, url, credentials).await?;

        let Some(token) = body.token.as_deref().filter(|token| !token.is_empty()) else {
            tracing::error!("❌ Login for {} succeeded without a token", credentials.email);
            return Err(ApiError::Application("Token not received".to_string()));
        };
        self.session().save_token_async(token.to_string()).await;

        tracing::info!(
            "✅ Logged in: {}",
            body.user
                .as_ref()
                .map(|user| user.display_name.as_str())
                .unwrap_or(credentials.email.as_str())
        );
        Ok(body)
    }

    /// Ends the local session. The server is not contacted.
    pub async fn logout(&self) {
        self.session().clear_token_async().await;
        tracing::info!("👋 Logged out");
    }
}
