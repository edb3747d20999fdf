use http::header::{AUTHORIZATION, HeaderValue};
use reqwest::Request;

use crate::{
    error::{ApiError, Result},
    session::SessionStore,
};

/// Attaches the session token to an outgoing request.
///
/// # Arguments
///
/// * `request` - The request about to be sent.
/// * `session` - The session store to read the token from.
///
/// # Returns
///
/// The request with `Authorization: <token>` set verbatim when a token is
/// present, or the request untouched when there is none, together with the
/// token that was attached. The session is read exactly once.
pub fn authenticate(
    mut request: Request,
    session: &SessionStore,
) -> Result<(Request, Option<String>)> {
    let Some(token) = session.token() else {
        tracing::debug!("🔓 No session token for {}", request.url().path());
        return Ok((request, None));
    };

    let mut value = HeaderValue::from_str(&token).map_err(|e| {
        tracing::error!("❌ Session token is not a valid header value: {}", e);
        ApiError::Unknown(format!("Invalid session token: {}", e))
    })?;
    value.set_sensitive(true);

    request.headers_mut().insert(AUTHORIZATION, value);
    tracing::debug!("🔐 Authorization attached for {}", request.url().path());

    Ok((request, Some(token)))
}
