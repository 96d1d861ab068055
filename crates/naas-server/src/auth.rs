use axum::http::HeaderMap;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};

use naas_core::Credentials;

use crate::error::ApiError;

/// Extract HTTP Basic credentials, requiring non-empty username and
/// password per the admission front-end's step 1.
pub fn require_basic_auth(headers: &HeaderMap) -> Result<Credentials, ApiError> {
    let auth: Authorization<Basic> = headers.typed_get().ok_or(ApiError::NoAuth)?;
    let username = auth.username().to_string();
    let password = auth.password().to_string();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::NoAuth);
    }
    Ok(Credentials::new(username, password))
}
