//! Session extractor
//!
//! Pulls the session artifacts from request headers. Token decoding is the
//! upstream collaborator's job; by the time a request reaches us the user
//! id travels in `x-user-id` and the opaque access token in
//! `x-access-token`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::AppError;

const USER_ID_HEADER: &str = "x-user-id";
const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Raw session artifacts, not yet verified against the user record
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER)?;
        let access_token = header_value(parts, ACCESS_TOKEN_HEADER)?;
        Ok(Session {
            user_id,
            access_token,
        })
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<String, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(AppError::InvalidToken)
}
