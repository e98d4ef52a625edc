use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::ApiError;

/// Caller identity taken from the HTTP Basic auth header. Games are keyed by
/// this username; no password check happens here.
#[derive(Debug, Clone)]
pub struct Player {
    pub username: String,
}

impl<S> FromRequestParts<S> for Player
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let username = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_basic_username);

        async move {
            let username =
                username.ok_or_else(|| ApiError::unauthorized("Basic authentication required"))?;
            Ok(Player { username })
        }
    }
}

/// Pull the username out of a `Basic <base64(user:password)>` header value.
fn parse_basic_username(header_value: &str) -> Option<String> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (username, _password) = credentials.split_once(':')?;
    if username.is_empty() {
        return None;
    }
    Some(username.to_string())
}
