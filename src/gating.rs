//! Entry-token gate.
//!
//! Visitors arrive from the originating site with `?token=...` in the URL.
//! Only the token's presence is checked here; the originating site owns its
//! validity. A missing token stops the request before any content is produced.

use axum::{body::Body, extract::Request, middleware::Next, response::IntoResponse, response::Response};
use serde::Deserialize;

use crate::error::{GaiaError, Result};

/// Opaque entry token, also used as the session key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

#[derive(Deserialize)]
struct EntryQuery {
    token: Option<String>,
}

impl AccessToken {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GaiaError::AccessDenied);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Pull the token out of a raw query string.
    pub fn from_query(query: Option<&str>) -> Result<Self> {
        let query = query.ok_or(GaiaError::AccessDenied)?;
        let parsed: EntryQuery = serde_qs::from_str(query).map_err(|e| {
            tracing::debug!("Unparseable entry query: {}", e);
            GaiaError::AccessDenied
        })?;
        parsed
            .token
            .as_deref()
            .map(Self::new)
            .unwrap_or(Err(GaiaError::AccessDenied))
    }
}

/// Middleware: reject requests without an entry token, otherwise expose the
/// token to handlers as a request extension. `/health` is exempt.
pub async fn require_token(mut req: Request<Body>, next: Next) -> Response {
    if req.uri().path() == "/health" {
        return next.run(req).await;
    }
    match AccessToken::from_query(req.uri().query()) {
        Ok(token) => {
            req.extensions_mut().insert(token);
            next.run(req).await
        }
        Err(e) => {
            tracing::info!("Rejected request to {} without entry token", req.uri().path());
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_present() {
        let t = AccessToken::from_query(Some("token=abc123&page=news")).unwrap();
        assert_eq!(t, AccessToken::new("abc123").unwrap());
    }

    #[test]
    fn test_token_missing_or_blank_is_denied() {
        for query in [None, Some(""), Some("page=news"), Some("token="), Some("token=%20")] {
            assert!(
                matches!(AccessToken::from_query(query), Err(GaiaError::AccessDenied)),
                "query {query:?} should be denied"
            );
        }
    }

    #[test]
    fn test_token_is_percent_decoded() {
        let t = AccessToken::from_query(Some("token=a%2Bb")).unwrap();
        assert_eq!(t, AccessToken::new("a+b").unwrap());
    }
}
