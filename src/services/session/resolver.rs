//! Session resolution against the external identity provider.
//!
//! The provider issues an RS256 session JWT; browsers carry it in the
//! `__session` cookie, API clients in `Authorization: Bearer`. We verify
//! signature, issuer, audience and expiry against the provider's published
//! public key.
//!
//! Contract: `resolve` returns [`Identity::Anonymous`] on *any* failure
//! (missing token, bad signature, expired, empty subject). It never returns
//! an error, so callers cannot accidentally fail open by mishandling one.

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

const SESSION_COOKIE: &str = "__session";

/// The caller as the identity provider sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    /// The provider's opaque subject identifier. Issued and owned entirely
    /// by the provider; never parsed or interpreted here.
    User(String),
}

pub trait SessionResolver: Send + Sync + 'static {
    fn resolve(&self, headers: &HeaderMap) -> Identity;
}

#[derive(Debug, Clone, Deserialize)]
struct SessionClaims {
    sub: String,
}

/// Production resolver: verify the provider's session JWT locally.
#[derive(Clone)]
pub struct JwtSessionResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtSessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtSessionResolver")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtSessionResolver {
    pub fn new(
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

impl SessionResolver for JwtSessionResolver {
    fn resolve(&self, headers: &HeaderMap) -> Identity {
        let Some(token) = session_token(headers) else {
            return Identity::Anonymous;
        };

        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Identity::User(data.claims.sub),
            Ok(_) => Identity::Anonymous,
            Err(err) => {
                tracing::debug!(error = ?err, "session token rejected");
                Identity::Anonymous
            }
        }
    }
}

/// Pull the raw session token out of the request headers.
///
/// Cookie wins over the Authorization header, matching the provider's own
/// SDK behavior for browser traffic.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookies.split(';') {
            if let Some(value) = pair.trim().strip_prefix(SESSION_COOKIE)
                && let Some(value) = value.strip_prefix('=')
                && !value.is_empty()
            {
                return Some(value);
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn token_from_session_cookie() {
        let headers = headers_with(header::COOKIE, "theme=dark; __session=tok123; lang=en");
        assert_eq!(session_token(&headers), Some("tok123"));
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let headers = headers_with(header::COOKIE, "__session_old=tok123");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn token_from_bearer_header() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer tok456");
        assert_eq!(session_token(&headers), Some("tok456"));
    }

    #[test]
    fn cookie_takes_precedence_over_bearer() {
        let mut headers = headers_with(header::COOKIE, "__session=cookie-tok");
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer bearer-tok"),
        );
        assert_eq!(session_token(&headers), Some("cookie-tok"));
    }

    #[test]
    fn empty_or_missing_token_is_none() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        let headers = headers_with(header::COOKIE, "__session=");
        assert_eq!(session_token(&headers), None);
        let headers = headers_with(header::AUTHORIZATION, "Basic abc");
        assert_eq!(session_token(&headers), None);
    }
}
