//! Bearer-token authentication
//!
//! Accepts either an HS256 JWT or one of the configured API keys in the
//! `Authorization: Bearer` header. The resolved client identity is stashed in
//! request extensions so handlers can rate-limit per caller.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::server::AppState;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    #[allow(dead_code)]
    exp: Option<usize>,
}

/// Authenticated caller identity; doubles as the rate-limit key.
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub String);

/// Accepted API keys, held as SHA-256 hashes.
#[derive(Debug, Default)]
pub struct ApiKeySet {
    hashes: HashSet<String>,
}

impl ApiKeySet {
    pub fn new(keys: &[String]) -> Self {
        Self {
            hashes: keys
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(hash_key)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Validate a presented key, returning a stable identity for it.
    pub fn validate(&self, token: &str) -> Option<String> {
        let hash = hash_key(token);
        self.hashes
            .contains(&hash)
            .then(|| format!("key:{}", &hash[..8]))
    }
}

fn hash_key(value: impl AsRef<str>) -> String {
    let digest = Sha256::digest(value.as_ref().as_bytes());
    hex::encode(digest)
}

pub async fn auth_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let server = &state.config.server;
    let jwt_secret = server
        .jwt_secret
        .as_deref()
        .filter(|secret| !secret.trim().is_empty());

    // With neither keys nor a secret configured, auth is disabled (dev mode).
    if server.auth_disabled() {
        req.extensions_mut()
            .insert(ClientIdentity("anonymous".to_string()));
        return next.run(req).await;
    }

    let header_value = req.headers().get(header::AUTHORIZATION);
    if header_value.is_none() {
        return unauthorized("Missing Authorization header");
    }
    let Some(token) = extract_bearer(header_value) else {
        return unauthorized("Invalid Authorization format");
    };

    // JWT first, configured API keys as fallback.
    if let Some(secret) = jwt_secret {
        let validation = Validation::new(Algorithm::HS256);
        let key = DecodingKey::from_secret(secret.as_bytes());
        if let Ok(data) = decode::<Claims>(&token, &key, &validation) {
            let identity = data.claims.sub.unwrap_or_else(|| "jwt".to_string());
            req.extensions_mut().insert(ClientIdentity(identity));
            return next.run(req).await;
        }
    }

    if let Some(identity) = state.api_keys.validate(&token) {
        req.extensions_mut().insert(ClientIdentity(identity));
        return next.run(req).await;
    }

    unauthorized("Invalid API key")
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|token| token.trim().to_string())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "error": message})),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        let value = HeaderValue::from_static("Bearer abc123");
        assert_eq!(extract_bearer(Some(&value)).as_deref(), Some("abc123"));

        let value = HeaderValue::from_static("bearer  abc123 ");
        assert_eq!(extract_bearer(Some(&value)).as_deref(), Some("abc123"));

        let value = HeaderValue::from_static("Basic dXNlcg==");
        assert!(extract_bearer(Some(&value)).is_none());
        assert!(extract_bearer(None).is_none());
    }

    #[test]
    fn test_api_key_set() {
        let keys = ApiKeySet::new(&["alpha".to_string(), " ".to_string()]);
        assert!(!keys.is_empty());
        assert!(keys.validate("alpha").is_some());
        assert!(keys.validate("beta").is_none());
        // Identity is stable for the same key.
        assert_eq!(keys.validate("alpha"), keys.validate("alpha"));
    }

    #[test]
    fn test_empty_key_set() {
        let keys = ApiKeySet::new(&[]);
        assert!(keys.is_empty());
        assert!(keys.validate("anything").is_none());
    }
}
