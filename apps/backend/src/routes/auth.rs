//! Authentication middleware

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, Result};
use crate::AppState;

/// Opaque credential verifier: maps a bearer token to a user id.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<String>;
}

/// Token verifier backed by a fixed token table.
///
/// Intended for development and tests; production deployments supply their
/// own [`TokenVerifier`] implementation.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    /// Parse the `AUTH_TOKENS` environment variable, a comma-separated list
    /// of `token:user_id` pairs.
    pub fn from_env() -> Self {
        let raw = std::env::var("AUTH_TOKENS").unwrap_or_default();
        let tokens = raw
            .split(',')
            .filter_map(|pair| {
                let (token, user) = pair.split_once(':')?;
                let (token, user) = (token.trim(), user.trim());
                if token.is_empty() || user.is_empty() {
                    return None;
                }
                Some((token.to_string(), user.to_string()))
            })
            .collect();
        Self { tokens }
    }

    /// Verifier accepting a single token for a single user.
    pub fn with_token(token: &str, user_id: &str) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(token.to_string(), user_id.to_string());
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Auth middleware - verifies the bearer token and attaches the user id
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Health check stays open
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    let user_id = state
        .verifier
        .verify(token)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}
