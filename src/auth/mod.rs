//! Authentication module.
//!
//! Two credentials exist:
//! - the operator pre-shared key guarding the admin API, compared in constant
//!   time to mitigate timing attacks;
//! - reader session tokens, resolved to an [`Identity`] by the extractors below.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::models::Identity;
use crate::AppState;

/// Header name for the admin API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header name for a reader session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// Message shown when a reader action is attempted without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Você precisa estar logado para realizar esta ação.";

/// PSK authentication layer function that takes the expected PSK as a parameter.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no PSK is configured, allow all requests (dev mode)
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    // Get the API key from the request header
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    match provided {
        Some(provided_key) => {
            if constant_time_compare(&provided_key, &expected) {
                next.run(request).await
            } else {
                unauthorized_response("Invalid API key")
            }
        }
        None => {
            // Also check Authorization header as bearer token
            let bearer = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string());

            match bearer {
                Some(bearer_key) if constant_time_compare(&bearer_key, &expected) => {
                    next.run(request).await
                }
                _ => unauthorized_response("Missing or invalid API key"),
            }
        }
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

fn session_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// An authenticated reader. Rejects with 401 when no valid session is presented.
#[derive(Debug, Clone)]
pub struct Reader(pub Identity);

impl FromRequestParts<AppState> for Reader {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED_MESSAGE.to_string()))?;

        state
            .repo
            .identity_for_token(token)
            .await?
            .map(Reader)
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED_MESSAGE.to_string()))
    }
}

/// The viewer of a page, if signed in. Never rejects.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<Identity>);

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(Viewer(None));
        };

        match state.repo.identity_for_token(token).await {
            Ok(identity) => Ok(Viewer(identity)),
            Err(e) => {
                tracing::warn!("Failed to resolve viewer session: {}", e);
                Ok(Viewer(None))
            }
        }
    }
}
