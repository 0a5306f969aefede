use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::WWW_AUTHENTICATE, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorBody;
use crate::main_lib::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug)]
pub enum AuthError {
    MissingKey,
    InvalidKey,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingKey => "Missing API key",
            AuthError::InvalidKey => "Invalid API key",
        };
        let status = StatusCode::UNAUTHORIZED;
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: message.to_string(),
        });
        let mut response = (status, body).into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("ApiKey"));
        response
    }
}

/// Rejects requests without the configured `X-API-Key`. A no-op when no key is set.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingKey)?;

    if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        tracing::debug!("Rejected request to {} with invalid API key", request.uri().path());
        return Err(AuthError::InvalidKey);
    }

    Ok(next.run(request).await)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
