use axum::http::HeaderMap;
use uuid::Uuid;

use crate::{cookies, error::AppError};

/// Mint a fresh double-submit token.
pub fn issue_token() -> String {
    Uuid::new_v4().to_string()
}

/// Compare the `x-csrf-token` header against the `csrf-token` cookie.
/// Handlers on state-changing routes call this after their rate-limit
/// check so throttling still counts forged submissions.
pub fn verify(headers: &HeaderMap) -> Result<(), AppError> {
    let header = headers.get("x-csrf-token").and_then(|v| v.to_str().ok());
    let cookie = cookies::get_cookie(headers, cookies::CSRF_COOKIE);

    match (header, cookie) {
        (Some(header), Some(cookie)) if !header.is_empty() && header == cookie => Ok(()),
        _ => Err(AppError::Forbidden("Invalid CSRF token".to_string())),
    }
}
