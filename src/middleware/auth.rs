use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{
    cookies::{self, SESSION_COOKIE},
    dto::auth::Claims,
    error::AppError,
};

/// The authenticated admin behind the session cookie.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

impl AdminSession {
    fn decode(token: &str) -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        Ok(AdminSession {
            user_id,
            email: decoded.claims.email.clone(),
            role: decoded.claims.role.clone(),
        })
    }
}

pub fn ensure_admin(session: &AdminSession) -> Result<(), AppError> {
    if session.role != "ADMIN" {
        return Err(AppError::Forbidden("Unauthorized access".into()));
    }
    Ok(())
}

/// Non-failing variant for page routing, where a bad cookie just means
/// "not signed in".
pub fn session_from_headers(headers: &HeaderMap) -> Option<AdminSession> {
    let token = cookies::get_cookie(headers, SESSION_COOKIE)?;
    AdminSession::decode(&token).ok()
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let token = cookies::get_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;
        Self::decode(&token)
    }
}
