use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, header},
    routing::post,
};
use validator::Validate;

use crate::{
    cookies::{clear_session_cookie, session_cookie},
    csrf,
    dto::auth::{LoginRequest, LoginResponse},
    error::{AppJson, AppResult},
    ratelimit::client_key,
    sanitize::Sanitize,
    services::auth_service,
    state::AppState,
};

const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is not an admin"),
        (status = 429, description = "Too many attempts"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut payload): AppJson<LoginRequest>,
) -> AppResult<([(HeaderName, String); 1], Json<LoginResponse>)> {
    state
        .limiter
        .check("login", state.config.quotas.login, &client_key(&headers))
        .await?;
    csrf::verify(&headers)?;
    payload.validate()?;
    payload.sanitize();

    let token = auth_service::login(&state, payload).await?;
    let cookie = session_cookie(&token, SESSION_TTL_SECS, state.config.cookie_secure);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { success: true }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = LoginResponse),
    ),
    tag = "Auth"
)]
pub async fn logout() -> ([(HeaderName, String); 1], Json<LoginResponse>) {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(LoginResponse { success: true }),
    )
}
