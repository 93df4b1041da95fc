use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, header},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{cookies::csrf_cookie, csrf::issue_token, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(mint_token))
}

#[derive(Serialize, ToSchema)]
pub struct CsrfToken {
    pub token: String,
}

#[utoipa::path(
    get,
    path = "/api/csrf",
    responses(
        (status = 200, description = "Token minted and mirrored in the csrf-token cookie", body = CsrfToken),
    ),
    tag = "Csrf"
)]
pub async fn mint_token(
    State(state): State<AppState>,
) -> ([(HeaderName, String); 1], Json<CsrfToken>) {
    let token = issue_token();
    let cookie = csrf_cookie(&token, state.config.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Json(CsrfToken { token }))
}
