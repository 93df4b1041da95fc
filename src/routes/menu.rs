use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, header},
    routing::get,
};

use crate::{error::AppResult, models::MenuSection, services::menu_service, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(public_menu))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "Categories in display order with their available items", body = Vec<MenuSection>),
    ),
    tag = "Menu"
)]
pub async fn public_menu(
    State(state): State<AppState>,
) -> AppResult<([(HeaderName, &'static str); 1], Json<Vec<MenuSection>>)> {
    let sections = menu_service::public_menu(&state).await?;
    // The public menu changes rarely; let CDNs serve it slightly stale.
    let headers = [(
        header::CACHE_CONTROL,
        "public, s-maxage=60, stale-while-revalidate=120",
    )];
    Ok((headers, Json(sections)))
}
