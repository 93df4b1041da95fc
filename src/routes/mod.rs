use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod checkout;
pub mod csrf;
pub mod doc;
pub mod health;
pub mod menu;
pub mod orders;
pub mod pages;
pub mod params;
pub mod reservations;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/orders", orders::router())
        .nest("/reservations", reservations::router())
        .nest("/checkout", checkout::router())
        .nest("/stripe", checkout::stripe_router())
        .nest("/csrf", csrf::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
