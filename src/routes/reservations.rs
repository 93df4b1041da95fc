use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use validator::Validate;

use crate::{
    csrf,
    dto::reservations::{CreateReservationRequest, ReservationCreated},
    error::{AppJson, AppResult},
    ratelimit::client_key,
    sanitize::Sanitize,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_reservation))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation accepted", body = ReservationCreated),
        (status = 400, description = "Invalid input or the slot is full"),
        (status = 403, description = "CSRF token mismatch"),
        (status = 429, description = "Too many requests"),
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut payload): AppJson<CreateReservationRequest>,
) -> AppResult<Json<ReservationCreated>> {
    state
        .limiter
        .check(
            "reservations",
            state.config.quotas.reservations,
            &client_key(&headers),
        )
        .await?;
    csrf::verify(&headers)?;
    payload.validate()?;
    payload.sanitize();

    let reservation = reservation_service::create_reservation(&state, payload).await?;
    Ok(Json(ReservationCreated {
        success: true,
        id: reservation.id,
    }))
}
