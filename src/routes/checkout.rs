use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use validator::Validate;

use crate::{
    csrf,
    dto::checkout::{CheckoutSessionResponse, CompletePaymentRequest},
    dto::orders::{CreateOrderRequest, OrderCreated},
    error::{AppJson, AppResult},
    ratelimit::client_key,
    sanitize::Sanitize,
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(start_checkout))
}

// Mounted under /stripe to keep the provider return URL stable.
pub fn stripe_router() -> Router<AppState> {
    Router::new().route("/complete", post(complete_payment))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Hosted payment session created", body = CheckoutSessionResponse),
        (status = 400, description = "Invalid input data"),
        (status = 403, description = "CSRF token mismatch"),
        (status = 429, description = "Too many requests"),
        (status = 503, description = "Payments are not configured"),
    ),
    tag = "Checkout"
)]
pub async fn start_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut payload): AppJson<CreateOrderRequest>,
) -> AppResult<Json<CheckoutSessionResponse>> {
    checkout_service::ensure_configured(&state)?;
    state
        .limiter
        .check(
            "checkout",
            state.config.quotas.checkout,
            &client_key(&headers),
        )
        .await?;
    csrf::verify(&headers)?;
    payload.validate()?;
    payload.sanitize();

    let session = checkout_service::start_checkout(&state, payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/stripe/complete",
    request_body = CompletePaymentRequest,
    responses(
        (status = 200, description = "Payment confirmed and order recorded", body = OrderCreated),
        (status = 400, description = "Payment incomplete or metadata invalid"),
        (status = 403, description = "CSRF token mismatch"),
        (status = 429, description = "Too many requests"),
        (status = 503, description = "Payments are not configured"),
    ),
    tag = "Checkout"
)]
pub async fn complete_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<CompletePaymentRequest>,
) -> AppResult<Json<OrderCreated>> {
    checkout_service::ensure_configured(&state)?;
    state
        .limiter
        .check(
            "stripe-complete",
            state.config.quotas.payment_complete,
            &client_key(&headers),
        )
        .await?;
    csrf::verify(&headers)?;
    payload.validate()?;

    let created = checkout_service::complete_payment(&state, payload).await?;
    Ok(Json(created))
}
