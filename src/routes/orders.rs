use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use validator::Validate;

use crate::{
    csrf,
    dto::orders::{CreateOrderRequest, OrderCreated},
    error::{AppJson, AppResult},
    ratelimit::client_key,
    sanitize::Sanitize,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order accepted", body = OrderCreated),
        (status = 400, description = "Invalid input data"),
        (status = 403, description = "CSRF token mismatch"),
        (status = 429, description = "Too many requests"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut payload): AppJson<CreateOrderRequest>,
) -> AppResult<Json<OrderCreated>> {
    state
        .limiter
        .check("orders", state.config.quotas.orders, &client_key(&headers))
        .await?;
    csrf::verify(&headers)?;
    payload.validate()?;
    payload.sanitize();

    let order = order_service::create_order(&state, payload).await?;
    Ok(Json(OrderCreated {
        success: true,
        order_id: order.id,
    }))
}
