use validator::Validate;

use crate::{
    dto::checkout::{CheckoutSessionResponse, CompletePaymentRequest},
    dto::orders::{CreateOrderRequest, OrderCreated},
    entity::orders::OrderStatus,
    error::{AppError, AppResult},
    notify::Notification,
    payments::{CheckoutLine, PaymentClient},
    services::order_service,
    state::AppState,
};

fn payment_client(state: &AppState) -> AppResult<&PaymentClient> {
    state
        .payments
        .as_deref()
        .ok_or_else(|| AppError::ServiceUnavailable("Payments are not configured".into()))
}

/// 503 gate, checked before the rate limiter so an unconfigured deployment
/// answers consistently.
pub fn ensure_configured(state: &AppState) -> AppResult<()> {
    payment_client(state).map(|_| ())
}

/// Open a hosted payment session for the submitted cart. Nothing is
/// persisted yet; the order payload travels in the session metadata and is
/// only written once the payment is confirmed.
pub async fn start_checkout(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<CheckoutSessionResponse> {
    let client = payment_client(state)?;

    let lines: Vec<CheckoutLine> = payload
        .items
        .iter()
        .map(|item| CheckoutLine {
            name: item.name.clone(),
            unit_price: item.price,
            quantity: item.quantity,
        })
        .collect();
    let metadata = serde_json::to_string(&payload)
        .map_err(|err| AppError::Internal(err.into()))?;

    let session = client
        .create_checkout_session(&lines, &metadata)
        .await
        .map_err(AppError::Internal)?;
    let url = session
        .url
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("checkout session has no url")))?;

    Ok(CheckoutSessionResponse { url })
}

/// Finalize a paid session: verify payment, recover the order payload from
/// the session metadata, and persist it as COMPLETED.
pub async fn complete_payment(
    state: &AppState,
    payload: CompletePaymentRequest,
) -> AppResult<OrderCreated> {
    let client = payment_client(state)?;

    let session = client
        .retrieve_checkout_session(&payload.session_id)
        .await
        .map_err(AppError::Internal)?;

    if !session.is_paid() {
        return Err(AppError::BadRequest("Payment not completed".into()));
    }

    let raw = session
        .metadata
        .get("order")
        .ok_or_else(|| AppError::BadRequest("Order metadata missing".into()))?;
    let order: CreateOrderRequest = serde_json::from_str(raw)
        .map_err(|_| AppError::BadRequest("Invalid input data".into()))?;
    order.validate()?;

    let (order, items) = order_service::persist_order(state, &order, OrderStatus::Completed).await?;
    state.notifier.notify(Notification::Order {
        order: order.clone(),
        items,
    });

    Ok(OrderCreated {
        success: true,
        order_id: order.id,
    })
}
