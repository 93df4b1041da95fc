use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use heritage_wala_api::{
    config::{AppConfig, RateLimitQuotas},
    dto::checkout::CompletePaymentRequest,
    dto::orders::{CreateOrderRequest, OrderItemInput},
    error::AppError,
    notify::{LogMailer, Notifier},
    payments::PaymentClient,
    ratelimit::RateLimiter,
    services::checkout_service,
    state::AppState,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

// Captured form params from the last create-session call.
type Captured = Arc<Mutex<Vec<(String, String)>>>;

async fn create_session(
    State(captured): State<Captured>,
    Form(params): Form<Vec<(String, String)>>,
) -> Json<Value> {
    *captured.lock().await = params;
    Json(json!({
        "id": "cs_new",
        "url": "https://pay.example/cs_new",
        "payment_status": "unpaid",
        "metadata": {}
    }))
}

// The session id picks the scenario so each test can steer the provider.
async fn get_session(Path(id): Path<String>) -> Json<Value> {
    let session = match id.as_str() {
        "cs_nometa" => json!({"id": id, "payment_status": "paid", "metadata": {}}),
        "cs_badmeta" => {
            json!({"id": id, "payment_status": "paid", "metadata": {"order": "{not json"}})
        }
        "cs_emptycart" => json!({
            "id": id,
            "payment_status": "paid",
            "metadata": {"order": r#"{"customerName":"Asha","customerPhone":"07700900123","customerEmail":null,"items":[]}"#}
        }),
        _ => json!({"id": id, "payment_status": "unpaid", "metadata": {}}),
    };
    Json(session)
}

/// Stand-in for the hosted payment provider, bound to an ephemeral port.
async fn spawn_provider(captured: Captured) -> anyhow::Result<String> {
    let app = Router::new()
        .route("/v1/checkout/sessions", post(create_session))
        .route("/v1/checkout/sessions/{id}", get(get_session))
        .with_state(captured);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

// These paths never reach the database, so the state carries a lazy pool
// and a disconnected ORM handle.
fn stub_state(api_base: &str) -> AppState {
    let config = AppConfig {
        database_url: "postgres://localhost/unused".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        public_url: "http://localhost:3000".to_string(),
        jwt_secret: "integration-test-secret-0123456789abcdef".to_string(),
        cookie_secure: false,
        resend_api_key: None,
        email_from: "Heritage Wala <orders@example.com>".to_string(),
        ratelimit_redis_url: None,
        stripe_secret_key: Some("sk_test_123".to_string()),
        stripe_publishable_key: Some("pk_test_123".to_string()),
        stripe_api_base: api_base.to_string(),
        quotas: RateLimitQuotas::default(),
    };
    let payments = PaymentClient::from_config(&config).map(Arc::new);
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool from a well-formed url");

    AppState {
        pool,
        orm: sea_orm::DatabaseConnection::default(),
        config: Arc::new(config),
        limiter: RateLimiter::in_memory(),
        notifier: Notifier::spawn(Arc::new(LogMailer)),
        payments,
    }
}

fn cart() -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: "Asha".to_string(),
        customer_phone: "07700900123".to_string(),
        customer_email: Some("asha@example.com".to_string()),
        items: vec![
            OrderItemInput {
                menu_item_id: Uuid::new_v4(),
                name: "Paneer Tikka".to_string(),
                price: "7.99".parse().unwrap(),
                quantity: 2,
            },
            OrderItemInput {
                menu_item_id: Uuid::new_v4(),
                name: "Apollo Fish".to_string(),
                price: "12.99".parse().unwrap(),
                quantity: 1,
            },
        ],
    }
}

fn assert_bad_request(err: AppError, expected: &str) {
    match err {
        AppError::BadRequest(message) => assert_eq!(message, expected),
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn checkout_is_unavailable_without_payment_keys() {
    let mut state = stub_state("http://127.0.0.1:9");
    state.payments = None;

    let err = checkout_service::ensure_configured(&state).unwrap_err();
    assert!(matches!(err, AppError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn start_checkout_sends_pence_lines_and_order_metadata() -> anyhow::Result<()> {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_provider(captured.clone()).await?;
    let state = stub_state(&base);

    let response = checkout_service::start_checkout(&state, cart()).await?;
    assert_eq!(response.url, "https://pay.example/cs_new");

    let params = captured.lock().await.clone();
    let param = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    assert_eq!(param("mode").as_deref(), Some("payment"));
    assert_eq!(
        param("line_items[0][price_data][unit_amount]").as_deref(),
        Some("799")
    );
    assert_eq!(param("line_items[0][quantity]").as_deref(), Some("2"));
    assert_eq!(
        param("line_items[1][price_data][unit_amount]").as_deref(),
        Some("1299")
    );
    assert!(
        param("success_url")
            .unwrap()
            .contains("{CHECKOUT_SESSION_ID}")
    );

    // The order payload rides along intact in the session metadata
    let order: CreateOrderRequest = serde_json::from_str(&param("metadata[order]").unwrap())?;
    assert_eq!(order.customer_name, "Asha");
    assert_eq!(order.items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn unpaid_sessions_do_not_become_orders() -> anyhow::Result<()> {
    let base = spawn_provider(Arc::new(Mutex::new(Vec::new()))).await?;
    let state = stub_state(&base);

    let err = checkout_service::complete_payment(
        &state,
        CompletePaymentRequest {
            session_id: "cs_unpaid".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_bad_request(err, "Payment not completed");
    Ok(())
}

#[tokio::test]
async fn paid_session_without_order_metadata_is_refused() -> anyhow::Result<()> {
    let base = spawn_provider(Arc::new(Mutex::new(Vec::new()))).await?;
    let state = stub_state(&base);

    let err = checkout_service::complete_payment(
        &state,
        CompletePaymentRequest {
            session_id: "cs_nometa".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_bad_request(err, "Order metadata missing");
    Ok(())
}

#[tokio::test]
async fn undeserializable_metadata_is_refused() -> anyhow::Result<()> {
    let base = spawn_provider(Arc::new(Mutex::new(Vec::new()))).await?;
    let state = stub_state(&base);

    let err = checkout_service::complete_payment(
        &state,
        CompletePaymentRequest {
            session_id: "cs_badmeta".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_bad_request(err, "Invalid input data");
    Ok(())
}

#[tokio::test]
async fn recovered_order_payload_is_revalidated() -> anyhow::Result<()> {
    let base = spawn_provider(Arc::new(Mutex::new(Vec::new()))).await?;
    let state = stub_state(&base);

    let err = checkout_service::complete_payment(
        &state,
        CompletePaymentRequest {
            session_id: "cs_emptycart".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}
