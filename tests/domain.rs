use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{NaiveDate, Utc};
use heritage_wala_api::{
    config::{Quota, parse_quota},
    cookies, csrf,
    dto::orders::{CreateOrderRequest, OrderItemInput},
    entity::{orders::OrderStatus, reservations::ReservationStatus},
    error::AppError,
    middleware::auth::{AdminSession, ensure_admin},
    models::{Order, OrderItem, Reservation},
    notify::{Mail, Mailer, Notification, deliver},
    payments::pence,
    ratelimit::{RateLimiter, client_key},
    routes::params::Pagination,
    sanitize::Sanitize,
    services::order_service::compute_total,
};
use rust_decimal::Decimal;
use tokio::time::Duration;
use uuid::Uuid;

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn line(name: &str, price: &str, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        menu_item_id: Uuid::new_v4(),
        name: name.to_string(),
        price: dec(price),
        quantity,
    }
}

#[test]
fn order_total_sums_submitted_lines_exactly() {
    let items = [line("Paneer Tikka", "7.99", 2), line("Apollo Fish", "12.99", 1)];
    assert_eq!(compute_total(&items).unwrap(), dec("28.97"));
    assert_eq!(compute_total(&[]).unwrap(), Decimal::ZERO);
}

fn priced_line(price: Decimal, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        menu_item_id: Uuid::new_v4(),
        name: "Feast".to_string(),
        price,
        quantity,
    }
}

#[test]
fn oversized_order_totals_are_rejected() {
    // A single line can overflow on the multiply
    let err = compute_total(&[priced_line(Decimal::MAX, 2)]).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Two schema-valid lines can overflow on the running sum
    let err = compute_total(&[
        priced_line(Decimal::MAX, 1),
        priced_line(Decimal::MAX, 1),
    ])
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(
        compute_total(&[priced_line(Decimal::MAX, 1)]).unwrap(),
        Decimal::MAX
    );
}

#[test]
fn pence_rounds_midpoints_away_from_zero() {
    assert_eq!(pence(dec("7.99")).unwrap(), 799);
    assert_eq!(pence(dec("10")).unwrap(), 1000);
    assert_eq!(pence(dec("0.005")).unwrap(), 1);
    assert_eq!(pence(dec("2.675")).unwrap(), 268);
    assert!(pence(Decimal::MAX).is_err());
}

#[test]
fn order_status_flow_only_moves_forward() {
    use OrderStatus::*;
    assert!(Pending.can_transition_to(Preparing));
    assert!(Preparing.can_transition_to(Ready));
    assert!(Ready.can_transition_to(Completed));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(Ready.can_transition_to(Cancelled));

    assert!(!Pending.can_transition_to(Ready));
    assert!(!Preparing.can_transition_to(Pending));
    assert!(!Completed.can_transition_to(Cancelled));
    assert!(!Cancelled.can_transition_to(Pending));
}

#[test]
fn reservation_status_transitions_and_capacity_holds() {
    use ReservationStatus::*;
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Pending.can_transition_to(Rejected));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(Confirmed.can_transition_to(Cancelled));

    assert!(!Confirmed.can_transition_to(Pending));
    assert!(!Rejected.can_transition_to(Confirmed));
    assert!(!Cancelled.can_transition_to(Pending));

    assert!(Pending.holds_capacity());
    assert!(Confirmed.holds_capacity());
    assert!(!Rejected.holds_capacity());
    assert!(!Cancelled.holds_capacity());
}

#[test]
fn quota_parses_limit_slash_window() {
    assert_eq!(parse_quota("5/900"), Some(Quota::new(5, 900)));
    assert_eq!(parse_quota(" 10 / 60 "), Some(Quota::new(10, 60)));
    assert_eq!(parse_quota("5"), None);
    assert_eq!(parse_quota("five/60"), None);
    assert_eq!(parse_quota(""), None);
}

#[test]
fn sanitize_strips_angle_brackets_and_trims() {
    let mut text = String::from("  <script>hi</script>  ");
    text.sanitize();
    assert_eq!(text, "scripthi/script");

    let mut none: Option<String> = None;
    none.sanitize();
    assert!(none.is_none());

    let mut many = vec![String::from("<a>"), String::from(" b ")];
    many.sanitize();
    assert_eq!(many, ["a", "b"]);
}

#[test]
fn sanitize_reaches_nested_order_lines() {
    let mut payload = CreateOrderRequest {
        customer_name: " <Asha> ".into(),
        customer_phone: "07700900123".into(),
        customer_email: Some(" asha@example.com ".into()),
        items: vec![line("<b>Paneer</b>", "7.99", 1)],
    };
    payload.sanitize();
    assert_eq!(payload.customer_name, "Asha");
    assert_eq!(payload.customer_email.as_deref(), Some("asha@example.com"));
    assert_eq!(payload.items[0].name, "bPaneer/b");
}

#[test]
fn cookie_header_parsing_skips_malformed_pairs() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("a=1; garbage; admin-token = tok ; b=2"),
    );
    assert_eq!(
        cookies::get_cookie(&headers, cookies::SESSION_COOKIE).as_deref(),
        Some("tok")
    );
    assert_eq!(cookies::get_cookie(&headers, "missing"), None);
    assert_eq!(cookies::get_cookie(&HeaderMap::new(), "a"), None);
}

#[test]
fn cookie_attributes_match_their_purpose() {
    let session = cookies::session_cookie("tok", 86400, false);
    assert_eq!(
        session,
        "admin-token=tok; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax"
    );
    assert!(cookies::session_cookie("tok", 86400, true).ends_with("; Secure"));

    assert!(cookies::clear_session_cookie().contains("Max-Age=0"));

    // Double-submit check needs the CSRF cookie readable from script
    let csrf_cookie = cookies::csrf_cookie("t", false);
    assert_eq!(csrf_cookie, "csrf-token=t; Path=/; SameSite=Lax");
    assert!(!csrf_cookie.contains("HttpOnly"));
}

#[test]
fn csrf_verify_requires_matching_header_and_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert("x-csrf-token", HeaderValue::from_static("tok-1"));
    headers.insert(header::COOKIE, HeaderValue::from_static("csrf-token=tok-1"));
    assert!(csrf::verify(&headers).is_ok());

    let mut mismatch = HeaderMap::new();
    mismatch.insert("x-csrf-token", HeaderValue::from_static("tok-1"));
    mismatch.insert(header::COOKIE, HeaderValue::from_static("csrf-token=tok-2"));
    assert!(matches!(
        csrf::verify(&mismatch),
        Err(AppError::Forbidden(_))
    ));

    let mut header_only = HeaderMap::new();
    header_only.insert("x-csrf-token", HeaderValue::from_static("tok-1"));
    assert!(csrf::verify(&header_only).is_err());

    let mut cookie_only = HeaderMap::new();
    cookie_only.insert(header::COOKIE, HeaderValue::from_static("csrf-token=tok-1"));
    assert!(csrf::verify(&cookie_only).is_err());

    // Two empty values agree but still fail
    let mut empty = HeaderMap::new();
    empty.insert("x-csrf-token", HeaderValue::from_static(""));
    empty.insert(header::COOKIE, HeaderValue::from_static("csrf-token="));
    assert!(csrf::verify(&empty).is_err());
}

#[test]
fn pagination_clamps_page_and_size() {
    let defaults = Pagination {
        page: None,
        per_page: None,
    };
    assert_eq!(defaults.normalize(), (1, 20, 0));

    let third = Pagination {
        page: Some(3),
        per_page: Some(10),
    };
    assert_eq!(third.normalize(), (3, 10, 20));

    let wild = Pagination {
        page: Some(0),
        per_page: Some(500),
    };
    assert_eq!(wild.normalize(), (1, 100, 0));

    let negative = Pagination {
        page: Some(-4),
        per_page: Some(0),
    };
    assert_eq!(negative.normalize(), (1, 1, 0));
}

#[test]
fn client_key_takes_first_forwarded_hop() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_static(" 203.0.113.9 , 10.0.0.1"),
    );
    assert_eq!(client_key(&headers), "203.0.113.9");

    assert_eq!(client_key(&HeaderMap::new()), "unknown");

    let mut empty = HeaderMap::new();
    empty.insert("x-forwarded-for", HeaderValue::from_static(""));
    assert_eq!(client_key(&empty), "unknown");
}

#[test]
fn only_the_admin_role_passes_the_gate() {
    let admin = AdminSession {
        user_id: Uuid::new_v4(),
        email: "admin@example.com".into(),
        role: "ADMIN".into(),
    };
    assert!(ensure_admin(&admin).is_ok());

    let other = AdminSession {
        role: "CUSTOMER".into(),
        ..admin
    };
    assert!(matches!(ensure_admin(&other), Err(AppError::Forbidden(_))));
}

fn sample_order(email: Option<&str>) -> (Order, Vec<OrderItem>) {
    let id = Uuid::new_v4();
    let order = Order {
        id,
        customer_name: "Asha".into(),
        customer_phone: "07700900123".into(),
        customer_email: email.map(str::to_string),
        total: dec("28.97"),
        status: OrderStatus::Pending,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let items = vec![OrderItem {
        id: Uuid::new_v4(),
        order_id: id,
        menu_item_id: Some(Uuid::new_v4()),
        name: "Paneer Tikka".into(),
        price: dec("7.99"),
        quantity: 2,
        created_at: Utc::now(),
    }];
    (order, items)
}

#[test]
fn order_mail_needs_a_customer_address() {
    let (order, items) = sample_order(None);
    assert!(Notification::Order { order, items }.render().is_none());
}

#[test]
fn order_mail_lists_lines_and_short_id() {
    let (order, items) = sample_order(Some("asha@example.com"));
    let id_text = order.id.to_string();
    let short_id = &id_text[id_text.len() - 6..];

    let mail = Notification::Order { order, items }
        .render()
        .expect("order with email renders");
    assert_eq!(mail.to, "asha@example.com");
    assert_eq!(
        mail.subject,
        format!("Order Confirmation #{short_id} - Heritage Wala")
    );
    assert!(mail.body.contains("- 2x Paneer Tikka (£7.99)"));
    assert!(mail.body.contains("Total: £28.97"));
    assert!(mail.body.contains("it is now PENDING"));
}

#[test]
fn reservation_mail_spells_out_the_slot() {
    let reservation = Reservation {
        id: Uuid::new_v4(),
        name: "Bela".into(),
        phone: "07700900456".into(),
        email: "bela@example.com".into(),
        date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
        time: "19:00".into(),
        guests: 4,
        notes: None,
        status: ReservationStatus::Pending,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let mail = Notification::Reservation { reservation }
        .render()
        .expect("reservation always renders");
    assert_eq!(mail.to, "bela@example.com");
    assert_eq!(mail.subject, "Reservation Received - Heritage Wala");
    assert!(mail.body.contains("Date: Sat Sep 12 2026"));
    assert!(mail.body.contains("Time: 19:00"));
    assert!(mail.body.contains("Guests: 4"));
    assert!(mail.body.contains("Current Status: PENDING"));
}

struct FlakyMailer {
    calls: AtomicU32,
    succeed_on: u32,
}

#[async_trait]
impl Mailer for FlakyMailer {
    async fn send(&self, _mail: &Mail) -> anyhow::Result<()> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt >= self.succeed_on {
            Ok(())
        } else {
            anyhow::bail!("provider down")
        }
    }
}

fn sample_mail() -> Mail {
    Mail {
        to: "asha@example.com".into(),
        subject: "Order Confirmation".into(),
        body: "Thanks".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn delivery_gives_up_after_three_attempts() {
    let mailer = FlakyMailer {
        calls: AtomicU32::new(0),
        succeed_on: u32::MAX,
    };
    deliver(&mailer, &sample_mail()).await;
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn delivery_stops_retrying_once_a_send_lands() {
    let mailer = FlakyMailer {
        calls: AtomicU32::new(0),
        succeed_on: 2,
    };
    deliver(&mailer, &sample_mail()).await;
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn rate_limiter_enforces_quota_within_a_window() {
    let limiter = RateLimiter::in_memory();
    let quota = Quota::new(3, 60);

    for _ in 0..3 {
        assert!(limiter.check("orders", quota, "203.0.113.9").await.is_ok());
    }

    let err = limiter
        .check("orders", quota, "203.0.113.9")
        .await
        .unwrap_err();
    match err {
        AppError::RateLimited { retry_after_secs } => {
            assert!(retry_after_secs >= 1 && retry_after_secs <= 60);
        }
        other => panic!("expected rate limited, got {other:?}"),
    }

    // Other clients and other rules keep their own budgets
    assert!(limiter.check("orders", quota, "198.51.100.7").await.is_ok());
    assert!(limiter.check("login", quota, "203.0.113.9").await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn rate_limit_window_expires_and_resets() {
    let limiter = RateLimiter::in_memory();
    let quota = Quota::new(1, 60);

    assert!(limiter.check("login", quota, "203.0.113.9").await.is_ok());
    assert!(limiter.check("login", quota, "203.0.113.9").await.is_err());

    tokio::time::advance(Duration::from_secs(61)).await;
    assert!(limiter.check("login", quota, "203.0.113.9").await.is_ok());
}
