use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::config::AppConfig;
use crate::models::{Order, OrderItem, Reservation};

const QUEUE_DEPTH: usize = 256;
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;
const RESEND_API_BASE: &str = "https://api.resend.com";

/// A rendered outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()>;
}

/// Resend-style HTTP mail provider.
pub struct HttpMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl HttpMailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
            base_url: RESEND_API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": [mail.to],
                "subject": mail.subject,
                "text": mail.body,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("mail provider returned {}", response.status());
        }
        Ok(())
    }
}

/// Used when no provider key is configured: the rendered mail goes to the
/// log instead of the wire.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "mock mail delivery"
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &AppConfig) -> Arc<dyn Mailer> {
    match &config.resend_api_key {
        Some(key) => Arc::new(HttpMailer::new(key.clone(), config.email_from.clone())),
        None => {
            tracing::warn!("RESEND_API_KEY not set, mail delivery is log-only");
            Arc::new(LogMailer)
        }
    }
}

/// Customer-facing events that produce an email. The same template covers
/// both the initial confirmation and later status changes since the body
/// always names the current status.
#[derive(Debug, Clone)]
pub enum Notification {
    Order { order: Order, items: Vec<OrderItem> },
    Reservation { reservation: Reservation },
}

impl Notification {
    /// Render to a mail, or `None` when the customer left no address.
    pub fn render(&self) -> Option<Mail> {
        match self {
            Notification::Order { order, items } => {
                let to = order.customer_email.clone()?;
                Some(order_mail(&to, order, items))
            }
            Notification::Reservation { reservation } => {
                Some(reservation_mail(reservation))
            }
        }
    }
}

fn order_mail(to: &str, order: &Order, items: &[OrderItem]) -> Mail {
    let short_id = short_id(order.id);
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("- {}x {} (£{})", item.quantity, item.name, item.price))
        .collect();
    Mail {
        to: to.to_string(),
        subject: format!("Order Confirmation #{short_id} - Heritage Wala"),
        body: format!(
            "Dear {name},\n\n\
             Thank you for your order! We have received it and it is now {status}.\n\n\
             Order Details:\n\
             ID: {id}\n\
             Total: £{total}\n\n\
             Items:\n{items}\n\n\
             You can track your order status on our website.\n\n\
             Best regards,\nHeritage Wala Team",
            name = order.customer_name,
            status = order.status.as_str(),
            id = order.id,
            total = order.total,
            items = lines.join("\n"),
        ),
    }
}

fn reservation_mail(reservation: &Reservation) -> Mail {
    Mail {
        to: reservation.email.clone(),
        subject: "Reservation Received - Heritage Wala".to_string(),
        body: format!(
            "Dear {name},\n\n\
             We have received your reservation request.\n\n\
             Date: {date}\n\
             Time: {time}\n\
             Guests: {guests}\n\n\
             Current Status: {status}\n\n\
             We will review your request and confirm shortly.\n\n\
             Best regards,\nHeritage Wala Team",
            name = reservation.name,
            date = reservation.date.format("%a %b %-d %Y"),
            time = reservation.time,
            guests = reservation.guests,
            status = reservation.status.as_str(),
        ),
    }
}

/// Last six hex characters of the id, as shown to customers.
fn short_id(id: uuid::Uuid) -> String {
    let text = id.to_string();
    text[text.len() - 6..].to_string()
}

/// Send handle for the background delivery worker.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
}

impl Notifier {
    /// Spawn the delivery worker and return the handle used by request
    /// handlers.
    pub fn spawn(mailer: Arc<dyn Mailer>) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        tokio::spawn(run_worker(mailer, rx));
        Self { tx }
    }

    /// Fire-and-forget enqueue; a full queue drops the mail with a warning
    /// rather than stalling the request.
    pub fn notify(&self, notification: Notification) {
        if let Err(err) = self.tx.try_send(notification) {
            tracing::warn!(error = %err, "notification queue full, dropping mail");
        }
    }
}

pub async fn run_worker(mailer: Arc<dyn Mailer>, mut rx: mpsc::Receiver<Notification>) {
    tracing::info!("notification worker started");
    while let Some(notification) = rx.recv().await {
        let Some(mail) = notification.render() else {
            continue;
        };
        deliver(mailer.as_ref(), &mail).await;
    }
    tracing::info!("notification channel closed, worker stopping");
}

/// Up to three attempts with a linearly growing pause between them.
pub async fn deliver(mailer: &dyn Mailer, mail: &Mail) {
    for attempt in 1..=MAX_ATTEMPTS {
        match mailer.send(mail).await {
            Ok(()) => {
                tracing::debug!(to = %mail.to, subject = %mail.subject, attempt, "mail sent");
                return;
            }
            Err(err) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(error = %err, attempt, "mail delivery failed, retrying");
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt)))
                    .await;
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    to = %mail.to,
                    subject = %mail.subject,
                    "mail delivery failed, giving up"
                );
            }
        }
    }
}
