use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::config::AppConfig;

/// One charged line on a hosted checkout session.
pub struct CheckoutLine {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// The subset of the provider's session object we read back.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    pub payment_status: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// Stripe-compatible checkout client. All calls go over the form-encoded
/// v1 REST surface so the api_base can point at a test double.
pub struct PaymentClient {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
    public_url: String,
}

impl PaymentClient {
    /// `None` when the secret key is absent; callers treat that as
    /// payments-disabled rather than an error.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let secret_key = config.stripe_secret_key.clone()?;
        Some(Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base: config.stripe_api_base.clone(),
            public_url: config.public_url.clone(),
        })
    }

    /// Create a hosted session for the given lines. The serialized order
    /// payload rides along in the session metadata and comes back to us
    /// verbatim when the customer returns from the payment page.
    pub async fn create_checkout_session(
        &self,
        lines: &[CheckoutLine],
        order_metadata: &str,
    ) -> anyhow::Result<CheckoutSession> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            (
                "success_url".to_string(),
                format!(
                    "{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
                    self.public_url
                ),
            ),
            (
                "cancel_url".to_string(),
                format!("{}/checkout/cancel", self.public_url),
            ),
            ("metadata[order]".to_string(), order_metadata.to_string()),
        ];
        for (i, line) in lines.iter().enumerate() {
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                "gbp".to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                pence(line.unit_price)?.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                line.name.clone(),
            ));
            params.push((
                format!("line_items[{i}][quantity]"),
                line.quantity.to_string(),
            ));
        }

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("payment provider returned {status}: {body}");
        }
        Ok(response.json().await?)
    }

    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> anyhow::Result<CheckoutSession> {
        let response = self
            .client
            .get(format!(
                "{}/v1/checkout/sessions/{session_id}",
                self.api_base
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("payment provider returned {}", response.status());
        }
        Ok(response.json().await?)
    }
}

/// Whole pence for the charge amount, midpoints rounded away from zero.
pub fn pence(price: Decimal) -> anyhow::Result<i64> {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|p| p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|p| p.to_i64())
        .ok_or_else(|| anyhow::anyhow!("price out of range: {price}"))
}
