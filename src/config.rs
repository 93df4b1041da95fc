use std::env;

/// Requests allowed per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub limit: u32,
    pub window_secs: u64,
}

impl Quota {
    pub const fn new(limit: u32, window_secs: u64) -> Self {
        Self { limit, window_secs }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitQuotas {
    pub login: Quota,
    pub orders: Quota,
    pub reservations: Quota,
    pub checkout: Quota,
    pub payment_complete: Quota,
}

impl Default for RateLimitQuotas {
    fn default() -> Self {
        Self {
            login: Quota::new(5, 15 * 60),
            orders: Quota::new(5, 60),
            reservations: Quota::new(3, 60),
            checkout: Quota::new(5, 60),
            payment_complete: Quota::new(10, 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Base URL the checkout success/cancel pages live under.
    pub public_url: String,
    pub jwt_secret: String,
    pub cookie_secure: bool,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub ratelimit_redis_url: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_publishable_key: Option<String>,
    pub stripe_api_base: String,
    pub quotas: RateLimitQuotas,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters");
        }
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let defaults = RateLimitQuotas::default();
        let quotas = RateLimitQuotas {
            login: quota_from_env("RATELIMIT_LOGIN", defaults.login),
            orders: quota_from_env("RATELIMIT_ORDERS", defaults.orders),
            reservations: quota_from_env("RATELIMIT_RESERVATIONS", defaults.reservations),
            checkout: quota_from_env("RATELIMIT_CHECKOUT", defaults.checkout),
            payment_complete: quota_from_env(
                "RATELIMIT_PAYMENT_COMPLETE",
                defaults.payment_complete,
            ),
        };

        Ok(Self {
            database_url,
            host,
            port,
            public_url,
            jwt_secret,
            cookie_secure,
            resend_api_key: non_empty(env::var("RESEND_API_KEY").ok()),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Heritage Wala <orders@heritagewala.co.uk>".to_string()),
            ratelimit_redis_url: non_empty(env::var("RATELIMIT_REDIS_URL").ok()),
            stripe_secret_key: non_empty(env::var("STRIPE_SECRET_KEY").ok()),
            stripe_publishable_key: non_empty(env::var("STRIPE_PUBLISHABLE_KEY").ok()),
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            quotas,
        })
    }

    /// Checkout needs both halves of the Stripe key pair.
    pub fn payments_configured(&self) -> bool {
        self.stripe_secret_key.is_some() && self.stripe_publishable_key.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn quota_from_env(name: &str, default: Quota) -> Quota {
    env::var(name)
        .ok()
        .and_then(|raw| parse_quota(&raw))
        .unwrap_or(default)
}

/// Parses a `limit/window_secs` pair, e.g. `5/900`.
pub fn parse_quota(raw: &str) -> Option<Quota> {
    let (limit, window) = raw.split_once('/')?;
    Some(Quota {
        limit: limit.trim().parse().ok()?,
        window_secs: window.trim().parse().ok()?,
    })
}
