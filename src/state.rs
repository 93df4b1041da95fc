use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{DbPool, OrmConn};
use crate::notify::Notifier;
use crate::payments::PaymentClient;
use crate::ratelimit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub limiter: RateLimiter,
    pub notifier: Notifier,
    pub payments: Option<Arc<PaymentClient>>,
}
