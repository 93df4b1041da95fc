use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::config::Quota;
use crate::error::AppError;

/// Result of bumping a counter: the updated count and seconds until the
/// window resets.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub count: u64,
    pub retry_after_secs: u64,
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Increment the counter for `key`, opening a fresh fixed window when
    /// none is active.
    async fn hit(&self, key: &str, window_secs: u64) -> anyhow::Result<Hit>;
}

struct Window {
    count: u64,
    reset_at: Instant,
}

/// Per-process fixed-window store. Used when no shared Redis store is
/// configured; counters then apply per instance.
pub struct MemoryStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn hit(&self, key: &str, window_secs: u64) -> anyhow::Result<Hit> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        // Expired windows are dropped on every hit so one-off clients do not
        // accumulate.
        windows.retain(|_, window| window.reset_at > now);

        let window = windows.entry(key.to_string()).or_insert_with(|| Window {
            count: 0,
            reset_at: now + Duration::from_secs(window_secs),
        });
        window.count += 1;

        let remaining = window.reset_at.saturating_duration_since(now);
        let mut retry_after_secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            retry_after_secs += 1;
        }
        Ok(Hit {
            count: window.count,
            retry_after_secs,
        })
    }
}

/// Shared store backed by Redis so counters hold across instances.
///
/// INCR and EXPIRE run in one Lua script; the TTL re-arm covers keys left
/// without an expiry by an earlier crash.
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

const HIT_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
  redis.call('EXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('TTL', KEYS[1])
if ttl < 0 then
  redis.call('EXPIRE', KEYS[1], ARGV[1])
  ttl = tonumber(ARGV[1])
end
return {count, ttl}
"#;

impl RedisStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RateLimitStore for RedisStore {
    async fn hit(&self, key: &str, window_secs: u64) -> anyhow::Result<Hit> {
        let mut conn = self.conn.clone();
        let script = redis::Script::new(HIT_SCRIPT);
        let (count, ttl): (u64, i64) = script
            .key(key)
            .arg(window_secs)
            .invoke_async(&mut conn)
            .await?;
        Ok(Hit {
            count,
            retry_after_secs: ttl.max(1) as u64,
        })
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Enforce `quota` for one named operation and client. Store failures
    /// fail open.
    pub async fn check(&self, name: &str, quota: Quota, client: &str) -> Result<(), AppError> {
        let key = format!("{name}:{client}");
        match self.store.hit(&key, quota.window_secs).await {
            Ok(hit) => {
                if hit.count > u64::from(quota.limit) {
                    tracing::warn!(rule = name, key = %key, count = hit.count, "rate limit exceeded");
                    return Err(AppError::RateLimited {
                        retry_after_secs: hit.retry_after_secs,
                    });
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, rule = name, "rate limit store failure");
                Ok(())
            }
        }
    }
}

/// Rate-limit client identity: first hop of `x-forwarded-for`, or a shared
/// bucket when the header is absent.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
