//! Rate Limiter (Token Bucket Algorithm)
//!
//! Bounds mutating RPC calls per second. Read-only methods are not limited.

use std::sync::Mutex;
use std::time::Instant;

/// Token bucket shared by all connections
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    burst: f64,
    per_sec: f64,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `burst` - Maximum burst size (bucket capacity)
    /// * `per_sec` - Tokens added per second
    ///
    /// A `burst` of 0 disables limiting.
    pub fn new(burst: u32, per_sec: u32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: f64::from(burst),
                last_refill: Instant::now(),
            }),
            burst: f64::from(burst),
            per_sec: f64::from(per_sec),
        }
    }

    /// Take one token; false when the caller should be throttled
    pub fn try_acquire(&self) -> bool {
        if self.burst == 0.0 {
            return true;
        }

        // A poisoned bucket still holds a valid token count
        let mut bucket = self
            .bucket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.per_sec).min(self.burst);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
