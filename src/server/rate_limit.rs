//! In-memory rate limiting
//!
//! Sliding-window limiter keyed by client identity. State is per-process and
//! scoped to the HTTP layer; the booking engine stays stateless.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sliding-window request limiter, one window per client.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<LimiterState>>,
}

struct LimiterState {
    limit: usize,
    window: Duration,
    hits: HashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(LimiterState {
                limit,
                window,
                hits: HashMap::new(),
            })),
        }
    }

    /// 5 bookings per client per hour.
    pub fn for_bookings() -> Self {
        Self::new(5, Duration::from_secs(3600))
    }

    /// 60 chat messages per client per hour.
    pub fn for_chat() -> Self {
        Self::new(60, Duration::from_secs(3600))
    }

    /// Record a request for `client` and report whether it is allowed.
    pub fn allow(&self, client: &str) -> bool {
        let mut state = self.state.lock().expect("rate limit lock");
        let now = Instant::now();
        let window = state.window;
        let limit = state.limit;

        // Drop windows that have fully expired so idle clients don't pin memory.
        state.hits.retain(|_, hits| {
            while let Some(front) = hits.front() {
                if now.duration_since(*front) > window {
                    hits.pop_front();
                } else {
                    break;
                }
            }
            !hits.is_empty()
        });

        let hits = state.hits.entry(client.to_string()).or_default();
        if hits.len() >= limit {
            return false;
        }

        hits.push_back(now);
        true
    }
}
