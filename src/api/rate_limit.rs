//! Rate Limiting
//!
//! Fixed-window request limiter applied per client as axum middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ToneError;

/// Most client windows tracked at once.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Bucket shared by new clients once the table is full.
const OVERFLOW_CLIENT: &str = "overflow";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window resets
    pub reset_after: Duration,
}

impl RateDecision {
    /// Writes the `RateLimit-*` headers.
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert("ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("ratelimit-remaining", HeaderValue::from(self.remaining));
        headers.insert(
            "ratelimit-reset",
            HeaderValue::from(self.reset_after.as_secs().max(1)),
        );
    }
}

#[derive(Debug)]
struct Clients {
    windows: HashMap<String, Window>,
    /// Last time stale windows were dropped
    last_prune: Instant,
}

// == Rate Limiter ==
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<Clients>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(Clients {
                windows: HashMap::new(),
                last_prune: Instant::now(),
            }),
        }
    }

    /// Number of client windows currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .windows
            .len()
    }

    /// Counts one request for `client` and decides whether it may proceed.
    pub fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        let mut guard = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        let clients = &mut *guard;

        // At most one full scan per window
        if now.saturating_duration_since(clients.last_prune) >= self.window {
            let window = self.window;
            clients
                .windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            clients.last_prune = now;
        }

        let client = if clients.windows.contains_key(client)
            || clients.windows.len() < MAX_TRACKED_CLIENTS
        {
            client
        } else {
            OVERFLOW_CLIENT
        };

        let entry = clients.windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        let allowed = entry.count < self.max_requests;
        if allowed {
            entry.count += 1;
        }

        RateDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_after: self
                .window
                .saturating_sub(now.saturating_duration_since(entry.started)),
        }
    }
}

/// Identifies the caller by API key, falling back to the peer address.
fn client_key(request: &Request) -> String {
    if let Some(key) = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
    {
        return format!("key:{key}");
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| format!("ip:{}", addr.ip()))
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Middleware rejecting callers over their limit with 429.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let decision = limiter.check(&client);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
        ToneError::TooManyRequests.into_response()
    };

    decision.apply_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        let remaining: Vec<u32> = (0..3).map(|_| limiter.check_at("a", now).remaining).collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let blocked = limiter.check_at("a", now);
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("a", start).allowed);
        assert!(!limiter.check_at("a", start + Duration::from_secs(59)).allowed);

        let next_window = limiter.check_at("a", start + Duration::from_secs(60));
        assert!(next_window.allowed);
        assert_eq!(next_window.reset_after, Duration::from_secs(60));
    }

    #[test]
    fn test_rotated_keys_stay_bounded() {
        let limiter = RateLimiter::new(5, Duration::from_secs(900));
        let now = Instant::now();

        for i in 0..30_000 {
            limiter.check_at(&format!("key:rotated-{i}"), now);
        }

        // Full table plus the shared overflow bucket
        assert_eq!(limiter.tracked_clients(), MAX_TRACKED_CLIENTS + 1);
    }

    #[test]
    fn test_overflow_clients_share_a_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(900));
        let now = Instant::now();

        for i in 0..MAX_TRACKED_CLIENTS {
            limiter.check_at(&format!("ip:{i}"), now);
        }

        assert!(limiter.check_at("key:late-1", now).allowed);
        assert!(limiter.check_at("key:late-2", now).allowed);
        assert!(!limiter.check_at("key:late-3", now).allowed);

        // Clients admitted before the table filled keep their own window
        assert!(limiter.check_at("ip:0", now).allowed);
    }

    #[test]
    fn test_stale_windows_pruned_once_per_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        limiter.check_at("a", start);
        limiter.check_at("b", start);
        assert_eq!(limiter.tracked_clients(), 2);

        let later = start + Duration::from_secs(120);
        limiter.check_at("c", later);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_headers() {
        let decision = RateDecision {
            allowed: true,
            limit: 100,
            remaining: 42,
            reset_after: Duration::from_secs(90),
        };
        let mut headers = HeaderMap::new();
        decision.apply_headers(&mut headers);

        assert_eq!(headers["ratelimit-limit"], "100");
        assert_eq!(headers["ratelimit-remaining"], "42");
        assert_eq!(headers["ratelimit-reset"], "90");
    }
}
