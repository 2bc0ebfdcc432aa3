//! Per-IP rate limiting built on governor.
//!
//! The whole API sits behind a relaxed per-IP limiter; the
//! design-generation endpoint hits an external image service, so it gets
//! a stricter keyed limiter of its own. Requests without a resolvable
//! client IP share one bucket.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};

use crate::error::AppError;

/// Keyed per-IP rate limiter.
pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Limiter for design generation: 10 requests per minute per IP.
///
/// # Panics
///
/// Does not panic; the quota constant is non-zero.
#[must_use]
pub fn design_rate_limiter() -> Arc<IpRateLimiter> {
    let per_minute = NonZeroU32::new(10).expect("quota of 10 per minute is non-zero");
    Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute)))
}

/// General API limiter: 100 requests per minute per IP.
///
/// # Panics
///
/// Does not panic; the quota constant is non-zero.
#[must_use]
pub fn api_rate_limiter() -> Arc<IpRateLimiter> {
    let per_minute = NonZeroU32::new(100).expect("quota of 100 per minute is non-zero");
    Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute)))
}

/// Middleware that rejects requests over the per-IP quota with 429.
pub async fn limit_by_ip(
    State(limiter): State<Arc<IpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers()).unwrap_or(IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.check_key(&ip).is_err() {
        tracing::debug!(%ip, "Rate limit exceeded");
        return AppError::RateLimited.into_response();
    }

    next.run(request).await
}

/// Resolve the client IP from proxy headers, first match wins.
fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    // X-Forwarded-For carries a chain; the first entry is the client
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
    {
        return Some(ip);
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_ip(&headers), Some("203.0.113.9".parse().unwrap()));
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_ip(&headers), Some("198.51.100.2".parse().unwrap()));
    }

    #[test]
    fn test_client_ip_none_without_headers() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_limiter_allows_burst_then_blocks() {
        let limiter = design_rate_limiter();
        let ip: IpAddr = "203.0.113.9".parse().unwrap();

        for _ in 0..10 {
            assert!(limiter.check_key(&ip).is_ok());
        }
        assert!(limiter.check_key(&ip).is_err());

        // A different key has its own bucket
        let other: IpAddr = "203.0.113.10".parse().unwrap();
        assert!(limiter.check_key(&other).is_ok());
    }
}
