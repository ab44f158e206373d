//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::config::Config;

/// How client requests are keyed for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitMode {
    /// No rate limiting. Used by tests and when `RATE_LIMIT_ENABLED=false`.
    Disabled,
    /// Key by the socket peer address.
    PeerIp,
    /// Key by `X-Forwarded-For` / `X-Real-IP`, falling back to the peer address.
    /// Only safe behind a trusted reverse proxy.
    Forwarded,
}

impl RateLimitMode {
    pub fn from_config(config: &Config) -> Self {
        match (config.rate_limit_enabled, config.behind_proxy) {
            (false, _) => Self::Disabled,
            (true, false) => Self::PeerIp,
            (true, true) => Self::Forwarded,
        }
    }
}

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
struct Quota {
    per_second: u64,
    burst_size: u32,
}

/// Limits for the bookmark API.
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
const API_QUOTA: Quota = Quota {
    per_second: 2,
    burst_size: 100,
};

/// Stricter limits for credential endpoints (`/register`, `/login`, `/token/refresh`).
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
const AUTH_QUOTA: Quota = Quota {
    per_second: 1,
    burst_size: 10,
};

fn governor_layer<K>(
    extractor: K,
    quota: Quota,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(quota.per_second)
            .burst_size(quota.burst_size)
            .key_extractor(extractor)
            .finish()
            .expect("rate limit quota constants are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

fn apply<S>(router: Router<S>, mode: RateLimitMode, quota: Quota) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match mode {
        RateLimitMode::Disabled => router,
        RateLimitMode::PeerIp => router.layer(governor_layer(PeerIpKeyExtractor, quota)),
        RateLimitMode::Forwarded => router.layer(governor_layer(SmartIpKeyExtractor, quota)),
    }
}

/// Applies the bookmark API limits to `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Keyed modes
/// require the server to be started with connect info.
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::api(api::routes::protected_routes(), mode);
/// ```
pub fn api<S>(router: Router<S>, mode: RateLimitMode) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    apply(router, mode, API_QUOTA)
}

/// Applies the credential endpoint limits to `router`.
pub fn auth<S>(router: Router<S>, mode: RateLimitMode) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    apply(router, mode, AUTH_QUOTA)
}
