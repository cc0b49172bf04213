//! Per-client rate limiting using the token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Sustained requests per second per client.
const PER_SECOND: u64 = 2;

/// Burst allowed on the submission endpoint. Each submission fans out to
/// every archive slot, so the burst stays small.
pub const SUBMIT_BURST: u32 = 20;

/// Burst allowed on pages.
pub const PAGE_BURST: u32 = 100;

fn governor<K>(key_extractor: K, burst: u32) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(PER_SECOND)
            .burst_size(burst)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Limits `router` to [`PER_SECOND`] requests per second with the given burst.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: the socket peer address
/// - `behind_proxy = true`: `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
///   falling back to the peer address
///
/// Either way the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Example
///
/// ```rust,ignore
/// let submit = rate_limit::limit(
///     Router::new().route("/w", post(submit_handler)),
///     options.behind_proxy,
///     rate_limit::SUBMIT_BURST,
/// );
/// ```
pub fn limit<S>(router: Router<S>, behind_proxy: bool, burst: u32) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(governor(SmartIpKeyExtractor, burst))
    } else {
        router.layer(governor(PeerIpKeyExtractor, burst))
    }
}
