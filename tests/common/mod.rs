#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wayback_relay::api::handlers::{health_handler, not_found_handler};
use wayback_relay::api::routes::submit_routes;
use wayback_relay::application::Backends;
use wayback_relay::config::Options;
use wayback_relay::domain::entities::{AggregateResult, ChannelKind};
use wayback_relay::domain::ports::{
    Broker, BrokerError, PublishError, PublishMetrics, PublishStatus, Publisher,
};
use wayback_relay::infrastructure::render::TemplateRenderer;
use wayback_relay::state::AppState;
use wayback_relay::web::routes::public_routes;

/// Broker archiving every URL under a fixed prefix.
pub struct PrefixBroker {
    prefix: &'static str,
    calls: AtomicUsize,
}

impl PrefixBroker {
    pub fn new(prefix: &'static str) -> Arc<Self> {
        Arc::new(Self {
            prefix,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Broker for PrefixBroker {
    async fn archive(&self, urls: &[String]) -> Result<HashMap<String, String>, BrokerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(urls
            .iter()
            .map(|url| (url.clone(), format!("{}{url}", self.prefix)))
            .collect())
    }
}

/// Publisher remembering the texts it delivered.
#[derive(Default)]
pub struct RecordingPublisher {
    texts: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, _records: &AggregateResult, text: &str) -> Result<(), PublishError> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Publisher that always fails.
pub struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish(&self, _records: &AggregateResult, _text: &str) -> Result<(), PublishError> {
        Err(PublishError::Rejected("channel not found".to_string()))
    }
}

/// Publisher that never answers.
pub struct StalledPublisher;

#[async_trait]
impl Publisher for StalledPublisher {
    async fn publish(&self, _records: &AggregateResult, _text: &str) -> Result<(), PublishError> {
        std::future::pending().await
    }
}

/// Metrics sink counting increments per channel and status.
#[derive(Default)]
pub struct CountingMetrics {
    counts: Mutex<HashMap<(ChannelKind, PublishStatus), usize>>,
}

impl CountingMetrics {
    pub fn count(&self, channel: ChannelKind, status: PublishStatus) -> usize {
        self.counts
            .lock()
            .unwrap()
            .get(&(channel, status))
            .copied()
            .unwrap_or(0)
    }
}

impl PublishMetrics for CountingMetrics {
    fn increment_publish(&self, channel: ChannelKind, status: PublishStatus) {
        *self
            .counts
            .lock()
            .unwrap()
            .entry((channel, status))
            .or_insert(0) += 1;
    }
}

/// Options enabling `channels` with placeholder credentials.
pub fn options_with_channels(channels: &[ChannelKind]) -> Options {
    channels.iter().fold(Options::default(), |options, &kind| {
        let credentials = kind
            .required_credentials()
            .iter()
            .map(|key| (*key, "test-credential".to_string()));
        options.with_channel(kind, credentials)
    })
}

pub fn create_test_state(options: Options, backends: Backends) -> (AppState, Arc<CountingMetrics>) {
    let metrics = Arc::new(CountingMetrics::default());
    let state = AppState::new(
        Arc::new(options),
        backends,
        Arc::new(TemplateRenderer::new()),
        metrics.clone(),
        CancellationToken::new(),
    );

    (state, metrics)
}

/// All routes without rate limiting (no peer address in tests).
pub fn create_test_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(submit_routes())
        .merge(public_routes())
        .fallback(not_found_handler)
        .with_state(state)
}

/// Waits until every detached publish job has finished.
pub async fn wait_for_publish(state: &AppState) {
    for _ in 0..500 {
        if state.publish_service.in_flight() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("publish jobs did not finish");
}

/// Waits until `metrics` has counted `expected` increments for `channel`.
pub async fn wait_for_metric(
    metrics: &CountingMetrics,
    channel: ChannelKind,
    status: PublishStatus,
    expected: usize,
) {
    for _ in 0..500 {
        if metrics.count(channel, status) >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("metric {channel} {status:?} never reached {expected}");
}
