mod common;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use std::net::SocketAddr;
use tower::{Layer, ServiceExt};
use wayback_relay::application::Backends;
use wayback_relay::config::Options;
use wayback_relay::routes::app_router;

use common::create_test_state;

#[derive(Clone)]
struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

fn empty_submit(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_submit_is_rate_limited_after_burst() {
    let (state, _metrics) = create_test_state(Options::default(), Backends::new());
    let app = MockConnectInfoLayer.layer(app_router(state, false));

    for _ in 0..20 {
        let response = app.clone().oneshot(empty_submit("/w")).await.unwrap();
        assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED);
    }

    let response = app.clone().oneshot(empty_submit("/w")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_trailing_slash_reaches_submit() {
    let (state, _metrics) = create_test_state(Options::default(), Backends::new());
    let app = MockConnectInfoLayer.layer(app_router(state, false));

    let response = app.oneshot(empty_submit("/w/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED);
}
