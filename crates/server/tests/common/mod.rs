//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! backed by mock finders, so lookups can be exercised without network
//! access.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use magnetar_core::{testing::MockFinder, Aggregator, Config, MagnetFinder};

/// Re-export fixtures for test convenience
pub use magnetar_core::testing::fixtures;

/// Test fixture for API testing with mock backends.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_movie_lookup() {
///     let fixture = TestFixture::new().await;
///     fixture.primary.set_results(fixtures::candidates(&["h1"])).await;
///
///     let response = fixture.get("/api/v1/movies/tt0133093/torrents").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// First registered backend
    pub primary: Arc<MockFinder>,
    /// Second registered backend
    pub secondary: Arc<MockFinder>,
    /// Server shutdown token
    pub shutdown: CancellationToken,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with two mock backends and a 1s time budget.
    pub async fn new() -> Self {
        Self::with_timeout(Duration::from_secs(1)).await
    }

    /// Create a fixture with a custom per-backend time budget.
    pub async fn with_timeout(timeout: Duration) -> Self {
        let primary = Arc::new(MockFinder::named("primary"));
        let secondary = Arc::new(MockFinder::named("secondary"));

        let aggregator = Aggregator::new(
            vec![
                Arc::clone(&primary) as Arc<dyn MagnetFinder>,
                Arc::clone(&secondary) as Arc<dyn MagnetFinder>,
            ],
            timeout,
        );

        let shutdown = CancellationToken::new();
        let state = Arc::new(magnetar_server::state::AppState::new(
            Config::default(),
            Arc::new(aggregator),
            shutdown.clone(),
        ));

        let router = magnetar_server::api::create_router(state);

        Self {
            router,
            primary,
            secondary,
            shutdown,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
