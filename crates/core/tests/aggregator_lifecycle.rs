//! Aggregator integration tests.
//!
//! These tests wire real backends (a cache-backed Pirate Bay finder that
//! never reaches the network) together with mock finders and verify the
//! merged lookup behavior end to end.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use magnetar_core::{
    testing::{fixtures, MockFinder, MockMetadataProvider},
    Aggregator, Candidate, LookupError, MagnetFinder, PirateBayConfig, PirateBayFinder,
    ResponseCache, SqliteCache,
};

/// Test helper holding the backends registered with the aggregator.
struct TestHarness {
    cache: Arc<SqliteCache>,
    pirate_bay: Arc<PirateBayFinder>,
    mock: Arc<MockFinder>,
    _temp_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = Arc::new(
            SqliteCache::new(&temp_dir.path().join("cache.db")).expect("Failed to create cache"),
        );

        let metadata = MockMetadataProvider::new();
        metadata.add_movie("tt0133093", "The Matrix", 1999).await;
        metadata.add_series("tt0944947", "Game of Thrones", 2011).await;

        let config = PirateBayConfig {
            // Nothing listens here, so only cached lookups succeed.
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..PirateBayConfig::default()
        };
        let pirate_bay = Arc::new(
            PirateBayFinder::new(
                &config,
                Arc::clone(&cache) as Arc<dyn ResponseCache>,
                Arc::new(metadata),
            )
            .expect("Failed to create finder"),
        );

        Self {
            cache,
            pirate_bay,
            mock: Arc::new(MockFinder::named("mock")),
            _temp_dir: temp_dir,
        }
    }

    fn aggregator(&self, timeout: Duration) -> Aggregator {
        Aggregator::new(
            vec![
                Arc::clone(&self.pirate_bay) as Arc<dyn MagnetFinder>,
                Arc::clone(&self.mock) as Arc<dyn MagnetFinder>,
            ],
            timeout,
        )
    }
}

fn hashes(candidates: &[Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.info_hash.as_str()).collect()
}

#[tokio::test]
async fn test_cached_and_live_backends_are_merged_in_registration_order() {
    let harness = TestHarness::new().await;
    harness
        .cache
        .set("tt0133093-TPB", &fixtures::candidates(&["h1", "h2"]))
        .unwrap();
    harness
        .mock
        .set_results(vec![
            fixtures::candidate("mock-h2", "h2"),
            fixtures::candidate("mock-h3", "h3"),
        ])
        .await;

    let results = harness
        .aggregator(Duration::from_secs(2))
        .find_movie("tt0133093", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(hashes(&results), vec!["h1", "h2", "h3"]);
    assert_eq!(results[1].name, "h2");
}

#[tokio::test]
async fn test_unreachable_backend_does_not_fail_lookup() {
    let harness = TestHarness::new().await;
    harness
        .mock
        .set_results(fixtures::candidates(&["e1"]))
        .await;

    // No cache entry for the episode, so the Pirate Bay backend errors out.
    let results = harness
        .aggregator(Duration::from_secs(3))
        .find_episode("tt0944947", 1, 2, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(hashes(&results), vec!["e1"]);
    assert_eq!(harness.mock.call_count().await, 1);
}

#[tokio::test]
async fn test_every_backend_failing_reports_each_failure() {
    let harness = TestHarness::new().await;
    harness.mock.set_error("service unavailable").await;

    // Unknown title: the metadata lookup fails before any request is sent.
    let err = harness
        .aggregator(Duration::from_secs(2))
        .find_movie("tt9999999", &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        LookupError::AllBackendsFailed(ref failures) => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].backend, "pirate_bay");
            assert_eq!(failures[1].backend, "mock");
        }
        other => panic!("Expected AllBackendsFailed, got {:?}", other),
    }
    let message = err.to_string();
    assert!(message.starts_with("couldn't find torrents on any backend"));
    assert!(message.contains("service unavailable"));
}

#[tokio::test]
async fn test_slow_backend_is_dropped_after_timeout() {
    let harness = TestHarness::new().await;
    harness
        .cache
        .set("tt0133093-TPB", &fixtures::candidates(&["h1"]))
        .unwrap();
    harness
        .mock
        .set_results(fixtures::candidates(&["late"]))
        .await;
    harness.mock.set_delay(Duration::from_secs(10)).await;

    let start = std::time::Instant::now();
    let results = harness
        .aggregator(Duration::from_millis(200))
        .find_movie("tt0133093", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(hashes(&results), vec!["h1"]);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_shutdown_cancels_pending_lookup() {
    let harness = TestHarness::new().await;
    harness.mock.set_delay(Duration::from_secs(10)).await;
    let aggregator = harness.aggregator(Duration::from_secs(30));

    let shutdown = CancellationToken::new();
    let request_token = shutdown.child_token();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = aggregator
        .find_movie("tt0133093", &request_token)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Cancelled));
}
