//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the backend and metadata
//! traits, so lookups can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use magnetar_core::testing::{fixtures, MockFinder};
//!
//! let finder = MockFinder::named("mock");
//! finder.set_results(fixtures::candidates(&["h1", "h2"])).await;
//!
//! // Register in an Aggregator...
//! ```

mod mock_finder;
mod mock_metadata;

pub use mock_finder::MockFinder;
pub use mock_metadata::MockMetadataProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::finder::{build_magnet_url, Candidate};

    /// Create a test candidate with reasonable defaults.
    pub fn candidate(name: &str, info_hash: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            title: "Test".to_string(),
            quality: "1080p".to_string(),
            info_hash: info_hash.to_string(),
            magnet_url: build_magnet_url(info_hash, "Test", &[]),
            seeders: 50,
            size: 1024 * 1024 * 1024, // 1 GB
            fuzzy: false,
        }
    }

    /// Create one candidate per hash, each named after its hash.
    pub fn candidates(info_hashes: &[&str]) -> Vec<Candidate> {
        info_hashes.iter().map(|h| candidate(h, h)).collect()
    }
}
