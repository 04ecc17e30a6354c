//! Test utilities for microservice handler testing.
//!
//! Handlers are exercised against the JSON snapshot fixture so tests never
//! touch the network.

use std::path::PathBuf;
use std::sync::OnceLock;

use tranzit_lib::TransitConfig;

use crate::state::AppState;

/// Path to the shared snapshot fixture.
pub const TEST_FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/tranzy_snapshot.json"
);

static TEST_STATE: OnceLock<AppState> = OnceLock::new();

/// Shared state backed by the fixture snapshot, loaded once per test binary.
///
/// # Panics
///
/// Panics if the fixture cannot be loaded, which is a test setup problem.
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| {
            let config = TransitConfig::default().with_snapshot(fixture_snapshot_path());
            AppState::from_config(config).unwrap_or_else(|e| {
                panic!("failed to load test fixture from {}: {}", TEST_FIXTURE_PATH, e)
            })
        })
        .clone()
}

pub fn fixture_snapshot_path() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_PATH)
}

/// Stop and trip ids present in the fixture.
pub mod fixture_stops {
    /// Piata Romana, the first stop of line 24 outbound.
    pub const PIATA_ROMANA: &str = "4587";

    /// Piata Amzei, one stop after Piata Romana on trip 24_0.
    pub const PIATA_AMZEI: &str = "4611";

    /// Piata Iancului, served by trips 24_0 and 99_0.
    pub const PIATA_IANCULUI: &str = "4650";

    /// Vatra Luminoasa, the last stop of trip 99_0.
    pub const VATRA_LUMINOASA: &str = "4700";

    /// Depot far from every shape.
    pub const DEPOU_MILITARI: &str = "9001";

    /// Id no agency publishes.
    pub const UNKNOWN: &str = "123456";

    /// Outbound trip of line 24.
    pub const TRIP_24_OUTBOUND: &str = "24_0";

    /// Trip whose route has no metadata entry.
    pub const TRIP_99: &str = "99_0";
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path_exists() {
        let path = fixture_snapshot_path();
        assert!(path.exists(), "fixture snapshot not found at {:?}", path);
    }

    #[test]
    fn test_state_serves_fixture_snapshot() {
        let state = test_state();
        assert_eq!(state.source().name(), "snapshot");

        let stops = state.source().stops(state.default_agency()).unwrap();
        assert!(stops
            .iter()
            .any(|stop| stop.stop_id == fixture_stops::PIATA_ROMANA));
    }

    #[test]
    fn test_request_id_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
