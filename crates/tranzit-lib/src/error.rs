use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the Tranzit library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A stop identifier was missing or blank.
    #[error("missing {field} stop id")]
    MissingStopId { field: &'static str },

    /// Raised when a stop identifier is not present in the stop catalog.
    #[error("unknown stop id: {stop_id}")]
    UnknownStop { stop_id: String },

    /// Raised when a latitude/longitude pair is out of range or not finite.
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Raised when the proximity threshold is negative or not finite.
    #[error("proximity threshold must be a non-negative number of meters, got {0}")]
    InvalidThreshold(f64),

    /// The transit data provider could not deliver a collection.
    #[error("upstream {resource} unavailable: {source}")]
    UpstreamUnavailable {
        resource: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// The transit data provider answered with a non-success status.
    #[error("upstream responded with status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Raised when no single trip connects the two stops.
    #[error("no direct route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Raised when the stop catalog is empty.
    #[error("no stops available for agency {agency_id}")]
    NoStopsAvailable { agency_id: String },

    /// Raised when the live client is requested without an API key.
    #[error("missing API key; set {env} or pass one explicitly")]
    MissingApiKey { env: &'static str },

    /// Raised when a snapshot file could not be located.
    #[error("snapshot not found at {path}")]
    SnapshotNotFound { path: PathBuf },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a provider failure while fetching `resource`.
    pub fn upstream(resource: &'static str, source: Error) -> Self {
        Error::UpstreamUnavailable {
            resource,
            source: Box::new(source),
        }
    }

    /// Caller supplied bad input (missing or unknown stop, bad coordinates).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::MissingStopId { .. }
                | Error::UnknownStop { .. }
                | Error::InvalidCoordinates { .. }
                | Error::InvalidThreshold(_)
        )
    }

    /// The transit data provider failed.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            Error::UpstreamUnavailable { .. } | Error::UpstreamStatus { .. } | Error::Http(_)
        )
    }

    /// The search completed without a result.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::RouteNotFound { .. } | Error::NoStopsAvailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_disjoint() {
        let invalid = Error::UnknownStop {
            stop_id: "42".to_string(),
        };
        let upstream = Error::upstream(
            "trips",
            Error::UpstreamStatus {
                status: 503,
                url: "http://example.invalid/trips".to_string(),
            },
        );
        let missing = Error::RouteNotFound {
            start: "1".to_string(),
            goal: "2".to_string(),
        };

        assert!(invalid.is_invalid_input());
        assert!(!invalid.is_upstream_unavailable());
        assert!(!invalid.is_not_found());

        assert!(upstream.is_upstream_unavailable());
        assert!(!upstream.is_invalid_input());
        assert!(!upstream.is_not_found());

        assert!(missing.is_not_found());
        assert!(!missing.is_invalid_input());
        assert!(!missing.is_upstream_unavailable());
    }

    #[test]
    fn upstream_message_names_resource_and_cause() {
        let err = Error::upstream(
            "stops",
            Error::UpstreamStatus {
                status: 401,
                url: "https://api.tranzy.ai/v1/opendata/stops".to_string(),
            },
        );
        let message = err.to_string();
        assert!(message.contains("upstream stops unavailable"));
        assert!(message.contains("401"));
    }
}
