//! Application state for HTTP microservices.
//!
//! Handlers reach the transit data source, the configured finder and the
//! default agency through the shared state.

use std::sync::Arc;

use tranzit_lib::{
    open_source, DirectRouteFinder, Error as LibError, TransitConfig, TransitSource,
};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The configured proximity threshold is unusable.
    InvalidThreshold(LibError),

    /// The transit data source could not be opened.
    SourceUnavailable(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold(e) => write!(f, "invalid proximity threshold: {}", e),
            Self::SourceUnavailable(e) => write!(f, "failed to open transit data source: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidThreshold(e) | Self::SourceUnavailable(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); share it via axum's `State`
/// extractor. Source calls block, so handlers run them on
/// `tokio::task::spawn_blocking`.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use tranzit_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let source = state.source();
///     // ... run the planner on a blocking thread
/// }
///
/// let state = AppState::from_config(TransitConfig::from_env()).unwrap();
/// let app = Router::new()
///     .route("/api/v1/route", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    source: Arc<dyn TransitSource>,
    finder: DirectRouteFinder,
    config: TransitConfig,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// Opens the snapshot named by `snapshot_path` when set, the live API
    /// client otherwise. Blocking: call it outside the async runtime or on a
    /// blocking thread.
    pub fn from_config(config: TransitConfig) -> Result<Self, AppStateError> {
        let finder = DirectRouteFinder::new(config.proximity_meters)
            .map_err(AppStateError::InvalidThreshold)?;
        let source: Arc<dyn TransitSource> =
            Arc::from(open_source(&config).map_err(AppStateError::SourceUnavailable)?);

        tracing::info!(
            source = source.name(),
            agency_id = %config.agency_id,
            proximity_meters = finder.threshold_meters(),
            "transit data source ready"
        );

        Ok(Self::from_parts(source, finder, config))
    }

    /// Create state from an already opened source.
    ///
    /// This is useful for testing or for embedding a custom source.
    pub fn from_source(
        source: Arc<dyn TransitSource>,
        config: TransitConfig,
    ) -> Result<Self, AppStateError> {
        let finder = DirectRouteFinder::new(config.proximity_meters)
            .map_err(AppStateError::InvalidThreshold)?;
        Ok(Self::from_parts(source, finder, config))
    }

    fn from_parts(
        source: Arc<dyn TransitSource>,
        finder: DirectRouteFinder,
        config: TransitConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                source,
                finder,
                config,
            }),
        }
    }

    /// Shared handle to the transit data source.
    pub fn source(&self) -> Arc<dyn TransitSource> {
        Arc::clone(&self.inner.source)
    }

    pub fn finder(&self) -> DirectRouteFinder {
        self.inner.finder
    }

    pub fn config(&self) -> &TransitConfig {
        &self.inner.config
    }

    /// Agency used when a request does not name one.
    pub fn default_agency(&self) -> &str {
        &self.inner.config.agency_id
    }

    /// Resolve a request's optional agency against the default.
    pub fn agency_or_default(&self, agency_id: Option<&str>) -> String {
        agency_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.default_agency())
            .to_string()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("source", &self.inner.source.name())
            .field("agency_id", &self.inner.config.agency_id)
            .field("proximity_meters", &self.inner.finder.threshold_meters())
            .finish()
    }
}
