//! Service container for dependency injection
//!
//! Wires up the census service with its record source and selection rules.

use std::sync::Arc;

use crate::application::CensusService;
use crate::config::Settings;
use crate::domain::{LocationCanonicalizer, SelectionFilter};
use crate::infrastructure::traits::{JsonFileSource, RecordSource};

/// Container holding application settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Record source
    pub source: Arc<dyn RecordSource>,
}

impl ServiceContainer {
    /// Create a container reading the configured data file.
    pub fn new(settings: Settings) -> Self {
        let source = Arc::new(JsonFileSource::new(&settings.data_path));
        Self::with_source(settings, source)
    }

    /// Create a container with a custom record source (for testing).
    pub fn with_source(settings: Settings, source: Arc<dyn RecordSource>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, source }
    }

    pub fn selection_filter(&self) -> SelectionFilter {
        SelectionFilter::new(LocationCanonicalizer::with_unconfirmed(
            self.settings.include_unconfirmed_settlements,
        ))
    }

    pub fn census_service(&self) -> CensusService {
        CensusService::new(Arc::clone(&self.source), self.selection_filter())
    }
}
