//! Service container for dependency injection
//!
//! Wires settings and I/O implementations into chart services.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{ChartLoader, ChartService};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Chart file reader over the injected filesystem
    pub loader: ChartLoader,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            loader: ChartLoader::new(fs),
        }
    }

    /// Load the chart from `chart` (or the configured `chart_file`) and wrap
    /// it in a service using the configured history options.
    pub fn chart_service(&self, chart: Option<&Path>) -> ApplicationResult<ChartService> {
        let path = chart
            .or(self.settings.chart_file.as_deref())
            .ok_or(ApplicationError::NoChart)?;
        debug!(path = %path.display(), options = ?self.settings.history, "opening chart");
        let ceo = self.loader.load(path)?;
        ChartService::from_employee(&ceo, self.settings.history)
    }
}
