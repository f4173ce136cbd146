//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::CommentService;
use crate::config::Settings;
use crate::infrastructure::traits::{CommentSource, JsonFileSource};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Comment store abstraction
    pub source: Arc<dyn CommentSource>,
}

impl ServiceContainer {
    /// Create a new service container reading the configured data file.
    pub fn new(settings: Settings) -> Self {
        let source = Arc::new(JsonFileSource::new(settings.data_file.clone()));
        Self::with_deps(settings, source)
    }

    /// Create a service container with a custom source (for testing).
    pub fn with_deps(settings: Settings, source: Arc<dyn CommentSource>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, source }
    }

    pub fn comment_service(&self) -> CommentService {
        CommentService::new(Arc::clone(&self.source), self.settings.order)
    }
}
