//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::services::ContactService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; configuration is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    contact: ContactService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig, contact: ContactService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, contact }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the contact form service.
    #[must_use]
    pub fn contact(&self) -> &ContactService {
        &self.inner.contact
    }
}
