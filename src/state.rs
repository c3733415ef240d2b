//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::page::MountedPages;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, Tera template engine, and the
/// registry of mounted status pages.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub pages: MountedPages,
}

impl AppState {
    /// Creates a new application state from the given configuration, templates, and page registry.
    pub fn new(config: AppConfig, tera: Tera, pages: MountedPages) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            pages,
        }
    }
}
