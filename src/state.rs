//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::history::HistoryStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration and the history store. Handlers
/// only see the [`HistoryStore`] trait, so tests can swap in an in-memory
/// SQLite instance.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    /// Creates a new application state from the given configuration and store.
    pub fn new(config: AppConfig, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            config: Arc::new(config),
            history,
        }
    }
}
