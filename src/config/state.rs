// Application state module
// Shared state handed to every connection task

use super::types::{Config, RoutesConfig};

/// Application state
///
/// Constructed once at startup and shared immutably across connection
/// tasks. The route table inside never changes after construction, so
/// handlers read it without locks.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub const fn routes(&self) -> &RoutesConfig {
        &self.config.routes
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
