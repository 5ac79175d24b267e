//! Server State
//!
//! Shared state handed to every handler.

use std::sync::Arc;
use std::time::Instant;

use crate::render::{Page, PageMode};
use crate::updater::Dashboard;

/// Shared state for all handlers
#[derive(Clone)]
pub struct ServerState {
    /// Page the updaters render into
    pub page: Arc<Page>,
    /// Dashboard whose routine status is reported by `/health`
    pub dashboard: Arc<Dashboard>,
    /// Presentation mode of the served page
    pub mode: PageMode,
    /// Meta refresh period of the served page; 0 disables it
    pub refresh_secs: u64,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(page: Arc<Page>, dashboard: Arc<Dashboard>, mode: PageMode, refresh_secs: u64) -> Self {
        Self {
            page,
            dashboard,
            mode,
            refresh_secs,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
