//! Dashboard Updaters
//!
//! The five fetch → transform → render routines. Each one performs a
//! single request against the [`DashboardSource`], and on success replaces
//! its slots in the [`RenderTarget`]. Failures are logged and swallowed:
//! the slots keep whatever they showed before.
//!
//! ## Example
//!
//! ```rust,no_run
//! use roomwatch::client::ApiClient;
//! use roomwatch::config::SourceConfig;
//! use roomwatch::render::{Page, PageMode};
//! use roomwatch::updater::{Dashboard, Routine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&SourceConfig::default())?;
//!     let page = Arc::new(Page::new());
//!     let dashboard = Arc::new(Dashboard::new(Arc::new(client), page.clone()));
//!
//!     let handle = dashboard.spawn(Routine::RoomsStatus, PageMode::Security);
//!     handle.wait().await;
//!
//!     Ok(())
//! }
//! ```

mod handle;

pub use handle::{Routine, UpdateHandle, UpdateOutcome};

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::Instrument;

use crate::client::{DashboardSource, FetchError};
use crate::format::format_clock;
use crate::render::{views, PageMode, RenderTarget, Slot, Statistics};

/// Source of the wall-clock time written to the last-update slot
pub type Clock = Arc<dyn Fn() -> NaiveTime + Send + Sync>;

/// Bookkeeping for one routine
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoutineStatus {
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub total_failures: u64,
    pub last_error: Option<String>,
}

/// Runs the update routines against a source and a render target
pub struct Dashboard {
    source: Arc<dyn DashboardSource>,
    target: Arc<dyn RenderTarget>,
    clock: Clock,
    status: RwLock<BTreeMap<Routine, RoutineStatus>>,
}

impl Dashboard {
    /// Create a dashboard using the local wall clock
    pub fn new(source: Arc<dyn DashboardSource>, target: Arc<dyn RenderTarget>) -> Self {
        Self {
            source,
            target,
            clock: Arc::new(|| chrono::Local::now().time()),
            status: RwLock::new(BTreeMap::new()),
        }
    }

    /// Replace the clock used for the last-update slot
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Aggregate room and people counts into the two header counters
    pub async fn update_statistics(&self) -> UpdateOutcome {
        let result = self.source.fetch_rooms().await.map(|rooms| {
            let stats = Statistics::from_snapshot(&rooms);
            self.target.set_text(Slot::TotalRooms, stats.total_rooms.to_string());
            self.target.set_text(Slot::TotalPeople, stats.total_people.to_string());
        });

        self.finish(Routine::Statistics, result).await
    }

    /// Render one card per room, then stamp the last-update time
    pub async fn update_rooms_status(&self, mode: PageMode) -> UpdateOutcome {
        let result = self.source.fetch_rooms().await.map(|rooms| {
            self.target
                .set_html(Slot::RoomsStatus, views::rooms_status(&rooms, mode));
            self.target
                .set_text(Slot::LastUpdate, format_clock((self.clock)()));
        });

        self.finish(Routine::RoomsStatus, result).await
    }

    /// Render the active visits and their counter
    pub async fn update_active_visits(&self, mode: PageMode) -> UpdateOutcome {
        let result = self.source.fetch_active_visits().await.map(|visits| {
            self.target
                .set_text(Slot::ActiveVisitsCount, visits.len().to_string());
            self.target
                .set_html(Slot::ActiveVisitsList, views::active_visits(&visits, mode));
        });

        self.finish(Routine::ActiveVisits, result).await
    }

    /// Render the movement history rows
    pub async fn update_movements(&self, mode: PageMode) -> UpdateOutcome {
        let result = self.source.fetch_movements().await.map(|movements| {
            self.target
                .set_html(Slot::MovementsTable, views::movements(&movements, mode));
        });

        self.finish(Routine::Movements, result).await
    }

    /// Render the group movement history rows
    pub async fn update_group_movements(&self, mode: PageMode) -> UpdateOutcome {
        let result = self.source.fetch_group_movements().await.map(|movements| {
            self.target.set_html(
                Slot::GroupMovementsTable,
                views::group_movements(&movements, mode),
            );
        });

        self.finish(Routine::GroupMovements, result).await
    }

    /// Run one routine to completion
    pub async fn run(&self, routine: Routine, mode: PageMode) -> UpdateOutcome {
        match routine {
            Routine::Statistics => self.update_statistics().await,
            Routine::RoomsStatus => self.update_rooms_status(mode).await,
            Routine::ActiveVisits => self.update_active_visits(mode).await,
            Routine::Movements => self.update_movements(mode).await,
            Routine::GroupMovements => self.update_group_movements(mode).await,
        }
    }

    /// Run one routine on the runtime and return a handle to it
    pub fn spawn(self: &Arc<Self>, routine: Routine, mode: PageMode) -> UpdateHandle {
        let dashboard = Arc::clone(self);
        let span = tracing::debug_span!(
            "update",
            routine = routine.name(),
            request_id = %uuid::Uuid::new_v4()
        );

        let task = tokio::spawn(async move { dashboard.run(routine, mode).await }.instrument(span));
        UpdateHandle::new(routine, task)
    }

    /// Status of every routine that has run at least once
    pub async fn status(&self) -> BTreeMap<Routine, RoutineStatus> {
        self.status.read().await.clone()
    }

    /// Log and record the result of a routine
    async fn finish(&self, routine: Routine, result: Result<(), FetchError>) -> UpdateOutcome {
        let mut status = self.status.write().await;
        let entry = status.entry(routine).or_default();

        match result {
            Ok(()) => {
                tracing::debug!(routine = routine.name(), "Update rendered");
                entry.last_success = Some(Utc::now());
                entry.consecutive_failures = 0;
                UpdateOutcome::Rendered
            }
            Err(e) => {
                tracing::error!(routine = routine.name(), "{}: {}", routine.failure_message(), e);
                entry.last_failure = Some(Utc::now());
                entry.consecutive_failures += 1;
                entry.total_failures += 1;
                entry.last_error = Some(e.to_string());
                UpdateOutcome::Failed
            }
        }
    }
}
