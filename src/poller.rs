//! Update Poller
//!
//! Triggers every update routine on its own interval. Each tick spawns a
//! fresh update; what happens to a still-pending update from the previous
//! tick is decided by the [`OverlapPolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::config::PollConfig;
use crate::render::PageMode;
use crate::updater::{Dashboard, Routine, UpdateHandle};

/// Handling of a routine that comes due while its previous update is pending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Let both run; a late response may overwrite a newer one
    Allow,
    /// Abort the pending update before starting the next one
    #[default]
    Supersede,
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Allow => f.write_str("allow"),
            OverlapPolicy::Supersede => f.write_str("supersede"),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(OverlapPolicy::Allow),
            "supersede" => Ok(OverlapPolicy::Supersede),
            other => Err(format!("Unknown overlap policy: {}", other)),
        }
    }
}

/// Periodic driver of the dashboard routines
pub struct Poller {
    dashboard: Arc<Dashboard>,
    config: PollConfig,
    mode: PageMode,
    running: watch::Sender<bool>,
}

impl Poller {
    pub fn new(dashboard: Arc<Dashboard>, config: PollConfig, mode: PageMode) -> Self {
        Self {
            dashboard,
            config,
            mode,
            running: watch::Sender::new(false),
        }
    }

    /// Start polling every routine. The returned task ends after
    /// [`stop`](Self::stop); aborting it stops polling immediately.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        self.running.send_replace(true);

        tokio::spawn(async move {
            tracing::info!(
                mode = %self.mode,
                overlap = %self.config.overlap,
                "Poller started"
            );

            let mut loops = JoinSet::new();
            for routine in Routine::ALL {
                let poller = Arc::clone(&self);
                loops.spawn(async move { poller.poll_routine(routine).await });
            }

            while let Some(result) = loops.join_next().await {
                if let Err(e) = result {
                    if e.is_panic() {
                        tracing::error!("Polling loop panicked: {}", e);
                    }
                }
            }

            tracing::info!("Poller stopped");
        })
    }

    /// Stop polling. Every loop exits without waiting for its next tick.
    pub fn stop(&self) {
        self.running.send_replace(false);
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    async fn poll_routine(&self, routine: Routine) {
        let mut interval = tokio::time::interval(self.config.interval_for(routine));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut running = self.running.subscribe();
        if !*running.borrow() {
            return;
        }

        let mut in_flight: Option<UpdateHandle> = None;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                changed = running.changed() => {
                    if changed.is_err() || !*running.borrow() {
                        break;
                    }
                    continue;
                }
            }

            if let Some(previous) = in_flight.take() {
                if self.config.overlap == OverlapPolicy::Supersede && !previous.is_finished() {
                    tracing::debug!(routine = routine.name(), "Superseding pending update");
                    previous.abort();
                }
            }

            in_flight = Some(self.dashboard.spawn(routine, self.mode));
        }

        if self.config.overlap == OverlapPolicy::Supersede {
            if let Some(pending) = in_flight {
                pending.abort();
            }
        }
    }
}
