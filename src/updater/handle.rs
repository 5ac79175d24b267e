//! Routine identifiers and in-flight update handles.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tokio::task::JoinHandle;

/// The five dashboard update routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Routine {
    Statistics,
    RoomsStatus,
    ActiveVisits,
    Movements,
    GroupMovements,
}

impl Routine {
    pub const ALL: [Routine; 5] = [
        Routine::Statistics,
        Routine::RoomsStatus,
        Routine::ActiveVisits,
        Routine::Movements,
        Routine::GroupMovements,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Routine::Statistics => "statistics",
            Routine::RoomsStatus => "rooms_status",
            Routine::ActiveVisits => "active_visits",
            Routine::Movements => "movements",
            Routine::GroupMovements => "group_movements",
        }
    }

    /// Log message for a failed update
    pub fn failure_message(&self) -> &'static str {
        match self {
            Routine::Statistics => "Ошибка обновления статистики",
            Routine::RoomsStatus => "Ошибка обновления статуса комнат",
            Routine::ActiveVisits => "Ошибка обновления активных посещений",
            Routine::Movements => "Ошибка обновления перемещений",
            Routine::GroupMovements => "Ошибка обновления групповых перемещений",
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Routine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "statistics" | "stats" => Ok(Routine::Statistics),
            "rooms_status" | "rooms" => Ok(Routine::RoomsStatus),
            "active_visits" | "visits" => Ok(Routine::ActiveVisits),
            "movements" => Ok(Routine::Movements),
            "group_movements" | "groups" => Ok(Routine::GroupMovements),
            other => Err(format!("Unknown routine: {}", other)),
        }
    }
}

/// Result of one routine invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOutcome {
    /// Data was fetched and the slots were replaced
    Rendered,
    /// The fetch failed; slots were left as they were
    Failed,
}

/// Handle to an update running on the runtime.
///
/// Dropping the handle detaches the update; [`abort`](Self::abort) cancels
/// it. A cancelled update never writes to the page after its fetch.
#[derive(Debug)]
pub struct UpdateHandle {
    routine: Routine,
    task: JoinHandle<UpdateOutcome>,
}

impl UpdateHandle {
    pub(crate) fn new(routine: Routine, task: JoinHandle<UpdateOutcome>) -> Self {
        Self { routine, task }
    }

    pub fn routine(&self) -> Routine {
        self.routine
    }

    /// Cancel the update if it is still pending
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the update. Returns `None` if it was cancelled.
    pub async fn wait(self) -> Option<UpdateOutcome> {
        match self.task.await {
            Ok(outcome) => Some(outcome),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::error!(routine = %self.routine, "Update task panicked: {}", e);
                None
            }
        }
    }
}
