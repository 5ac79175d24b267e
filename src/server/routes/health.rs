//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Routine status and uptime

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::render::PageMode;
use crate::server::state::ServerState;
use crate::updater::{Routine, RoutineStatus};

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, unhealthy
    pub status: String,
    pub mode: PageMode,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
    /// Routines that have run at least once
    pub routines: BTreeMap<Routine, RoutineStatus>,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Degraded while some routines are failing, unhealthy once all of them are.
pub async fn full_health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let routines = state.dashboard.status().await;

    Json(HealthResponse {
        status: overall_status(&routines).to_string(),
        mode: state.mode,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        routines,
    })
}

fn overall_status(routines: &BTreeMap<Routine, RoutineStatus>) -> &'static str {
    let failing = routines
        .values()
        .filter(|status| status.consecutive_failures > 0)
        .count();

    if failing == 0 {
        "healthy"
    } else if failing < routines.len() {
        "degraded"
    } else {
        "unhealthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(n: u32) -> RoutineStatus {
        RoutineStatus {
            consecutive_failures: n,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_overall_status() {
        let mut routines = BTreeMap::new();
        assert_eq!(overall_status(&routines), "healthy");

        routines.insert(Routine::Statistics, failing(0));
        routines.insert(Routine::Movements, failing(3));
        assert_eq!(overall_status(&routines), "degraded");

        routines.insert(Routine::Statistics, failing(1));
        assert_eq!(overall_status(&routines), "unhealthy");
    }
}
