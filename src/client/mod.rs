//! Tracking Server Source
//!
//! The dashboard reads four endpoints of the tracking server. Updaters
//! depend on the [`DashboardSource`] trait, so the HTTP client can be
//! swapped for a scripted source in tests.

mod http;

pub use http::ApiClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{GroupMovement, Movement, RoomsSnapshot, Visit};

/// Endpoint paths relative to the server base URL
pub mod endpoints {
    pub const ROOMS: &str = "/api/rooms";
    pub const ACTIVE_VISITS: &str = "/api/active_visits";
    pub const MOVEMENTS: &str = "/api/movements";
    pub const GROUP_MOVEMENTS: &str = "/api/group_movements";
}

/// Provider of the data behind the dashboard
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Current occupancy of every room
    async fn fetch_rooms(&self) -> Result<RoomsSnapshot, FetchError>;

    /// Open visits. An absent (`null`) list is empty.
    async fn fetch_active_visits(&self) -> Result<Vec<Visit>, FetchError>;

    /// Recent single-person movements
    async fn fetch_movements(&self) -> Result<Vec<Movement>, FetchError>;

    /// Recent group movements
    async fn fetch_group_movements(&self) -> Result<Vec<GroupMovement>, FetchError>;
}

/// Errors that can occur while fetching from the tracking server
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Tracking server unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {endpoint}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}
