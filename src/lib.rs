//! # Roomwatch
//!
//! Live dashboard for a room-occupancy tracking server. Polls the server's
//! JSON endpoints, renders rooms, active visits and movement history into
//! named page slots, and serves the resulting page.
//!
//! ## Modules
//!
//! - [`client`]: HTTP access to the tracking server
//! - [`model`]: Lenient decoding of the server's responses
//! - [`format`]: Durations, counts and clock labels
//! - [`render`]: Page slots, presentation modes and markup builders
//! - [`updater`]: The fetch → render routines
//! - [`poller`]: Periodic triggering of the routines
//! - [`server`]: HTTP server for the rendered page
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomwatch::client::ApiClient;
//! use roomwatch::config::Config;
//! use roomwatch::poller::Poller;
//! use roomwatch::render::Page;
//! use roomwatch::updater::Dashboard;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default().config;
//!
//!     let client = Arc::new(ApiClient::new(&config.source)?);
//!     let page = Arc::new(Page::new());
//!     let dashboard = Arc::new(Dashboard::new(client, page.clone()));
//!
//!     let poller = Arc::new(Poller::new(dashboard, config.poll.clone(), config.display.mode));
//!     let handle = Arc::clone(&poller).start();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     poller.stop();
//!     handle.await?;
//!
//!     println!("{}", roomwatch::render::render_document(&page, config.display.mode, 0));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod format;
pub mod model;
pub mod poller;
pub mod render;
pub mod server;
pub mod updater;

#[cfg(test)]
pub(crate) mod testing;

// Re-export top-level types for convenience
pub use client::{ApiClient, DashboardSource, FetchError};

pub use config::{Config, ConfigError, LoadReport};

pub use format::format_duration;

pub use model::{GroupMovement, Movement, RoomStatus, RoomsSnapshot, Visit};

pub use poller::{OverlapPolicy, Poller};

pub use render::{Page, PageMode, RenderTarget, Slot, SlotContent};

pub use server::{build_router, serve, ServerError, ServerState};

pub use updater::{Dashboard, Routine, RoutineStatus, UpdateHandle, UpdateOutcome};
