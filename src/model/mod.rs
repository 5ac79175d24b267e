//! Dashboard View Models
//!
//! Transient, per-fetch snapshots of the tracking server's state.
//! Nothing here outlives the render pass that consumes it.

mod lenient;
mod types;

pub use types::{GroupMovement, Movement, RoomStatus, RoomsSnapshot, Visit, NOT_AVAILABLE, NO_ROOM};
