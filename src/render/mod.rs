//! Rendering
//!
//! Everything between a fetched snapshot and the page:
//!
//! - **Slots**: named output targets and the [`RenderTarget`] seam
//! - **Mode**: the [`PageMode`] presentation switch
//! - **Views**: pure snapshot → markup builders
//! - **Document**: the full page around the slots

pub mod document;
pub mod html;
mod mode;
mod slots;
pub mod views;

pub use document::render_document;
pub use mode::PageMode;
pub use slots::{Page, RenderTarget, Slot, SlotContent};
pub use views::Statistics;
