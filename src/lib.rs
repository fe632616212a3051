//! Windowed record cache over a memory-mapped candle store.
//!
//! A bounded window of valid records slides over an append-only store file
//! as a pannable/zoomable viewport moves. Reloads never disturb the current
//! pan or zoom.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

pub use application::{GestureOutcome, ReloadOutcome, StoreViewport, ViewportCoordinator};
pub use config::ViewerConfig;
pub use domain::errors::{ViewerError, ViewerResult};
pub use domain::market_data::{Record, RecordSource};
pub use infrastructure::RecordStore;
pub use presentation::{HoverInfo, RenderFrame};
