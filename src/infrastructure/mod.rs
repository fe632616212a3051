//! Adapters to the outside world: the on-disk record format, the
//! memory-mapped store, and native logging/clock services.

pub mod codec;
pub mod mmap_store;
pub mod services;

pub use mmap_store::RecordStore;
pub use services::{ConsoleLogger, SystemTimeProvider, init_console_logging};
