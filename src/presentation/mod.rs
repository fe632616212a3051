//! Read-only rendering contract: what a drawing layer receives each frame.

pub mod frame;

pub use frame::*;
