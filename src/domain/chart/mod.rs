//! Chart aggregate: the view over a loaded window and the coordinate math.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
