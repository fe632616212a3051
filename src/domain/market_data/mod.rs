//! Market data aggregate: stored records, the window cache over them and
//! store-wide lookups.

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
