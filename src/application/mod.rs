pub mod coordinator;
pub mod interaction;
pub mod reload;

pub use coordinator::*;
pub use interaction::*;
pub use reload::*;
