pub mod errors;
pub mod messages;
pub mod room;

// Re-export the wire model
pub use errors::*;
pub use messages::*;
pub use room::*;
