//! Data models
//!
//! Document shapes shared between the coordination core and the document
//! store. Documents are camelCase on the wire; timestamps are Unix millis.

pub mod event;
pub mod floor;
pub mod guest;
pub mod owner;
pub mod reservation;

// Re-exports
pub use event::*;
pub use floor::*;
pub use guest::*;
pub use owner::*;
pub use reservation::*;
