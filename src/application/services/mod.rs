//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on collaborator traits (Repository, SegmentMapping)
//! but are themselves concrete structs, not traits.

mod bundle;
mod message;

pub use bundle::{BuilderState, BundleBuilder};
pub use message::{MessageReader, MessageService};
