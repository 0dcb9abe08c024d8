//! Domain layer: parse tree, separators, tokenizer and order entities
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod actions;
pub mod control;
pub mod entities;
pub mod error;
pub mod message;
pub mod separators;
pub mod tokenizer;

pub use actions::{FieldAction, FieldRule, Segment};
pub use control::OrderControl;
pub use entities::*;
pub use error::{DomainError, DomainResult, MissingLineField};
pub use message::{Component, NestedSubcomponent, ParsedMessage, Record, Repetition, Subcomponent};
pub use separators::{SeparatorSpec, SeparatorState, SeparatorTier};
