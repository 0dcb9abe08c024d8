//! msgbundle: delimiter-hierarchy message parser with an order bundle builder
//!
//! A message is a sequence of text records. The first record (header) declares
//! the separators used by the rest of the message; every record is split into
//! components, repetitions, subcomponents and nested subcomponents.
//! Parsed records can then be mapped onto an [`OrderBundle`] through label tables.
//!
//! # Architecture
//!
//! - `domain/` - parse tree, separator resolution, tokenizer, order entities
//! - `application/` - message reader, bundle builder, message service
//! - `infrastructure/` - collaborator traits, in-memory implementations, DI
//! - `config` - layered settings (defaults, global, local, env)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;

pub use application::services::{BundleBuilder, MessageReader, MessageService};
pub use application::{ApplicationError, ApplicationResult};
pub use config::Settings;
pub use domain::{
    DomainError, FieldAction, Order, OrderBundle, OrderLine, ParsedMessage, Record, Segment,
    SeparatorSpec,
};
pub use infrastructure::ServiceContainer;
