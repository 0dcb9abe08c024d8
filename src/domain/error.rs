//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::actions::FieldAction;
use crate::domain::separators::SeparatorTier;

/// Field of an order line that must be set before the line can be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingLineField {
    Product,
    Quantity,
}

impl std::fmt::Display for MissingLineField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingLineField::Product => write!(f, "product not set"),
            MissingLineField::Quantity => write!(f, "quantity not set"),
        }
    }
}

/// Domain errors represent malformed messages and business rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    // --- separator discovery ---
    #[error("message header missing")]
    MissingHeader,

    #[error("message header too short: {length} characters, need at least {required}")]
    HeaderTooShort { length: usize, required: usize },

    #[error("end of special chars field not found (field separator {separator:?})")]
    UnterminatedSpecialCharsField { separator: char },

    #[error("special chars must be {expected} characters long, found {length}")]
    InvalidSpecialCharsLength { length: usize, expected: String },

    #[error("message format does not support {0}")]
    UnsupportedSeparatorFeature(SeparatorTier),

    #[error("invalid separator spec: {message}")]
    InvalidSeparatorSpec { message: String },

    // --- value extraction ---
    #[error("field index {index} out of range in record {label} ({count} fields)")]
    FieldIndexOutOfRange {
        label: String,
        index: usize,
        count: usize,
    },

    #[error("subfield index {index} out of range ({count} subfields)")]
    SubfieldIndexOutOfRange { index: usize, count: usize },

    #[error("nested subfield index {index} out of range ({count} nested subfields)")]
    NestedSubfieldIndexOutOfRange { index: usize, count: usize },

    #[error("field has no value")]
    NoValue,

    #[error("cannot extract single value from repeating field")]
    AmbiguousRepeatingValue,

    // --- label resolution ---
    #[error("unknown segment label: {0}")]
    UnknownSegmentLabel(String),

    #[error("unknown segment name: {0}")]
    UnknownSegmentName(String),

    #[error("unknown field action: {0}")]
    UnknownFieldAction(String),

    #[error("field {field_index}.{subfield_index} in segment {label} has no value")]
    FieldHasNoValue {
        label: String,
        field_index: usize,
        subfield_index: usize,
    },

    // --- bundle building ---
    #[error("{0} already set")]
    DuplicateField(FieldAction),

    #[error("no order in progress")]
    MissingOrderContext,

    #[error("no order line in progress")]
    MissingOrderLineContext,

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("unknown customer: {0}")]
    UnknownCustomer(String),

    #[error("incomplete order line: {0}")]
    IncompleteOrderLine(MissingLineField),

    #[error("order line does not belong to this order")]
    ForeignOrderLine,

    #[error("sender not set")]
    MissingSender,

    #[error("receiver not set")]
    MissingReceiver,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
