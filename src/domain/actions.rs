//! Vocabulary shared by the label mapping and the bundle builder

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Kind of record a label stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Header,
    Order,
    OrderLine,
}

impl FromStr for Segment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Header" => Ok(Segment::Header),
            "Order" => Ok(Segment::Order),
            "OrderLine" => Ok(Segment::OrderLine),
            other => Err(DomainError::UnknownSegmentName(other.to_string())),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Header => write!(f, "Header"),
            Segment::Order => write!(f, "Order"),
            Segment::OrderLine => write!(f, "OrderLine"),
        }
    }
}

/// What the builder does with a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAction {
    Sender,
    Receiver,
    Priority,
    Customer,
    Product,
    Quantity,
}

impl FromStr for FieldAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sender" => Ok(FieldAction::Sender),
            "Receiver" => Ok(FieldAction::Receiver),
            "Priority" => Ok(FieldAction::Priority),
            "Customer" => Ok(FieldAction::Customer),
            "Product" => Ok(FieldAction::Product),
            "Quantity" => Ok(FieldAction::Quantity),
            other => Err(DomainError::UnknownFieldAction(other.to_string())),
        }
    }
}

impl fmt::Display for FieldAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldAction::Sender => "Sender",
            FieldAction::Receiver => "Receiver",
            FieldAction::Priority => "Priority",
            FieldAction::Customer => "Customer",
            FieldAction::Product => "Product",
            FieldAction::Quantity => "Quantity",
        };
        f.write_str(name)
    }
}

/// Read `field_index`/`subfield_index` of a record and apply `action` to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field_index: usize,
    pub subfield_index: usize,
    pub action: FieldAction,
}

impl FieldRule {
    pub fn new(field_index: usize, subfield_index: usize, action: FieldAction) -> Self {
        Self {
            field_index,
            subfield_index,
            action,
        }
    }
}
