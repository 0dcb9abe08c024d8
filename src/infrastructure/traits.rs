//! Collaborator traits for the message pipeline
//!
//! These traits abstract the registry and label tables the core consults,
//! allowing services to be tested with their own implementations.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, FieldAction, FieldRule, Segment};

/// Registry of entities keyed by identifier.
pub trait Repository<T>: Send + Sync {
    /// Look up an entity. Returns None if not registered.
    fn get(&self, id: &Uuid) -> Option<T>;

    /// Register or replace an entity.
    fn put(&self, id: Uuid, value: T);
}

/// Label tables: which segment a record label denotes and which of its
/// fields feed which builder action.
pub trait SegmentMapping: Send + Sync {
    /// Resolve a record label to its segment.
    fn resolve_segment(&self, label: &str) -> DomainResult<Segment>;

    /// Field rules for a label, in table order. Empty if the label has none.
    fn field_actions_for(&self, label: &str) -> Vec<FieldRule>;
}

// ============================================================
// IN-MEMORY IMPLEMENTATIONS
// ============================================================

/// Thread-safe in-process registry.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    items: RwLock<HashMap<Uuid, T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> Repository<T> for InMemoryRepository<T> {
    fn get(&self, id: &Uuid) -> Option<T> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    fn put(&self, id: Uuid, value: T) {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, value);
    }
}

/// Label tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct LabelMapping {
    segments: HashMap<String, Segment>,
    rules: Vec<(String, FieldRule)>,
}

impl LabelMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables of the ASWM order format: `H` header, `O` order, `L` order line.
    pub fn aswm() -> Self {
        Self::new()
            .with_segment("H", Segment::Header)
            .with_segment("O", Segment::Order)
            .with_segment("L", Segment::OrderLine)
            .with_rule("H", FieldRule::new(1, 0, FieldAction::Sender))
            .with_rule("H", FieldRule::new(2, 0, FieldAction::Receiver))
            .with_rule("O", FieldRule::new(0, 0, FieldAction::Priority))
            .with_rule("O", FieldRule::new(1, 0, FieldAction::Customer))
            .with_rule("L", FieldRule::new(0, 0, FieldAction::Product))
            .with_rule("L", FieldRule::new(1, 0, FieldAction::Quantity))
    }

    pub fn with_segment(mut self, label: impl Into<String>, segment: Segment) -> Self {
        self.segments.insert(label.into(), segment);
        self
    }

    pub fn with_rule(mut self, label: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.push((label.into(), rule));
        self
    }
}

impl SegmentMapping for LabelMapping {
    fn resolve_segment(&self, label: &str) -> DomainResult<Segment> {
        self.segments
            .get(label)
            .copied()
            .ok_or_else(|| DomainError::UnknownSegmentLabel(label.to_string()))
    }

    fn field_actions_for(&self, label: &str) -> Vec<FieldRule> {
        self.rules
            .iter()
            .filter(|(l, _)| l == label)
            .map(|(_, rule)| *rule)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;

    #[test]
    fn given_put_customer_when_getting_then_returns_clone() {
        let repo = InMemoryRepository::new();
        let customer = Customer::new().named("Merlin");
        repo.put(customer.id, customer.clone());

        assert_eq!(repo.get(&customer.id), Some(customer));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn given_unknown_id_when_getting_then_none() {
        let repo: InMemoryRepository<Customer> = InMemoryRepository::new();
        assert!(repo.get(&Uuid::new_v4()).is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn given_aswm_mapping_when_resolving_then_known_labels_map() {
        let mapping = LabelMapping::aswm();
        assert_eq!(mapping.resolve_segment("H").unwrap(), Segment::Header);
        assert_eq!(mapping.resolve_segment("L").unwrap(), Segment::OrderLine);
        assert_eq!(
            mapping.resolve_segment("X"),
            Err(DomainError::UnknownSegmentLabel("X".to_string()))
        );
    }

    #[test]
    fn given_aswm_mapping_when_listing_rules_then_table_order() {
        let rules = LabelMapping::aswm().field_actions_for("H");
        assert_eq!(
            rules,
            vec![
                FieldRule::new(1, 0, FieldAction::Sender),
                FieldRule::new(2, 0, FieldAction::Receiver),
            ]
        );
        assert!(LabelMapping::aswm().field_actions_for("Z").is_empty());
    }
}
