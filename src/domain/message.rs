//! Parse tree of a message: records, components and their nested parts.
//!
//! All nodes are plain values. Only a [`NestedSubcomponent`] carries text;
//! every level above it is a list of the level below.

use std::ops::Index;

use crate::domain::error::{DomainError, DomainResult};

/// Leaf of the parse tree.
///
/// An empty string is a value; only a missing text means "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedSubcomponent {
    text: Option<String>,
}

impl NestedSubcomponent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// A leaf without a value.
    pub fn absent() -> Self {
        Self { text: None }
    }

    pub fn has_value(&self) -> bool {
        self.text.is_some()
    }

    pub fn text(&self) -> DomainResult<&str> {
        self.text.as_deref().ok_or(DomainError::NoValue)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcomponent {
    nested: Vec<NestedSubcomponent>,
}

impl Subcomponent {
    pub fn new(nested: Vec<NestedSubcomponent>) -> Self {
        Self { nested }
    }

    /// Subcomponent holding a single leaf.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![NestedSubcomponent::new(text)])
    }

    pub fn nested_subcomponents(&self) -> &[NestedSubcomponent] {
        &self.nested
    }

    pub fn has_value(&self) -> bool {
        self.nested.iter().any(NestedSubcomponent::has_value)
    }

    pub fn value(&self, nested_index: usize) -> DomainResult<&str> {
        self.nested
            .get(nested_index)
            .ok_or(DomainError::NestedSubfieldIndexOutOfRange {
                index: nested_index,
                count: self.nested.len(),
            })?
            .text()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    subcomponents: Vec<Subcomponent>,
}

impl Repetition {
    pub fn new(subcomponents: Vec<Subcomponent>) -> Self {
        Self { subcomponents }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Subcomponent::from_text(text)])
    }

    pub fn subcomponents(&self) -> &[Subcomponent] {
        &self.subcomponents
    }

    pub fn has_value(&self) -> bool {
        self.subcomponents.iter().any(Subcomponent::has_value)
    }

    pub fn value(&self, subcomponent_index: usize, nested_index: usize) -> DomainResult<&str> {
        self.subcomponents
            .get(subcomponent_index)
            .ok_or(DomainError::SubfieldIndexOutOfRange {
                index: subcomponent_index,
                count: self.subcomponents.len(),
            })?
            .value(nested_index)
    }
}

/// One field of a record, possibly repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    repetitions: Vec<Repetition>,
    is_repeating: bool,
}

impl Component {
    /// Build a component; it is repeating when more than one repetition is given.
    pub fn new(repetitions: Vec<Repetition>) -> Self {
        let is_repeating = repetitions.len() > 1;
        Self {
            repetitions,
            is_repeating,
        }
    }

    /// Unsplit component holding `text` verbatim.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(vec![Repetition::from_text(text)])
    }

    /// Component without any value.
    pub fn empty() -> Self {
        Self::new(vec![Repetition::new(vec![Subcomponent::new(vec![
            NestedSubcomponent::absent(),
        ])])])
    }

    pub fn repetitions(&self) -> &[Repetition] {
        &self.repetitions
    }

    pub fn is_repeating(&self) -> bool {
        self.is_repeating
    }

    pub fn has_value(&self) -> bool {
        self.repetitions.iter().any(Repetition::has_value)
    }

    pub fn value(&self) -> DomainResult<&str> {
        self.value_at(0, 0)
    }

    /// Single value at the given subcomponent and nested subcomponent.
    ///
    /// Fails for repeating components, use [`Component::repeating_values`] there.
    pub fn value_at(&self, subcomponent_index: usize, nested_index: usize) -> DomainResult<&str> {
        self.assert_has_value()?;
        if self.is_repeating {
            return Err(DomainError::AmbiguousRepeatingValue);
        }
        self.repetitions
            .first()
            .ok_or(DomainError::NoValue)?
            .value(subcomponent_index, nested_index)
    }

    /// One value per repetition; works for repeating and single components alike.
    pub fn repeating_values(
        &self,
        subcomponent_index: usize,
        nested_index: usize,
    ) -> DomainResult<Vec<&str>> {
        self.assert_has_value()?;
        self.repetitions
            .iter()
            .map(|r| r.value(subcomponent_index, nested_index))
            .collect()
    }

    fn assert_has_value(&self) -> DomainResult<()> {
        if self.has_value() {
            Ok(())
        } else {
            Err(DomainError::NoValue)
        }
    }
}

/// One parsed line: a label and its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    label: String,
    components: Vec<Component>,
}

impl Record {
    pub fn new(label: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            label: label.into(),
            components,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, index: usize) -> DomainResult<&Component> {
        self.components
            .get(index)
            .ok_or_else(|| DomainError::FieldIndexOutOfRange {
                label: self.label.clone(),
                index,
                count: self.components.len(),
            })
    }

    pub fn value(&self, component_index: usize) -> DomainResult<&str> {
        self.value_at(component_index, 0, 0)
    }

    pub fn value_at(
        &self,
        component_index: usize,
        subcomponent_index: usize,
        nested_index: usize,
    ) -> DomainResult<&str> {
        self.component(component_index)?
            .value_at(subcomponent_index, nested_index)
    }

    pub fn repeating_values(
        &self,
        component_index: usize,
        subcomponent_index: usize,
        nested_index: usize,
    ) -> DomainResult<Vec<&str>> {
        self.component(component_index)?
            .repeating_values(subcomponent_index, nested_index)
    }
}

impl Index<usize> for Record {
    type Output = Component;

    fn index(&self, index: usize) -> &Self::Output {
        &self.components[index]
    }
}

/// All records of a message in line order, header first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    records: Vec<Record>,
}

impl ParsedMessage {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn header(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl Index<usize> for ParsedMessage {
    type Output = Record;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a ParsedMessage {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
