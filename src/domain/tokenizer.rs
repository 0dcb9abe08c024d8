//! Recursive tokenizer: line → record → component → repetition → subcomponent.
//!
//! Each level splits on its tier's separator if the header declared it and
//! keeps the text whole otherwise. Tokenizing never fails.

use tracing::{instrument, trace};

use crate::domain::message::{Component, NestedSubcomponent, Record, Repetition, Subcomponent};
use crate::domain::separators::{SeparatorState, SeparatorTier};

#[instrument(level = "trace", skip(state))]
pub fn parse_record(state: &SeparatorState, line: &str) -> Record {
    let mut tokens = line.split(state.component_separator());
    let label = tokens.next().unwrap_or_default();
    let components: Vec<Component> = tokens.map(|t| parse_component(state, t)).collect();
    trace!(label, components = components.len(), "parsed record");
    Record::new(label, components)
}

/// Parse the header line as a record.
///
/// The token holding the separator declaration is kept verbatim; splitting
/// it on the separators it declares would make it unreadable.
#[instrument(level = "trace", skip(state))]
pub fn parse_header_record(state: &SeparatorState, line: &str) -> Record {
    let declaration_start = state.spec().special_chars_start_index + 1;
    let mut position = 0;
    let mut label = "";
    let mut components = Vec::new();

    for (i, token) in line.split(state.component_separator()).enumerate() {
        if i == 0 {
            label = token;
        } else if position == declaration_start {
            components.push(Component::literal(token));
        } else {
            components.push(parse_component(state, token));
        }
        position += token.chars().count() + 1;
    }

    trace!(label, components = components.len(), "parsed header record");
    Record::new(label, components)
}

pub fn parse_component(state: &SeparatorState, text: &str) -> Component {
    let repetitions = match state.separator(SeparatorTier::Repeating) {
        Some(sep) => text.split(sep).map(|t| parse_repetition(state, t)).collect(),
        None => vec![parse_repetition(state, text)],
    };
    Component::new(repetitions)
}

pub fn parse_repetition(state: &SeparatorState, text: &str) -> Repetition {
    let subcomponents = match state.separator(SeparatorTier::Subcomponent) {
        Some(sep) => text.split(sep).map(|t| parse_subcomponent(state, t)).collect(),
        None => vec![parse_subcomponent(state, text)],
    };
    Repetition::new(subcomponents)
}

pub fn parse_subcomponent(state: &SeparatorState, text: &str) -> Subcomponent {
    let nested = match state.separator(SeparatorTier::NestedSubcomponent) {
        Some(sep) => text.split(sep).map(NestedSubcomponent::new).collect(),
        None => vec![NestedSubcomponent::new(text)],
    };
    Subcomponent::new(nested)
}
