//! Separator discovery: which characters split a message, read from its header.
//!
//! The header declares its separators in-band. For the default spec the header
//! `H|\^&|...` yields the special chars string `|\^&`: the field separator at
//! offset 0 followed by the repeating, subcomponent and escape characters.
//! Tiers beyond the end of the declared string are simply absent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// One level of the separator hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeparatorTier {
    Component,
    Repeating,
    Subcomponent,
    Escape,
    NestedSubcomponent,
    Truncation,
}

impl SeparatorTier {
    pub const ALL: [SeparatorTier; 6] = [
        SeparatorTier::Component,
        SeparatorTier::Repeating,
        SeparatorTier::Subcomponent,
        SeparatorTier::Escape,
        SeparatorTier::NestedSubcomponent,
        SeparatorTier::Truncation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SeparatorTier::Component => "component separators",
            SeparatorTier::Repeating => "repeating fields",
            SeparatorTier::Subcomponent => "subfields",
            SeparatorTier::Escape => "escape characters",
            SeparatorTier::NestedSubcomponent => "nested subfields",
            SeparatorTier::Truncation => "truncation characters",
        }
    }
}

impl fmt::Display for SeparatorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of a message format's separator declaration.
///
/// Lengths and offsets are counted in characters over the special chars
/// string, which starts with the field separator itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorSpec {
    /// Index of the field separator in the header line
    pub special_chars_start_index: usize,
    /// Shortest accepted special chars string (field separator included)
    pub min_special_chars_length: usize,
    /// Longest accepted special chars string (field separator included)
    pub max_special_chars_length: usize,
    pub repeating_separator_offset: usize,
    pub subcomponent_separator_offset: usize,
    pub escape_char_offset: usize,
    pub nested_subcomponent_separator_offset: usize,
    pub truncation_char_offset: usize,
}

impl Default for SeparatorSpec {
    fn default() -> Self {
        Self {
            special_chars_start_index: 1,
            min_special_chars_length: 2,
            max_special_chars_length: 3,
            repeating_separator_offset: 1,
            subcomponent_separator_offset: 2,
            escape_char_offset: 3,
            nested_subcomponent_separator_offset: 4,
            truncation_char_offset: 5,
        }
    }
}

impl SeparatorSpec {
    /// HL7 v2 layout: `MSH|^~\&|`, component before repetition.
    pub fn hl7() -> Self {
        Self {
            special_chars_start_index: 3,
            min_special_chars_length: 5,
            max_special_chars_length: 6,
            repeating_separator_offset: 2,
            subcomponent_separator_offset: 1,
            escape_char_offset: 3,
            nested_subcomponent_separator_offset: 4,
            truncation_char_offset: 5,
        }
    }

    pub fn tier_offset(&self, tier: SeparatorTier) -> usize {
        match tier {
            SeparatorTier::Component => 0,
            SeparatorTier::Repeating => self.repeating_separator_offset,
            SeparatorTier::Subcomponent => self.subcomponent_separator_offset,
            SeparatorTier::Escape => self.escape_char_offset,
            SeparatorTier::NestedSubcomponent => self.nested_subcomponent_separator_offset,
            SeparatorTier::Truncation => self.truncation_char_offset,
        }
    }

    pub fn has_fixed_special_chars(&self) -> bool {
        self.min_special_chars_length == self.max_special_chars_length
    }

    /// Minimum length of the header line.
    pub fn min_header_length(&self) -> usize {
        self.special_chars_start_index + self.min_special_chars_length
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.min_special_chars_length == 0 {
            return Err(DomainError::InvalidSeparatorSpec {
                message: "min_special_chars_length must be at least 1".to_string(),
            });
        }
        if self.min_special_chars_length > self.max_special_chars_length {
            return Err(DomainError::InvalidSeparatorSpec {
                message: format!(
                    "min_special_chars_length ({}) exceeds max_special_chars_length ({})",
                    self.min_special_chars_length, self.max_special_chars_length
                ),
            });
        }
        Ok(())
    }

    fn expected_length(&self) -> String {
        if self.has_fixed_special_chars() {
            format!("exactly {}", self.min_special_chars_length)
        } else {
            format!(
                "between {} and {}",
                self.min_special_chars_length, self.max_special_chars_length
            )
        }
    }

    /// Extract the special chars string from the header line.
    ///
    /// The spec itself is validated first.
    pub fn extract_special_chars(&self, header: &str) -> DomainResult<String> {
        self.validate()?;

        let chars: Vec<char> = header.chars().collect();
        let too_short = DomainError::HeaderTooShort {
            length: chars.len(),
            required: self.min_header_length(),
        };
        if chars.len() < self.min_header_length() {
            return Err(too_short);
        }

        let start = self.special_chars_start_index;
        let field_separator = *chars.get(start).ok_or(too_short)?;
        let end = chars[start + 1..]
            .iter()
            .position(|&c| c == field_separator)
            .map(|pos| start + 1 + pos)
            .ok_or(DomainError::UnterminatedSpecialCharsField {
                separator: field_separator,
            })?;

        let length = end - start;
        if length < self.min_special_chars_length || length > self.max_special_chars_length {
            return Err(DomainError::InvalidSpecialCharsLength {
                length,
                expected: self.expected_length(),
            });
        }

        Ok(chars[start..end].iter().collect())
    }
}

/// Concrete separators of one message, resolved from its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorState {
    spec: SeparatorSpec,
    special_chars: Vec<char>,
}

impl SeparatorState {
    pub fn from_header(spec: &SeparatorSpec, header: &str) -> DomainResult<Self> {
        let special_chars = spec.extract_special_chars(header)?.chars().collect();
        Ok(Self {
            spec: spec.clone(),
            special_chars,
        })
    }

    pub fn spec(&self) -> &SeparatorSpec {
        &self.spec
    }

    /// The declared special chars, field separator first.
    pub fn special_chars(&self) -> String {
        self.special_chars.iter().collect()
    }

    pub fn has_tier(&self, tier: SeparatorTier) -> bool {
        self.special_chars.len() > self.spec.tier_offset(tier)
    }

    /// Separator character of `tier`, if the header declares it.
    pub fn separator(&self, tier: SeparatorTier) -> Option<char> {
        self.special_chars.get(self.spec.tier_offset(tier)).copied()
    }

    pub fn tier_char(&self, tier: SeparatorTier) -> DomainResult<char> {
        self.separator(tier)
            .ok_or(DomainError::UnsupportedSeparatorFeature(tier))
    }

    /// The field separator; always declared.
    pub fn component_separator(&self) -> char {
        self.special_chars[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_spec_when_validating_then_ok() {
        assert!(SeparatorSpec::default().validate().is_ok());
        assert!(SeparatorSpec::hl7().validate().is_ok());
    }

    #[test]
    fn given_min_above_max_when_validating_then_fails() {
        let spec = SeparatorSpec {
            min_special_chars_length: 4,
            max_special_chars_length: 3,
            ..SeparatorSpec::default()
        };
        assert!(matches!(
            spec.validate(),
            Err(DomainError::InvalidSeparatorSpec { .. })
        ));
    }

    #[test]
    fn given_fixed_spec_when_length_wrong_then_message_says_exactly() {
        let spec = SeparatorSpec {
            min_special_chars_length: 3,
            max_special_chars_length: 3,
            ..SeparatorSpec::default()
        };
        let err = spec.extract_special_chars("H|^|x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "special chars must be exactly 3 characters long, found 2"
        );
    }

    #[test]
    fn given_zero_min_length_when_extracting_then_invalid_spec() {
        let spec = SeparatorSpec {
            min_special_chars_length: 0,
            ..SeparatorSpec::default()
        };

        let err = spec.extract_special_chars("H").unwrap_err();

        assert!(matches!(err, DomainError::InvalidSeparatorSpec { .. }));
    }

    #[test]
    fn given_header_ending_before_start_index_when_extracting_then_too_short() {
        let spec = SeparatorSpec {
            special_chars_start_index: 3,
            ..SeparatorSpec::default()
        };

        let err = spec.extract_special_chars("MS").unwrap_err();

        assert_eq!(
            err,
            DomainError::HeaderTooShort {
                length: 2,
                required: 5
            }
        );
    }

    #[test]
    fn given_component_tier_then_offset_is_zero() {
        let spec = SeparatorSpec::default();
        assert_eq!(spec.tier_offset(SeparatorTier::Component), 0);
    }

    #[test]
    fn given_multibyte_separators_when_extracting_then_counts_chars() {
        let spec = SeparatorSpec::default();
        let chars = spec.extract_special_chars("H§¤§rest").unwrap();
        assert_eq!(chars, "§¤");
    }
}
