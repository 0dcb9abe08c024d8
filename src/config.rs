//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/msgbundle/msgbundle.toml`
//! 3. Local config: an explicitly given file
//! 4. Environment variables: `MSGBUNDLE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::SeparatorSpec;

/// Named separator layouts a config file can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorPreset {
    /// `H|\^&|`: repeating, subcomponent, escape
    Astm,
    /// `MSH|^~\&|`: subcomponent, repeating, escape, nested
    Hl7,
}

impl SeparatorPreset {
    pub fn spec(&self) -> SeparatorSpec {
        match self {
            SeparatorPreset::Astm => SeparatorSpec::default(),
            SeparatorPreset::Hl7 => SeparatorSpec::hl7(),
        }
    }

    fn parse(value: &str) -> Result<Self, ApplicationError> {
        match value.to_ascii_lowercase().as_str() {
            "astm" => Ok(SeparatorPreset::Astm),
            "hl7" => Ok(SeparatorPreset::Hl7),
            other => Err(ApplicationError::Config {
                message: format!("unknown preset: {other}"),
            }),
        }
    }
}

/// Raw separator config for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSeparatorSpec {
    pub special_chars_start_index: Option<usize>,
    pub min_special_chars_length: Option<usize>,
    pub max_special_chars_length: Option<usize>,
    pub repeating_separator_offset: Option<usize>,
    pub subcomponent_separator_offset: Option<usize>,
    pub escape_char_offset: Option<usize>,
    pub nested_subcomponent_separator_offset: Option<usize>,
    pub truncation_char_offset: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub preset: Option<SeparatorPreset>,
    pub separators: RawSeparatorSpec,
}

impl RawSeparatorSpec {
    /// Overlay the specified fields onto `base`.
    pub fn apply(&self, base: &SeparatorSpec) -> SeparatorSpec {
        SeparatorSpec {
            special_chars_start_index: self
                .special_chars_start_index
                .unwrap_or(base.special_chars_start_index),
            min_special_chars_length: self
                .min_special_chars_length
                .unwrap_or(base.min_special_chars_length),
            max_special_chars_length: self
                .max_special_chars_length
                .unwrap_or(base.max_special_chars_length),
            repeating_separator_offset: self
                .repeating_separator_offset
                .unwrap_or(base.repeating_separator_offset),
            subcomponent_separator_offset: self
                .subcomponent_separator_offset
                .unwrap_or(base.subcomponent_separator_offset),
            escape_char_offset: self.escape_char_offset.unwrap_or(base.escape_char_offset),
            nested_subcomponent_separator_offset: self
                .nested_subcomponent_separator_offset
                .unwrap_or(base.nested_subcomponent_separator_offset),
            truncation_char_offset: self
                .truncation_char_offset
                .unwrap_or(base.truncation_char_offset),
        }
    }
}

/// Unified configuration for msgbundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Separator layout of the messages to read
    pub separators: SeparatorSpec,
}

/// Get the XDG config directory for msgbundle.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "msgbundle").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("msgbundle.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Apply one file layer: a preset replaces the current spec, fields then override it.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let base = overlay
            .preset
            .map(|p| p.spec())
            .unwrap_or_else(|| self.separators.clone());
        Self {
            separators: overlay.separators.apply(&base),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file; it must exist when given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults (ASTM layout)
    /// 2. Global config: `$XDG_CONFIG_HOME/msgbundle/msgbundle.toml`
    /// 3. Local config file
    /// 4. Environment variables: `MSGBUNDLE_*` prefix
    ///
    /// The merged separator spec is validated before it is returned.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = local {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;

        Ok(current)
    }

    /// Load settings from a single TOML string on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ApplicationError> {
        let raw: RawSettings = toml::from_str(content).map_err(|e| ApplicationError::Config {
            message: format!("parse config: {e}"),
        })?;
        let settings = Self::default().merge_with(&raw);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.separators
            .validate()
            .map_err(|e| ApplicationError::Config {
                message: e.to_string(),
            })
    }

    /// Apply MSGBUNDLE_* environment variables as explicit overrides.
    ///
    /// `MSGBUNDLE_PRESET=hl7` selects a preset, `MSGBUNDLE_SEPARATORS__<FIELD>`
    /// sets a single separator field.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MSGBUNDLE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("preset") {
            settings.separators = SeparatorPreset::parse(&val)?.spec();
        }

        let spec = &mut settings.separators;
        let fields: [(&str, &mut usize); 8] = [
            (
                "separators.special_chars_start_index",
                &mut spec.special_chars_start_index,
            ),
            (
                "separators.min_special_chars_length",
                &mut spec.min_special_chars_length,
            ),
            (
                "separators.max_special_chars_length",
                &mut spec.max_special_chars_length,
            ),
            (
                "separators.repeating_separator_offset",
                &mut spec.repeating_separator_offset,
            ),
            (
                "separators.subcomponent_separator_offset",
                &mut spec.subcomponent_separator_offset,
            ),
            ("separators.escape_char_offset", &mut spec.escape_char_offset),
            (
                "separators.nested_subcomponent_separator_offset",
                &mut spec.nested_subcomponent_separator_offset,
            ),
            (
                "separators.truncation_char_offset",
                &mut spec.truncation_char_offset,
            ),
        ];
        for (key, slot) in fields {
            if let Ok(val) = config.get_string(key) {
                *slot = val.trim().parse().map_err(|_| ApplicationError::Config {
                    message: format!("{key}: expected a non-negative integer, got {val:?}"),
                })?;
            }
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# msgbundle configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/msgbundle/msgbundle.toml
#   Local:  file passed to Settings::load
#   Env:    MSGBUNDLE_PRESET, MSGBUNDLE_SEPARATORS__<FIELD>
#
# All lengths and offsets count characters of the special chars string,
# which starts with the field separator (offset 0).

# Start from a named layout: "astm" (default) or "hl7"
# preset = "astm"

[separators]
# Index of the field separator in the header line
# special_chars_start_index = 1

# Accepted length of the special chars string, field separator included
# min_special_chars_length = 2
# max_special_chars_length = 3

# Offsets of the optional tiers
# repeating_separator_offset = 1
# subcomponent_separator_offset = 2
# escape_char_offset = 3
# nested_subcomponent_separator_offset = 4
# truncation_char_offset = 5
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_config_when_loading_then_uses_defaults() {
        let settings = Settings::from_toml_str("").expect("load defaults");
        assert_eq!(settings.separators, SeparatorSpec::default());
    }

    #[test]
    fn given_hl7_preset_when_merging_then_replaces_spec() {
        let raw = RawSettings {
            preset: Some(SeparatorPreset::Hl7),
            ..Default::default()
        };
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.separators, SeparatorSpec::hl7());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let raw = RawSettings {
            preset: None,
            separators: RawSeparatorSpec {
                max_special_chars_length: Some(6),
                ..Default::default()
            },
        };
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.separators.max_special_chars_length, 6);
        assert_eq!(merged.separators.min_special_chars_length, 2);
        assert_eq!(merged.separators.special_chars_start_index, 1);
    }

    #[test]
    fn given_preset_and_fields_when_merging_then_fields_win() {
        let raw = RawSettings {
            preset: Some(SeparatorPreset::Hl7),
            separators: RawSeparatorSpec {
                special_chars_start_index: Some(4),
                ..Default::default()
            },
        };
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.separators.special_chars_start_index, 4);
        assert_eq!(merged.separators.subcomponent_separator_offset, 1);
    }

    #[test]
    fn given_preset_name_when_parsing_then_case_insensitive() {
        assert_eq!(SeparatorPreset::parse("HL7").unwrap(), SeparatorPreset::Hl7);
        assert!(SeparatorPreset::parse("edifact").is_err());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips() {
        let settings = Settings {
            separators: SeparatorSpec::hl7(),
        };
        let toml = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsing_then_yields_defaults() {
        let settings = Settings::from_toml_str(&Settings::template()).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
