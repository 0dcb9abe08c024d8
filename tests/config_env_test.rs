//! Environment overrides for Settings.
//!
//! Kept in a separate test binary: environment variables are process-wide.

use std::env;

use tempfile::TempDir;

use msgbundle::application::ApplicationError;
use msgbundle::config::Settings;
use msgbundle::domain::SeparatorSpec;

#[test]
fn given_env_overrides_when_load_then_env_wins() {
    // Arrange: no global config, only env overrides
    let config_home = TempDir::new().unwrap();
    env::set_var("XDG_CONFIG_HOME", config_home.path());
    env::set_var("MSGBUNDLE_PRESET", "hl7");
    env::set_var("MSGBUNDLE_SEPARATORS__MAX_SPECIAL_CHARS_LENGTH", "7");

    // Act
    let settings = Settings::load(None).expect("load settings");

    // Assert
    let expected = SeparatorSpec {
        max_special_chars_length: 7,
        ..SeparatorSpec::hl7()
    };
    assert_eq!(settings.separators, expected);

    // Arrange: a non-numeric override
    env::set_var("MSGBUNDLE_SEPARATORS__MAX_SPECIAL_CHARS_LENGTH", "many");

    // Act
    let err = Settings::load(None).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::Config { .. }));

    env::remove_var("MSGBUNDLE_PRESET");
    env::remove_var("MSGBUNDLE_SEPARATORS__MAX_SPECIAL_CHARS_LENGTH");
    env::remove_var("XDG_CONFIG_HOME");
}
