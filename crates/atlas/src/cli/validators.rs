//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use std::path::PathBuf;

/// Validate the atlas separator.
///
/// Must be exactly one character. The character rules live in
/// `config::validate_separator` so the config file and the flag agree.
pub fn validate_separator(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => crate::config::validate_separator(c),
        (None, _) => Err("Separator cannot be empty".to_string()),
        (Some(_), Some(_)) => Err(format!(
            "Separator must be a single character, got '{s}'"
        )),
    }
}

/// Validate a target path argument.
///
/// Paths are not required to exist here; a missing target is reported per
/// target by the selected mode.
pub fn validate_target_path(s: &str) -> Result<PathBuf, String> {
    if s.is_empty() {
        return Err("Target path cannot be empty".to_string());
    }
    if s.contains(['\n', '\r']) {
        return Err("Target path cannot contain line breaks".to_string());
    }
    Ok(PathBuf::from(s))
}
