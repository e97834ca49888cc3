//! Preset name validation.

use crate::error::CoreError;

/// Maximum length (characters) of a preset name.
pub const MAX_PRESET_NAME_LEN: usize = 255;

/// Validate a preset name: non-blank and within length limit.
pub fn validate_preset_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Preset name must not be empty".to_string(),
        ));
    }
    let len = name.chars().count();
    if len > MAX_PRESET_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Preset name too long: {len} chars (max {MAX_PRESET_NAME_LEN})"
        )));
    }
    Ok(())
}
