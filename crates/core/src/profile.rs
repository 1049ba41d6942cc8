//! Customer profile rules.

use serde::Deserialize;

use crate::error::CoreError;

pub const MAX_DISPLAY_NAME_LEN: usize = 100;

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
}

impl ProfileUpdate {
    /// The display name to store: trimmed, with blank meaning "clear it".
    pub fn normalized_display_name(&self) -> Result<Option<String>, CoreError> {
        let Some(name) = self.display_name.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if name.is_empty() {
            return Ok(None);
        }
        if name.chars().count() > MAX_DISPLAY_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "display_name must be at most {MAX_DISPLAY_NAME_LEN} characters"
            )));
        }
        Ok(Some(name.to_string()))
    }
}
