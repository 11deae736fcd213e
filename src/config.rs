use crate::error::FormatError;
use crate::rules::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_INDENT_UNIT: &str = "    ";

/// Context lines probed on either side of a selection when none is given.
pub const DEFAULT_SNIPPET_OFFSET: usize = 10;

/// Formatting options shared by the library, the server and the binary.
///
/// Every field is optional in JSON, e.g. `{"indentUnit": "  "}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatOptions {
    /// Text added once per nesting level.
    pub indent_unit: String,
    /// Line up block comment bodies under their opening token.
    pub align_comment_bodies: bool,
    pub language: Language,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
            align_comment_bodies: true,
            language: Language::default(),
        }
    }
}

impl FormatOptions {
    pub fn spaces(width: usize) -> Self {
        Self {
            indent_unit: " ".repeat(width),
            ..Self::default()
        }
    }

    pub fn tabs() -> Self {
        Self {
            indent_unit: "\t".to_string(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, FormatError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Overlay the fields present in a JSON object onto these options.
    pub fn merge_json(&self, patch: &serde_json::Value) -> Result<Self, FormatError> {
        let mut merged = serde_json::to_value(self)?;
        if let (Some(target), Some(fields)) = (merged.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                if target.contains_key(key) {
                    target.insert(key.clone(), value.clone());
                }
            }
        }

        let options: Self = serde_json::from_value(merged)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        if self.indent_unit.is_empty() {
            return Err(FormatError::EmptyIndentUnit);
        }
        Ok(())
    }
}
