mod java;
mod quotes;

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use java::JavaRules;
pub use quotes::find_unquoted;

/// Language-specific token recognition consumed by the scope tree and the
/// indentation engine. Implementations must never panic: every lookup
/// answers with a column or a boolean.
pub trait TokenRules: Send + Sync {
    /// Byte column of the first unquoted scope-open token on `line`.
    fn scope_enter(&self, line: &str) -> Option<usize>;

    /// Byte column of the first unquoted scope-close token on `line`.
    fn scope_exit(&self, line: &str) -> Option<usize>;

    /// True if `lines[index]` needs no continuation indent on the next line.
    fn is_complete_expression(&self, lines: &[String], index: usize) -> bool;

    /// Blank, annotation and bare-comment lines.
    fn is_special_statement(&self, line: &str) -> bool;

    /// True if the line introduces a callable or member.
    fn is_unit_signature(&self, line: &str) -> bool;

    /// Prefix of a line continuing the body of a block comment.
    fn comment_body_token(&self) -> &str;

    /// Prefix of a single-line comment.
    fn comment_line_token(&self) -> &str;

    /// Padding inserted between the indentation and a trimmed line.
    fn comment_body_padding(&self, _trimmed: &str) -> &str {
        ""
    }
}

/// Languages with a shipped [`TokenRules`] implementation. Names are
/// written lowercase and read case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    #[default]
    Java,
}

impl Language {
    pub fn rules(self) -> Box<dyn TokenRules> {
        match self {
            Language::Java => Box::new(JavaRules::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Java => "java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "java" => Ok(Language::Java),
            _ => Err(FormatError::UnknownLanguage(s.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = FormatError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}
