//! Re-indents brace-delimited source code by lexical nesting, and extracts
//! correctly indented snippets around a selection of lines.

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod logging;
pub mod rules;
pub mod scope;
pub mod server;

pub use config::FormatOptions;
pub use engine::{Formatter, LineRange, SnippetContext, SnippetResult};
pub use error::FormatError;
pub use rules::{JavaRules, Language, TokenRules};
pub use scope::{NodeId, ScopeNode, ScopeTree};
