mod context;
mod indent;
mod snippet;
mod types;

pub use context::SnippetContext;
pub use types::{LineRange, SnippetResult};

use crate::config::FormatOptions;
use crate::error::FormatError;
use crate::rules::TokenRules;
use crate::scope::ScopeTree;
use std::fmt;
use tracing::debug;

/// Re-indents source text by lexical nesting.
///
/// A formatter holds only its options and token rules; every request builds
/// its own scope tree and [`SnippetContext`], so one instance can serve
/// concurrent callers.
pub struct Formatter {
    rules: Box<dyn TokenRules>,
    options: FormatOptions,
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            rules: options.language.rules(),
            options,
        }
    }

    pub fn with_rules(rules: Box<dyn TokenRules>, options: FormatOptions) -> Self {
        Self { rules, options }
    }

    /// Java formatter indenting with `indent_unit`.
    pub fn java(indent_unit: &str) -> Self {
        Self::new(FormatOptions {
            indent_unit: indent_unit.to_string(),
            ..FormatOptions::default()
        })
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn rules(&self) -> &dyn TokenRules {
        self.rules.as_ref()
    }

    /// Re-indent the whole of `source`. Leading and trailing blank lines are
    /// dropped.
    pub fn format(&self, source: &str) -> Vec<String> {
        let lines: Vec<String> = source.split('\n').map(str::to_string).collect();
        let (formatted, _) = self.indent(&lines);
        indent::trim_trailing_blank(indent::trim_leading_blank(formatted))
    }

    /// Re-indent the context around lines `selection_start..=selection_end`
    /// (1-based), looking at most `offset` lines beyond either side.
    pub fn format_snippet(
        &self,
        source: &str,
        selection_start: usize,
        selection_end: usize,
        offset: usize,
    ) -> Result<SnippetResult, FormatError> {
        let ctx = SnippetContext::new(source, selection_start, selection_end, offset)?;
        let window = snippet::prepare_window(&ctx, self.rules());
        let (formatted, tree) = self.indent(&window.lines);
        Ok(snippet::extract(&ctx, self.rules(), &tree, formatted, window.selection))
    }

    /// Build the scope tree for `lines` and return them re-indented, along
    /// with the tree.
    fn indent(&self, lines: &[String]) -> (Vec<String>, ScopeTree) {
        let trimmed: Vec<String> = lines.iter().map(|line| line.trim().to_string()).collect();
        let tree = ScopeTree::from_lines(&trimmed, self.rules());
        debug!(lines = trimmed.len(), nodes = tree.len(), "scope tree built");

        let unit = self.options.indent_unit.as_str();
        let levels = tree.indent_levels(trimmed.len());
        let mut formatted = indent::apply_levels(
            &trimmed,
            &levels,
            unit,
            self.rules(),
            self.options.align_comment_bodies,
        );
        indent::indent_continuations(&mut formatted, self.rules(), unit);

        (formatted, tree)
    }
}
