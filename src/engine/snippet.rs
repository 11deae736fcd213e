use super::context::SnippetContext;
use super::indent::{trim_leading_blank, trim_trailing_blank};
use super::types::{LineRange, SnippetResult};
use crate::rules::TokenRules;
use crate::scope::ScopeTree;
use std::ops::Range;
use tracing::debug;

/// Lines before, inside and after a selection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Segments {
    pub before: Vec<String>,
    pub selection: Vec<String>,
    pub after: Vec<String>,
}

/// Split `lines` at the positions of `selection`. Bounds past the end are
/// clipped, so the selection may come back shorter but never shifts.
pub(crate) fn split_at(mut lines: Vec<String>, selection: Range<usize>) -> Segments {
    let end = selection.end.min(lines.len());
    let start = selection.start.min(end);
    let after = lines.split_off(end);
    let selection = lines.split_off(start);
    Segments {
        before: lines,
        selection,
        after,
    }
}

/// Window lines ready for formatting, with the selection's position in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreparedWindow {
    pub lines: Vec<String>,
    pub selection: Range<usize>,
}

/// Prepend source lines above the window while its first line continues a
/// block comment, so a comment is never cut mid-body.
fn carry_open_comments(
    ctx: &SnippetContext<'_>,
    rules: &dyn TokenRules,
    mut before: Vec<String>,
) -> Vec<String> {
    let token = rules.comment_body_token();
    if token.is_empty() {
        return before;
    }

    let mut above = ctx.window().start;
    while above > 0
        && before
            .first()
            .is_some_and(|line| line.trim().starts_with(token))
    {
        above -= 1;
        before.insert(0, ctx.source()[above].to_string());
    }

    before
}

/// Keep only the nearest unit signature above the selection. Scanning up
/// from the selection, the first signature is kept; the second is removed
/// along with everything above it. A bare scope-enter line sitting right
/// under a signature counts as that signature. A leading line that starts
/// with a scope enter is dropped last.
fn strip_signatures_above(rules: &dyn TokenRules, mut lines: Vec<String>) -> Vec<String> {
    let mut seen = 0u8;

    for index in (0..lines.len()).rev() {
        let line = lines[index].trim();
        let signature = rules.is_unit_signature(line);

        if signature && seen == 0 {
            seen = 1;
        } else if signature && seen == 1 {
            lines.remove(index);
            seen = 2;
        } else if rules.scope_enter(line).is_some() && index > 1 && seen == 1 {
            if rules.is_unit_signature(lines[index - 1].trim()) {
                lines.remove(index);
                seen = 2;
            }
        } else if seen > 1 {
            lines.remove(index);
        }
    }

    if lines
        .first()
        .is_some_and(|first| rules.scope_enter(first.trim()) == Some(0))
    {
        lines.remove(0);
    }

    lines
}

/// Drop the first unit signature below the selection and everything after it.
fn strip_units_below(rules: &dyn TokenRules, mut lines: Vec<String>) -> Vec<String> {
    if let Some(first) = lines
        .iter()
        .position(|line| rules.is_unit_signature(line.trim()))
    {
        lines.truncate(first);
    }
    lines
}

/// The probe window reduced to the selection's own unit, ready for formatting.
pub(crate) fn prepare_window(ctx: &SnippetContext<'_>, rules: &dyn TokenRules) -> PreparedWindow {
    let window = ctx.window();
    let segments = split_at(ctx.window_lines(), ctx.selection_in_window());
    debug!(
        window_start = window.start,
        window_end = window.end,
        before = segments.before.len(),
        selected = segments.selection.len(),
        after = segments.after.len(),
        "snippet window split"
    );

    let before = carry_open_comments(ctx, rules, segments.before);
    let before = strip_signatures_above(rules, before);
    let after = strip_units_below(rules, segments.after);

    let selection = before.len()..before.len() + segments.selection.len();
    let mut lines = before;
    lines.extend(segments.selection);
    lines.extend(after);
    PreparedWindow { lines, selection }
}

/// Drop prefix lines up to the last lone closer that falls inside the
/// prefix, then leading blanks.
fn trim_prefix(tree: &ScopeTree, prefix: Vec<String>) -> Vec<String> {
    let limit = tree
        .lone_closers()
        .filter_map(|node| node.end)
        .filter(|&end| end < prefix.len())
        .max();

    let kept = match limit {
        Some(end) => prefix.into_iter().skip(end + 1).collect(),
        None => prefix,
    };
    trim_leading_blank(kept)
}

/// Walk the suffix from its end, dropping annotations and comments. A line
/// comment is kept once real code has been seen beneath it.
fn trim_suffix(rules: &dyn TokenRules, suffix: Vec<String>) -> Vec<String> {
    let line_comment = rules.comment_line_token().trim();
    let mut code_found = false;
    let mut kept = Vec::with_capacity(suffix.len());

    for line in suffix.into_iter().rev() {
        let trimmed = line.trim();
        let keeps_comment = code_found && trimmed.starts_with(line_comment);

        if !trimmed.is_empty() && rules.is_special_statement(trimmed) && !keeps_comment {
            continue;
        }
        if !trimmed.is_empty() {
            code_found = true;
        }
        kept.push(line);
    }

    kept.reverse();
    trim_trailing_blank(kept)
}

/// Re-split the formatted window and renumber the selection bounds.
/// Formatting keeps one output line per input line, so `selection` still
/// locates the selected lines in `formatted`.
pub(crate) fn extract(
    ctx: &SnippetContext<'_>,
    rules: &dyn TokenRules,
    tree: &ScopeTree,
    formatted: Vec<String>,
    selection: Range<usize>,
) -> SnippetResult {
    let segments = split_at(formatted, selection);
    let prefix = trim_prefix(tree, segments.before);
    let suffix = trim_suffix(rules, segments.after);

    let range = LineRange {
        start: ctx.start().saturating_sub(prefix.len()),
        end: ctx.end() + suffix.len(),
    };
    debug!(start = range.start, end = range.end, "snippet bounds");

    SnippetResult {
        prefix: prefix.join("\n"),
        selection: segments.selection.join("\n"),
        suffix: suffix.join("\n"),
        range,
    }
}
