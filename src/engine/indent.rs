use crate::rules::TokenRules;

/// Prefix every trimmed line with `unit` repeated `levels[i]` times, plus any
/// comment padding the rules ask for.
pub(crate) fn apply_levels(
    lines: &[String],
    levels: &[usize],
    unit: &str,
    rules: &dyn TokenRules,
    align_comments: bool,
) -> Vec<String> {
    lines
        .iter()
        .zip(levels)
        .map(|(line, &level)| {
            let padding = if align_comments {
                rules.comment_body_padding(line)
            } else {
                ""
            };
            let mut out = String::with_capacity(unit.len() * level + padding.len() + line.len());
            for _ in 0..level {
                out.push_str(unit);
            }
            out.push_str(padding);
            out.push_str(line);
            out
        })
        .collect()
}

/// A line that is not a complete expression pushes the next line one unit
/// further in, unless that next line opens or closes a scope.
pub(crate) fn indent_continuations(lines: &mut [String], rules: &dyn TokenRules, unit: &str) {
    for i in 0..lines.len().saturating_sub(1) {
        if rules.is_complete_expression(lines, i) {
            continue;
        }

        let next = &lines[i + 1];
        if rules.scope_enter(next).is_none() && rules.scope_exit(next).is_none() {
            lines[i + 1].insert_str(0, unit);
        }
    }
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub(crate) fn trim_leading_blank(mut lines: Vec<String>) -> Vec<String> {
    let first = lines.iter().position(|line| !is_blank(line)).unwrap_or(lines.len());
    lines.drain(..first);
    lines
}

pub(crate) fn trim_trailing_blank(mut lines: Vec<String>) -> Vec<String> {
    while lines.last().is_some_and(|line| is_blank(line)) {
        lines.pop();
    }
    lines
}
