/// Byte column of the first `token` in `line` that is not inside a quoted span.
///
/// A quoted span opens at `"` or `'` and runs to the next matching quote,
/// with `\` escaping the character after it. A quote that never closes is
/// treated as an ordinary character.
pub fn find_unquoted(line: &str, token: &str) -> Option<usize> {
    if token.is_empty() {
        return None;
    }

    let mut pos = 0usize;
    while pos < line.len() {
        let rest = &line[pos..];
        if rest.starts_with(token) {
            return Some(pos);
        }

        let ch = rest.chars().next()?;
        if ch == '"' || ch == '\'' {
            if let Some(len) = quoted_span_len(rest, ch) {
                pos += len;
                continue;
            }
        }
        pos += ch.len_utf8();
    }

    None
}

/// Length in bytes of the quoted span at the start of `text`, both quotes included.
fn quoted_span_len(text: &str, quote: char) -> Option<usize> {
    let mut escaped = false;

    for (i, ch) in text.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == quote {
            return Some(i + ch.len_utf8());
        }
    }

    None
}
