use crate::error::FormatError;
use std::ops::Range;

/// Immutable per-call state of a snippet extraction. Everything the
/// pipeline needs to know about the request travels in here, so a
/// [`Formatter`](super::Formatter) never stores request data.
#[derive(Debug, Clone)]
pub struct SnippetContext<'a> {
    source: Vec<&'a str>,
    start: usize,
    end: usize,
    offset: usize,
}

impl<'a> SnippetContext<'a> {
    /// `start` and `end` are 1-based and inclusive.
    pub fn new(source: &'a str, start: usize, end: usize, offset: usize) -> Result<Self, FormatError> {
        if start == 0 {
            return Err(FormatError::InvalidSelectionStart);
        }
        if end < start {
            return Err(FormatError::InvertedSelection { start, end });
        }

        let source: Vec<&str> = source.split('\n').collect();
        if start > source.len() {
            return Err(FormatError::SelectionOutOfRange {
                start,
                lines: source.len(),
            });
        }

        // an end past the last line selects through the end of the source
        let end = end.min(source.len());
        Ok(Self {
            source,
            start,
            end,
            offset,
        })
    }

    pub fn source(&self) -> &[&'a str] {
        &self.source
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Last selected line, clipped to the source.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The selected source lines, untrimmed.
    pub fn selection(&self) -> &[&'a str] {
        &self.source[self.start - 1..self.end]
    }

    /// Position of the selection inside [`window_lines`](Self::window_lines).
    pub fn selection_in_window(&self) -> Range<usize> {
        let window = self.window();
        self.start - 1 - window.start..self.end - window.start
    }

    /// 0-based probe range `[start - offset, end + offset]`, clipped to the source.
    pub fn window(&self) -> Range<usize> {
        let first = (self.start - 1).saturating_sub(self.offset);
        let last = self.end.saturating_add(self.offset).min(self.source.len());
        first..last
    }

    pub fn window_lines(&self) -> Vec<String> {
        self.source[self.window()]
            .iter()
            .map(|line| line.to_string())
            .collect()
    }
}
