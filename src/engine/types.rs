use serde::{Deserialize, Serialize};

/// 1-based inclusive line bounds of an extracted snippet, serialised as
/// `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl From<[usize; 2]> for LineRange {
    fn from([start, end]: [usize; 2]) -> Self {
        Self { start, end }
    }
}

impl From<LineRange> for [usize; 2] {
    fn from(range: LineRange) -> Self {
        [range.start, range.end]
    }
}

/// Output of snippet extraction: the re-indented context split around the
/// selection, each part newline-joined, plus the snippet's new bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetResult {
    pub prefix: String,
    pub selection: String,
    pub suffix: String,
    pub range: LineRange,
}

impl SnippetResult {
    /// All snippet lines in order, as they would be displayed.
    pub fn lines(&self) -> Vec<&str> {
        [&self.prefix, &self.selection, &self.suffix]
            .into_iter()
            .filter(|part| !part.is_empty())
            .flat_map(|part| part.split('\n'))
            .collect()
    }
}
