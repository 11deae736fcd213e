use std::ops::Range;

/// Index of a node inside its [`ScopeTree`](super::ScopeTree) arena.
pub type NodeId = usize;

/// One lexical scope. A missing `start` or `end` means the delimiter lies
/// outside the lines the tree was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeNode {
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub children: Vec<NodeId>,
    /// Upward link only; ownership runs parent -> children.
    pub parent: Option<NodeId>,
}

impl ScopeNode {
    pub(crate) fn new(parent: Option<NodeId>, start: Option<usize>) -> Self {
        Self {
            start,
            end: None,
            children: Vec::new(),
            parent,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Closed, but its opening delimiter was never seen.
    pub fn is_lone_closer(&self) -> bool {
        self.start.is_none() && self.end.is_some()
    }

    /// Lines receiving one indentation unit from this scope, clipped to
    /// `line_count`.
    pub fn body(&self, line_count: usize) -> Range<usize> {
        let range = match (self.start, self.end) {
            (Some(start), Some(end)) => start + 1..end,
            (None, Some(end)) => 0..end,
            (Some(start), None) => start + 1..line_count,
            (None, None) => 0..0,
        };
        range.start.min(line_count)..range.end.min(line_count)
    }
}
