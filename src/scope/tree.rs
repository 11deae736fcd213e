use super::node::{NodeId, ScopeNode};
use crate::rules::TokenRules;
use std::collections::VecDeque;
use tracing::trace;

/// Arena of [`ScopeNode`]s describing which line ranges nest inside which.
///
/// Built once per formatting call from trimmed lines and discarded after
/// indentation has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub const ROOT: NodeId = 0;

    /// A tree holding only the root, which has neither start nor end.
    pub fn new() -> Self {
        Self {
            nodes: vec![ScopeNode::new(None, None)],
        }
    }

    /// Build the tree for `lines` (already trimmed) and balance it.
    pub fn from_lines(lines: &[String], rules: &dyn TokenRules) -> Self {
        let mut tree = Self::build(lines, rules);
        tree.balance();
        tree
    }

    pub fn root(&self) -> &ScopeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&ScopeNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[ScopeNode] {
        &self.nodes
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Lone closers hanging directly off the root.
    pub fn lone_closers(&self) -> impl Iterator<Item = &ScopeNode> {
        self.root()
            .children
            .iter()
            .map(|&id| &self.nodes[id])
            .filter(|node| node.is_lone_closer())
    }

    fn add_child(&mut self, parent: NodeId, start: Option<usize>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(ScopeNode::new(Some(parent), start));
        self.nodes[parent].children.push(id);
        id
    }

    /// Close `current` at `line`. At the root there is nothing to close, so a
    /// closed placeholder child stands in for the scope whose opening was
    /// never seen. Returns the node that was closed.
    fn close(&mut self, current: NodeId, line: usize) -> NodeId {
        let closed = if current == Self::ROOT {
            self.add_child(Self::ROOT, None)
        } else {
            current
        };
        self.nodes[closed].end = Some(line);
        trace!(node = closed, line, "scope closed");
        closed
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        self.nodes[id].parent.unwrap_or(Self::ROOT)
    }

    /// Build an unbalanced tree from trimmed lines.
    ///
    /// A physical line may hold several delimiters, so its remainder after a
    /// handled delimiter is pushed back onto the queue and examined again
    /// under the same line index.
    pub fn build(lines: &[String], rules: &dyn TokenRules) -> Self {
        let mut tree = Self::new();
        let mut queue: VecDeque<String> = lines.iter().cloned().collect();
        let mut current = Self::ROOT;
        let mut index = 0usize;

        while let Some(line) = queue.pop_front() {
            let enter = rules.scope_enter(&line);
            let exit = rules.scope_exit(&line);

            match (enter, exit) {
                (Some(open), _) if exit.map_or(true, |close| open < close) => {
                    let child = tree.add_child(current, Some(index));
                    trace!(node = child, line = index, "scope opened");
                    current = child;

                    let rest = after_token(&line, open);
                    if rules.scope_enter(rest).is_some() {
                        queue.push_front(rest.to_string());
                        continue;
                    }
                    // a closer later on the same line is handled below
                }
                // `} else {`
                (Some(_), Some(close)) => {
                    let closed = tree.close(current, index);
                    queue.push_front(after_token(&line, close).to_string());
                    current = tree.parent_of(closed);
                    continue;
                }
                _ => {}
            }

            if let Some(close) = exit {
                let closed = tree.close(current, index);
                current = tree.parent_of(closed);

                let rest = after_token(&line, close);
                if rules.scope_exit(rest).is_some() {
                    queue.push_front(rest.to_string());
                    continue;
                }
            }

            index += 1;
        }

        tree
    }

    /// Move every sibling preceding a lone closer underneath it, as if its
    /// unseen opening delimiter came before all of them.
    pub fn balance(&mut self) {
        let mut pending = vec![Self::ROOT];

        while let Some(id) = pending.pop() {
            let mut i = 0;
            while i < self.nodes[id].children.len() {
                let child = self.nodes[id].children[i];
                if i > 0 && self.nodes[child].is_lone_closer() {
                    let absorbed: Vec<NodeId> = self.nodes[id].children.drain(..i).collect();
                    for &sibling in &absorbed {
                        self.nodes[sibling].parent = Some(child);
                    }
                    self.nodes[child].children.splice(0..0, absorbed);
                    trace!(node = child, absorbed = i, "lone closer absorbed siblings");
                    i = 1;
                } else {
                    i += 1;
                }
            }

            pending.extend(self.nodes[id].children.iter().copied());
        }
    }

    /// Indentation units per line: one for every scope whose body covers it.
    pub fn indent_levels(&self, line_count: usize) -> Vec<usize> {
        let mut levels = vec![0usize; line_count];
        for node in &self.nodes {
            for line in node.body(line_count) {
                levels[line] += 1;
            }
        }
        levels
    }
}

/// Text following the single delimiter character at `column`.
fn after_token(line: &str, column: usize) -> &str {
    let Some(rest) = line.get(column..) else {
        return "";
    };
    let mut chars = rest.chars();
    chars.next();
    chars.as_str()
}
