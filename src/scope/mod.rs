mod node;
mod tree;

pub use node::{NodeId, ScopeNode};
pub use tree::ScopeTree;
