//! Path tree nodes.

use crate::module::ModuleRecord;

/// One path segment in the module tree.
///
/// A node owns the module whose path ends at it (if any) and its child
/// segments. Children are kept sorted by segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub segment: String,
    pub module: Option<ModuleRecord>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty node for a segment.
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            module: None,
            children: Vec::new(),
        }
    }

    /// A module with no deeper modules; it can be linked as a whole.
    pub fn is_collapsible_leaf(&self) -> bool {
        self.module.is_some() && self.children.is_empty()
    }

    /// Child node for `segment`, if present.
    pub fn child(&self, segment: &str) -> Option<&Node> {
        self.children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.children[i])
    }

    /// Child node for `segment`, inserted in sorted position when absent.
    pub(crate) fn child_mut_or_insert(&mut self, segment: &str) -> &mut Node {
        let index = match self
            .children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
        {
            Ok(i) => i,
            Err(i) => {
                self.children.insert(i, Node::new(segment));
                i
            }
        };
        &mut self.children[index]
    }

    /// Number of modules in this subtree, this node included.
    pub fn module_count(&self) -> usize {
        usize::from(self.module.is_some())
            + self.children.iter().map(Node::module_count).sum::<usize>()
    }

    /// Look up a descendant by a slash-separated path relative to this node.
    pub fn find(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .try_fold(self, |node, segment| node.child(segment))
    }
}
