//! Building the module path tree.
//!
//! Modules are sorted by path and inserted one segment at a time. The first
//! segment selects a root; each further segment selects or creates a child.
//! A module whose path is a prefix of another's ends up on an inner node
//! that has both a module and children.

use std::collections::BTreeMap;

use crate::module::ModuleRecord;

use super::error::{TreeError, TreeResult};
use super::node::Node;

/// Build the forest of path trees for `modules`.
///
/// Roots are returned sorted by segment. Fails on an empty path, an empty,
/// `.` or `..` segment, or two modules with the same path; no partial tree
/// is returned.
pub fn build_forest(mut modules: Vec<ModuleRecord>) -> TreeResult<Vec<Node>> {
    modules.sort_by(|a, b| a.path.cmp(&b.path));

    let mut roots: BTreeMap<String, Node> = BTreeMap::new();

    for module in modules {
        if module.path.is_empty() {
            return Err(TreeError::EmptyPath);
        }

        let path = module.path.clone();
        let segments: Vec<&str> = path.split('/').collect();
        let Some((first, rest)) = segments.split_first() else {
            return Err(TreeError::EmptyPath);
        };
        let to_tree_error = |e: InsertError| match e {
            InsertError::EmptySegment => TreeError::EmptySegment { path: path.clone() },
            InsertError::Relative(segment) => TreeError::InvalidSegment {
                path: path.clone(),
                segment: segment.to_string(),
            },
            InsertError::Occupied => TreeError::Duplicate { path: path.clone() },
        };

        check_segment(first).map_err(to_tree_error)?;

        let root = roots
            .entry(first.to_string())
            .or_insert_with(|| Node::new(*first));

        insert(root, rest, module).map_err(to_tree_error)?;
    }

    Ok(roots.into_values().collect())
}

enum InsertError {
    EmptySegment,
    Relative(&'static str),
    Occupied,
}

fn check_segment(segment: &str) -> Result<(), InsertError> {
    match segment {
        "" => Err(InsertError::EmptySegment),
        "." => Err(InsertError::Relative(".")),
        ".." => Err(InsertError::Relative("..")),
        _ => Ok(()),
    }
}

fn insert(node: &mut Node, segments: &[&str], module: ModuleRecord) -> Result<(), InsertError> {
    match segments.split_first() {
        None => {
            if node.module.is_some() {
                return Err(InsertError::Occupied);
            }
            node.module = Some(module);
            Ok(())
        }
        Some((segment, rest)) => {
            check_segment(segment)?;
            insert(node.child_mut_or_insert(segment), rest, module)
        }
    }
}
