use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Traversal guard. Owned `TreeNode` values cannot form a cycle, but trees
/// built from untyped input can be arbitrarily degenerate; past this budget we
/// fail fast instead of allocating without bound.
const MAX_NODES: usize = 1 << 20;

/// Nested source tree. Constructed once from static content data and treated
/// as immutable during layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One flattened node: index pointers into the owning [`Hierarchy`].
#[derive(Debug, Clone)]
pub struct HierarchyEntry<'a> {
    pub node: &'a TreeNode,
    pub parent: Option<usize>,
    pub depth: usize,
    /// Number of leaves under this entry (1 for a leaf). For an internal
    /// entry this equals the sum over its children.
    pub leaf_count: usize,
    pub children: Vec<usize>,
}

/// Flat, indexed view of a tree in preorder (every parent precedes its
/// children). Built once per layout pass and discarded after angles are
/// computed.
#[derive(Debug, Clone)]
pub struct Hierarchy<'a> {
    pub entries: Vec<HierarchyEntry<'a>>,
}

impl<'a> Hierarchy<'a> {
    pub fn max_depth(&self) -> usize {
        self.entries.iter().map(|e| e.depth).max().unwrap_or(0)
    }
}

/// Flattens `root` into preorder entries and aggregates subtree leaf counts.
///
/// Pure function of the input tree; the only failure mode is the defensive
/// [`MAX_NODES`] budget (the shape a cyclic or adversarial input would take).
pub fn normalize(root: &TreeNode) -> Result<Hierarchy<'_>> {
    let mut entries: Vec<HierarchyEntry<'_>> = Vec::new();
    let mut stack: Vec<(&TreeNode, Option<usize>, usize)> = vec![(root, None, 0)];

    while let Some((node, parent, depth)) = stack.pop() {
        if entries.len() >= MAX_NODES {
            return Err(Error::MalformedTree {
                message: format!("tree exceeds {MAX_NODES} nodes; input is likely cyclic"),
            });
        }
        let idx = entries.len();
        entries.push(HierarchyEntry {
            node,
            parent,
            depth,
            leaf_count: 0,
            children: Vec::with_capacity(node.children.len()),
        });
        if let Some(p) = parent {
            entries[p].children.push(idx);
        }
        // Reverse push keeps sibling order intact in the preorder output.
        for child in node.children.iter().rev() {
            stack.push((child, Some(idx), depth + 1));
        }
    }

    // Preorder guarantees children sit after their parent, so one reverse
    // (child-before-parent) pass aggregates leaf counts bottom-up.
    for idx in (0..entries.len()).rev() {
        entries[idx].leaf_count = if entries[idx].children.is_empty() {
            1
        } else {
            entries[idx]
                .children
                .iter()
                .map(|&c| entries[c].leaf_count)
                .sum()
        };
    }

    Ok(Hierarchy { entries })
}
