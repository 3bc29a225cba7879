use crate::error::Result;
use crate::graph::Point;
use crate::hierarchy::{Hierarchy, TreeNode, normalize};
use serde::Serialize;
use std::f64::consts::TAU;

/// Cluster layout output: polar coordinates plus depth, one per tree node,
/// in preorder. Rendering connects each node to its parent; path curvature is
/// the renderer's concern.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedNode {
    pub id: String,
    /// Angle in `[0, 2π)`.
    pub angle: f64,
    pub radius: f64,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
}

pub fn polar_xy(radius: f64, angle: f64) -> Point {
    Point {
        x: radius * angle.cos(),
        y: radius * angle.sin(),
    }
}

/// Radial cluster layout (port of d3-hierarchy `cluster` with a
/// `size([2π, R])` circle).
///
/// Leaves get evenly spaced angles `2π·i/n` in name-sorted traversal order;
/// upstream d3 spaces them `2π·i/(n-1)` which makes the first and last leaf
/// coincide on a full circle, so we keep the span half-open instead. Internal
/// angles propagate bottom-up as the mean of child angles. Radius grows by a
/// fixed per-depth increment from 0 at the root to `max_radius` at the
/// deepest ring.
///
/// Pure and deterministic: identical input yields bit-identical output.
pub fn layout_hierarchy(root: &TreeNode, max_radius: f64) -> Result<Vec<PlacedNode>> {
    let hierarchy = normalize(root)?;
    Ok(place(&hierarchy, max_radius))
}

fn place(h: &Hierarchy<'_>, max_radius: f64) -> Vec<PlacedNode> {
    let n = h.entries.len();
    let leaf_total: usize = h.entries.iter().filter(|e| e.children.is_empty()).count();

    // Name-sorted sibling order (stable, ties keep input order). The source
    // behavior sorts the hierarchy by name before laying out; keeping that
    // sort here is what makes equal inputs reproduce equal angles.
    let sorted_children: Vec<Vec<usize>> = h
        .entries
        .iter()
        .map(|e| {
            let mut c = e.children.clone();
            c.sort_by(|&a, &b| h.entries[a].node.name.cmp(&h.entries[b].node.name));
            c
        })
        .collect();

    // Leaf angles in sorted traversal order.
    let mut angles = vec![0.0f64; n];
    let mut next_leaf = 0usize;
    let mut stack: Vec<usize> = vec![0];
    while let Some(idx) = stack.pop() {
        if sorted_children[idx].is_empty() {
            angles[idx] = TAU * (next_leaf as f64) / (leaf_total as f64);
            next_leaf += 1;
        } else {
            for &c in sorted_children[idx].iter().rev() {
                stack.push(c);
            }
        }
    }

    // Internal angles bottom-up: preorder indices put children after their
    // parent, so a reverse pass sees every child before its parent.
    for idx in (0..n).rev() {
        let children = &h.entries[idx].children;
        if !children.is_empty() {
            let sum: f64 = children.iter().map(|&c| angles[c]).sum();
            angles[idx] = sum / (children.len() as f64);
        }
    }

    let max_depth = h.max_depth();
    let ring = if max_depth == 0 {
        0.0
    } else {
        max_radius.max(0.0) / (max_depth as f64)
    };

    h.entries
        .iter()
        .enumerate()
        .map(|(idx, e)| PlacedNode {
            id: e.node.name.clone(),
            angle: angles[idx],
            radius: ring * (e.depth as f64),
            depth: e.depth,
            parent: e.parent,
        })
        .collect()
}
