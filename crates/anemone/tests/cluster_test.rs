use anemone::{TreeNode, layout_hierarchy};
use std::f64::consts::TAU;

fn leaf(name: &str) -> TreeNode {
    TreeNode {
        name: name.to_string(),
        description: None,
        children: Vec::new(),
    }
}

fn branch(name: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode {
        name: name.to_string(),
        description: None,
        children,
    }
}

/// Root with two branches of three leaves each, sibling names already in
/// alphabetical order so preorder matches the layout's sorted traversal.
fn sample_tree() -> TreeNode {
    branch(
        "root",
        vec![
            branch("alpha", vec![leaf("a1"), leaf("a2"), leaf("a3")]),
            branch("beta", vec![leaf("b1"), leaf("b2"), leaf("b3")]),
        ],
    )
}

#[test]
fn layout_is_bit_identical_across_runs() {
    let tree = sample_tree();
    let first = layout_hierarchy(&tree, 300.0).unwrap();
    let second = layout_hierarchy(&tree, 300.0).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.angle.to_bits(), b.angle.to_bits());
        assert_eq!(a.radius.to_bits(), b.radius.to_bits());
        assert_eq!(a.depth, b.depth);
    }
}

#[test]
fn internal_angle_is_mean_of_child_angles() {
    let placed = layout_hierarchy(&sample_tree(), 300.0).unwrap();
    for (idx, node) in placed.iter().enumerate() {
        let children: Vec<&anemone::PlacedNode> =
            placed.iter().filter(|p| p.parent == Some(idx)).collect();
        if children.is_empty() {
            continue;
        }
        let mean: f64 = children.iter().map(|c| c.angle).sum::<f64>() / (children.len() as f64);
        assert!(
            (node.angle - mean).abs() < 1e-12,
            "{}: angle {} vs child mean {mean}",
            node.id,
            node.angle
        );
    }
}

#[test]
fn leaf_angles_increase_evenly_over_the_full_circle() {
    let placed = layout_hierarchy(&sample_tree(), 300.0).unwrap();
    let parents: std::collections::HashSet<usize> =
        placed.iter().filter_map(|p| p.parent).collect();
    let leaves: Vec<&anemone::PlacedNode> = placed
        .iter()
        .enumerate()
        .filter(|(idx, _)| !parents.contains(idx))
        .map(|(_, p)| p)
        .collect();
    assert_eq!(leaves.len(), 6);
    let expected_gap = TAU / 6.0;
    for (i, l) in leaves.iter().enumerate() {
        let expected = expected_gap * (i as f64);
        assert!(
            (l.angle - expected).abs() < 1e-12,
            "{}: angle {} expected {expected}",
            l.id,
            l.angle
        );
        assert!(l.angle >= 0.0 && l.angle < TAU);
        if i > 0 {
            assert!(l.angle > leaves[i - 1].angle, "angles must strictly increase");
        }
    }
}

#[test]
fn sibling_order_comes_from_names_not_input_order() {
    // Children supplied out of alphabetical order: "anchovy" must still take
    // the first slot on the circle.
    let tree = branch("root", vec![leaf("zebra"), leaf("mussel"), leaf("anchovy")]);
    let placed = layout_hierarchy(&tree, 100.0).unwrap();
    let angle_of = |id: &str| placed.iter().find(|p| p.id == id).unwrap().angle;
    assert!((angle_of("anchovy") - 0.0).abs() < 1e-12);
    assert!(angle_of("mussel") < angle_of("zebra"));
}

#[test]
fn tree_documents_deserialize_and_lay_out() {
    let tree: TreeNode = serde_json::from_str(
        r#"{"name":"root","description":"origin","children":[
            {"name":"a","children":[{"name":"a1"}]},
            {"name":"b"}
        ]}"#,
    )
    .unwrap();
    let placed = layout_hierarchy(&tree, 120.0).unwrap();
    assert_eq!(placed.len(), 4);
    assert_eq!(placed[0].id, "root");
    assert_eq!(placed[0].radius, 0.0);
}

#[test]
fn root_only_tree_is_a_single_point_at_the_origin() {
    let placed = layout_hierarchy(&leaf("solo"), 250.0).unwrap();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].radius, 0.0);
    assert_eq!(placed[0].angle, 0.0);
    assert_eq!(placed[0].depth, 0);
}

#[test]
fn single_leaf_lands_at_angle_zero_on_the_outer_ring() {
    let tree = branch("root", vec![leaf("only")]);
    let placed = layout_hierarchy(&tree, 200.0).unwrap();
    let only = placed.iter().find(|p| p.id == "only").unwrap();
    assert_eq!(only.angle, 0.0);
    assert!((only.radius - 200.0).abs() < 1e-12);
}

#[test]
fn radius_is_non_decreasing_in_depth_and_capped_at_max() {
    let tree = branch(
        "root",
        vec![branch("mid", vec![branch("deep", vec![leaf("leaf")])])],
    );
    let placed = layout_hierarchy(&tree, 300.0).unwrap();
    let mut by_depth: Vec<(usize, f64)> = placed.iter().map(|p| (p.depth, p.radius)).collect();
    by_depth.sort_by_key(|&(d, _)| d);
    for pair in by_depth.windows(2) {
        assert!(pair[1].1 >= pair[0].1);
    }
    assert_eq!(placed.iter().find(|p| p.depth == 0).unwrap().radius, 0.0);
    let deepest = placed.iter().map(|p| p.radius).fold(0.0f64, f64::max);
    assert!((deepest - 300.0).abs() < 1e-12);
}
