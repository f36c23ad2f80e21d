#![forbid(unsafe_code)]

//! Tidy tree layout for mind maps.
//!
//! Positions follow d3-hierarchy's `tree()` with a fixed node size (Buchheim, Jünger and Leipert's
//! linear-time variant of Walker's algorithm), laid out left-to-right: depth grows along the
//! horizontal axis and siblings spread vertically.

pub mod model;
mod tidy;

pub use model::{Bounds, LayoutEdge, LayoutNode, Point, TreeLayout};

use mapa_core::{MindTree, TreeNode};
use serde::{Deserialize, Serialize};

/// Sizing configuration for [`layout_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
    /// Spacing factor between adjacent nodes that share a parent.
    pub sibling_separation: f64,
    /// Spacing factor between adjacent nodes under different parents.
    pub cousin_separation: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 240.0,
            node_height: 60.0,
            horizontal_gap: 100.0,
            vertical_gap: 20.0,
            sibling_separation: 1.2,
            cousin_separation: 1.4,
        }
    }
}

impl LayoutConfig {
    /// Replaces non-finite or non-positive values (negative gaps included) with defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        fn pick(v: f64, fallback: f64, allow_zero: bool) -> f64 {
            let ok = v.is_finite() && if allow_zero { v >= 0.0 } else { v > 0.0 };
            if ok { v } else { fallback }
        }
        Self {
            node_width: pick(self.node_width, d.node_width, false),
            node_height: pick(self.node_height, d.node_height, false),
            horizontal_gap: pick(self.horizontal_gap, d.horizontal_gap, true),
            vertical_gap: pick(self.vertical_gap, d.vertical_gap, true),
            sibling_separation: pick(self.sibling_separation, d.sibling_separation, false),
            cousin_separation: pick(self.cousin_separation, d.cousin_separation, false),
        }
    }

    /// Distance between depth columns.
    pub fn column_spacing(&self) -> f64 {
        self.node_width + self.horizontal_gap
    }

    /// Base distance between adjacent rows, before the separation factor.
    pub fn row_spacing(&self) -> f64 {
        self.node_height + self.vertical_gap
    }
}

/// Lays out `tree`. Pure: the same tree and config always produce the same positions.
pub fn layout_tree(tree: &MindTree, config: &LayoutConfig) -> TreeLayout {
    layout_root(tree.root(), config)
}

pub fn layout_root(root: &TreeNode, config: &LayoutConfig) -> TreeLayout {
    let config = config.sanitized();
    let mut arena = tidy::Arena::from_tree(root);
    let rows = arena.solve(config.sibling_separation, config.cousin_separation);

    let column = config.column_spacing();
    let row = config.row_spacing();

    let nodes: Vec<LayoutNode> = arena
        .nodes()
        .iter()
        .zip(rows)
        .map(|(n, r)| LayoutNode {
            id: n.tree.id.clone(),
            name: n.tree.name.clone(),
            kind: n.tree.kind,
            depth: n.depth,
            parent: n.parent,
            x: n.depth as f64 * column,
            y: r * row,
        })
        .collect();

    let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
    for (target, node) in nodes.iter().enumerate() {
        let Some(source) = node.parent else {
            continue;
        };
        let parent = &nodes[source];
        edges.push(LayoutEdge {
            source,
            target,
            source_id: parent.id.clone(),
            target_id: node.id.clone(),
            from: Point::new(parent.x + config.node_width, parent.y),
            to: Point::new(node.x, node.y),
        });
    }

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "tree layout pass");
    TreeLayout::new(nodes, edges)
}
