use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;


/// Node role within the map. Missing `type` fields deserialize to [`NodeKind::Item`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Category,
    #[default]
    Item,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Category => "category",
            NodeKind::Item => "item",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<TreeNode>>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn item(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Item)
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A validated mind map tree.
///
/// Cloning is cheap (one `Arc` bump). Edits never mutate in place: [`MindTree::with_node_name`]
/// rebuilds the root-to-target path and shares everything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MindTree {
    root: Arc<TreeNode>,
}

impl MindTree {
    pub fn new(root: TreeNode) -> Result<Self> {
        validate(&root)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Skips validation. Only for trees whose invariants hold by construction (the seed, or a
    /// rename of an already validated tree).
    pub(crate) fn from_validated(root: Arc<TreeNode>) -> Self {
        Self { root }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let root: TreeNode = serde_json::from_str(text)?;
        Self::new(root)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn root_arc(&self) -> &Arc<TreeNode> {
        &self.root
    }

    /// Depth-first (pre-order) iteration over every node, children in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![self.root.as_ref()],
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a valid tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels below the root (a childless root has height 0).
    pub fn height(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            node.children
                .iter()
                .map(|c| 1 + walk(c))
                .max()
                .unwrap_or(0)
        }
        walk(&self.root)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Returns a tree where the node `id` carries `name`.
    ///
    /// Ancestors of the target are shallow-cloned; every other subtree is shared with `self`.
    /// An unknown id returns a tree that shares the original root.
    pub fn with_node_name(&self, id: &str, name: &str) -> MindTree {
        match rename_in(&self.root, id, name) {
            Some(root) => {
                tracing::debug!(id, "renamed mind map node");
                MindTree::from_validated(root)
            }
            None => {
                tracing::debug!(id, "rename target not found; tree unchanged");
                self.clone()
            }
        }
    }

    /// True when both trees share the same root allocation.
    pub fn ptr_eq(&self, other: &MindTree) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

impl TryFrom<TreeNode> for MindTree {
    type Error = Error;

    fn try_from(root: TreeNode) -> Result<Self> {
        Self::new(root)
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev().map(|c| c.as_ref()));
        Some(node)
    }
}

fn rename_in(node: &Arc<TreeNode>, id: &str, name: &str) -> Option<Arc<TreeNode>> {
    if node.id == id {
        let mut renamed = TreeNode::clone(node);
        renamed.name = name.to_string();
        return Some(Arc::new(renamed));
    }

    for (idx, child) in node.children.iter().enumerate() {
        let Some(replacement) = rename_in(child, id, name) else {
            continue;
        };
        let mut children = node.children.clone();
        children[idx] = replacement;
        return Some(Arc::new(TreeNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            children,
        }));
    }

    None
}

fn validate(root: &TreeNode) -> Result<()> {
    if root.kind != NodeKind::Root {
        return Err(Error::RootKind {
            id: root.id.clone(),
            kind: root.kind,
        });
    }

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut stack: Vec<&TreeNode> = vec![root];
    while let Some(node) = stack.pop() {
        if node.id.is_empty() {
            return Err(Error::EmptyId);
        }
        if !seen.insert(node.id.as_str()) {
            return Err(Error::DuplicateId {
                id: node.id.clone(),
            });
        }
        if node.kind == NodeKind::Root && !std::ptr::eq(node, root) {
            return Err(Error::NestedRoot {
                id: node.id.clone(),
            });
        }
        stack.extend(node.children.iter().map(|c| c.as_ref()));
    }
    Ok(())
}
