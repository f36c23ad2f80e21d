//! Index-arena port of the Buchheim/Walker tidy tree pass.
//!
//! Field names follow the paper: `prelim` is the preliminary coordinate, `modifier` the pending
//! subtree offset, `thread` the contour shortcut and `ancestor` the greatest distinct ancestor.
//! Coordinates are produced in separation units; the caller scales them to pixels.

use mapa_core::TreeNode;

pub(crate) struct Slot<'a> {
    pub tree: &'a TreeNode,
    pub depth: usize,
    pub parent: Option<usize>,
    children: Vec<usize>,
    /// Position among siblings.
    number: usize,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor while apportioning this node's children.
    default_ancestor: Option<usize>,
}

pub(crate) struct Arena<'a> {
    slots: Vec<Slot<'a>>,
    sibling: f64,
    cousin: f64,
}

impl<'a> Arena<'a> {
    /// Flattens `root` into pre-order slots; index 0 is the root.
    pub fn from_tree(root: &'a TreeNode) -> Self {
        let mut slots: Vec<Slot<'a>> = Vec::new();
        let mut stack: Vec<(&'a TreeNode, Option<usize>, usize, usize)> = vec![(root, None, 0, 0)];
        while let Some((tree, parent, depth, number)) = stack.pop() {
            let idx = slots.len();
            if let Some(p) = parent {
                slots[p].children.push(idx);
            }
            slots.push(Slot {
                tree,
                depth,
                parent,
                children: Vec::with_capacity(tree.children.len()),
                number,
                prelim: 0.0,
                modifier: 0.0,
                change: 0.0,
                shift: 0.0,
                thread: None,
                ancestor: idx,
                default_ancestor: None,
            });
            for (i, child) in tree.children.iter().enumerate().rev() {
                stack.push((child.as_ref(), Some(idx), depth + 1, i));
            }
        }
        Self {
            slots,
            sibling: 1.0,
            cousin: 1.0,
        }
    }

    pub fn nodes(&self) -> &[Slot<'a>] {
        &self.slots
    }

    /// Runs both walks and returns each slot's cross-axis coordinate, root at 0.
    pub fn solve(&mut self, sibling: f64, cousin: f64) -> Vec<f64> {
        self.sibling = sibling;
        self.cousin = cousin;
        if self.slots.is_empty() {
            return Vec::new();
        }

        // Post-order, children left to right.
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.slots[v].children.iter().copied());
        }
        for &v in order.iter().rev() {
            self.first_walk(v);
        }

        let mut out = vec![0.0; self.slots.len()];
        let root_offset = -self.slots[0].prelim;
        out[0] = self.slots[0].prelim + root_offset;
        self.slots[0].modifier += root_offset;
        // Slots are stored in pre-order, so every parent is finalized before its children.
        for v in 1..self.slots.len() {
            let Some(p) = self.slots[v].parent else {
                continue;
            };
            let parent_mod = self.slots[p].modifier;
            out[v] = self.slots[v].prelim + parent_mod;
            self.slots[v].modifier += parent_mod;
        }
        out
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.slots[a].parent == self.slots[b].parent {
            self.sibling
        } else {
            self.cousin
        }
    }

    fn previous_sibling(&self, v: usize) -> Option<usize> {
        let parent = self.slots[v].parent?;
        let number = self.slots[v].number;
        if number == 0 {
            return None;
        }
        self.slots[parent].children.get(number - 1).copied()
    }

    fn first_walk(&mut self, v: usize) {
        let w = self.previous_sibling(v);

        if let (Some(&first), Some(&last)) =
            (self.slots[v].children.first(), self.slots[v].children.last())
        {
            self.execute_shifts(v);
            let midpoint = (self.slots[first].prelim + self.slots[last].prelim) / 2.0;
            match w {
                Some(w) => {
                    let z = self.slots[w].prelim + self.separation(v, w);
                    self.slots[v].prelim = z;
                    self.slots[v].modifier = z - midpoint;
                }
                None => self.slots[v].prelim = midpoint,
            }
        } else if let Some(w) = w {
            self.slots[v].prelim = self.slots[w].prelim + self.separation(v, w);
        }

        let Some(parent) = self.slots[v].parent else {
            return;
        };
        let first_sibling = self.slots[parent].children[0];
        let current = self.slots[parent].default_ancestor.unwrap_or(first_sibling);
        let next = self.apportion(v, w, current);
        self.slots[parent].default_ancestor = Some(next);
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };
        let Some(parent) = self.slots[v].parent else {
            return ancestor;
        };

        let mut vop = v;
        let mut vom = self.slots[parent].children[0];
        let mut sip = self.slots[v].modifier;
        let mut sop = self.slots[v].modifier;
        let mut sim = self.slots[w].modifier;
        let mut som = self.slots[vom].modifier;

        let mut vim = self.next_right(w);
        let mut vip = self.next_left(v);
        while let (Some(im), Some(ip)) = (vim, vip) {
            if let Some(n) = self.next_left(vom) {
                vom = n;
            }
            if let Some(n) = self.next_right(vop) {
                vop = n;
            }
            self.slots[vop].ancestor = v;

            let shift = self.slots[im].prelim + sim - self.slots[ip].prelim - sip
                + self.separation(im, ip);
            if shift > 0.0 {
                let wm = self.next_ancestor(im, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.slots[im].modifier;
            sip += self.slots[ip].modifier;
            som += self.slots[vom].modifier;
            sop += self.slots[vop].modifier;

            vim = self.next_right(im);
            vip = self.next_left(ip);
        }

        if let Some(im) = vim {
            if self.next_right(vop).is_none() {
                self.slots[vop].thread = Some(im);
                self.slots[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = vip {
            if self.next_left(vom).is_none() {
                self.slots[vom].thread = Some(ip);
                self.slots[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.slots[wp].number as f64 - self.slots[wm].number as f64;
        let change = if subtrees > 0.0 { shift / subtrees } else { shift };
        self.slots[wp].change -= change;
        self.slots[wp].shift += shift;
        self.slots[wm].change += change;
        self.slots[wp].prelim += shift;
        self.slots[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.slots[v].children.len()).rev() {
            let w = self.slots[v].children[i];
            let slot = &mut self.slots[w];
            slot.prelim += shift;
            slot.modifier += shift;
            change += slot.change;
            shift += slot.shift + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.slots[vim].ancestor;
        if self.slots[a].parent == self.slots[v].parent {
            a
        } else {
            ancestor
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.slots[v].children.first().copied().or(self.slots[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.slots[v].children.last().copied().or(self.slots[v].thread)
    }
}
