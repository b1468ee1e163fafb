//! Linear-time tidy tree (Buchheim, Jünger and Leipert's refinement of
//! Walker's algorithm).
//!
//! Positions come out as `(x, y)` in a `breadth × depth` box: `x` spreads the
//! leaves across `[0, breadth)` leaving half a separation at both ends, `y`
//! is proportional to depth with the deepest node at `depth`.

use crate::ir::TreeNode;

#[derive(Debug, Clone)]
pub struct TidyPoint<'a> {
    pub node: &'a TreeNode,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TidyOptions {
    pub breadth: f32,
    pub depth: f32,
    pub sibling_separation: f32,
    pub subtree_separation: f32,
}

/// Walker bookkeeping for one node. Index 0 is a synthetic parent of the root.
#[derive(Debug, Clone)]
struct Slot {
    parent: usize,
    children: Vec<usize>,
    number: usize,
    depth: usize,
    ancestor: usize,
    default_ancestor: Option<usize>,
    prelim: f32,
    modifier: f32,
    change: f32,
    shift: f32,
    thread: Option<usize>,
}

impl Slot {
    fn new(index: usize, parent: usize, number: usize, depth: usize) -> Self {
        Self {
            parent,
            children: Vec::new(),
            number,
            depth,
            ancestor: index,
            default_ancestor: None,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
        }
    }
}

/// Lays out `root`; the result is in pre-order with the root at index 0.
pub fn tidy_tree<'a>(root: &'a TreeNode, options: &TidyOptions) -> Vec<TidyPoint<'a>> {
    let mut walker = Walker::build(root, options);
    let order: Vec<usize> = (1..walker.slots.len()).collect();

    // Children left to right before their parent.
    let post_order = std::mem::take(&mut walker.post_order);
    for &v in &post_order {
        walker.first_walk(v);
    }
    walker.slots[0].modifier = -walker.slots[1].prelim;

    let mut xs = vec![0.0f32; walker.slots.len()];
    for &v in &order {
        let parent = walker.slots[v].parent;
        let parent_mod = walker.slots[parent].modifier;
        xs[v] = walker.slots[v].prelim + parent_mod;
        walker.slots[v].modifier += parent_mod;
    }

    let (mut left, mut right, mut bottom) = (1, 1, 1);
    for &v in &order {
        if xs[v] < xs[left] {
            left = v;
        }
        if xs[v] > xs[right] {
            right = v;
        }
        if walker.slots[v].depth > walker.slots[bottom].depth {
            bottom = v;
        }
    }
    let s = if left == right {
        1.0
    } else {
        walker.separation(left, right) / 2.0
    };
    let tx = s - xs[left];
    let kx = options.breadth / (xs[right] + s + tx);
    let max_depth = walker.slots[bottom].depth.max(1) as f32;
    let ky = options.depth / max_depth;

    order
        .iter()
        .zip(walker.nodes)
        .map(|(&v, node)| {
            let slot = &walker.slots[v];
            TidyPoint {
                node,
                parent: (slot.parent > 0).then(|| slot.parent - 1),
                children: slot.children.iter().map(|c| c - 1).collect(),
                depth: slot.depth,
                x: (xs[v] + tx) * kx,
                y: slot.depth as f32 * ky,
            }
        })
        .collect()
}

struct Walker<'a> {
    slots: Vec<Slot>,
    /// Tree nodes in pre-order; `nodes[i]` belongs to `slots[i + 1]`.
    nodes: Vec<&'a TreeNode>,
    post_order: Vec<usize>,
    sibling_separation: f32,
    subtree_separation: f32,
}

impl<'a> Walker<'a> {
    fn build(root: &'a TreeNode, options: &TidyOptions) -> Self {
        let mut walker = Walker {
            slots: vec![Slot::new(0, 0, 0, 0)],
            nodes: Vec::new(),
            post_order: Vec::new(),
            sibling_separation: options.sibling_separation,
            subtree_separation: options.subtree_separation,
        };
        walker.slots[0].children.push(1);
        walker.push(root, 0, 0, 0);
        walker
    }

    fn push(&mut self, node: &'a TreeNode, parent: usize, number: usize, depth: usize) -> usize {
        let index = self.slots.len();
        self.slots.push(Slot::new(index, parent, number, depth));
        self.nodes.push(node);
        let mut children = Vec::with_capacity(node.children().len());
        for (number, child) in node.children().iter().enumerate() {
            children.push(self.push(child, index, number, depth + 1));
        }
        self.slots[index].children = children;
        self.post_order.push(index);
        index
    }

    fn separation(&self, a: usize, b: usize) -> f32 {
        if self.slots[a].parent == self.slots[b].parent {
            self.sibling_separation
        } else {
            self.subtree_separation
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.slots[v].children.first().copied().or(self.slots[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.slots[v].children.last().copied().or(self.slots[v].thread)
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.slots[v].parent;
        let number = self.slots[v].number;
        let left_sibling = (number > 0).then(|| self.slots[parent].children[number - 1]);

        let children = &self.slots[v].children;
        let bounds = children.first().copied().zip(children.last().copied());
        if let Some((first, last)) = bounds {
            self.execute_shifts(v);
            let midpoint = (self.slots[first].prelim + self.slots[last].prelim) / 2.0;
            if let Some(w) = left_sibling {
                self.slots[v].prelim = self.slots[w].prelim + self.separation(v, w);
                self.slots[v].modifier = self.slots[v].prelim - midpoint;
            } else {
                self.slots[v].prelim = midpoint;
            }
        } else if let Some(w) = left_sibling {
            self.slots[v].prelim = self.slots[w].prelim + self.separation(v, w);
        }

        let ancestor = self.slots[parent]
            .default_ancestor
            .unwrap_or(self.slots[parent].children[0]);
        let ancestor = self.apportion(v, left_sibling, ancestor);
        self.slots[parent].default_ancestor = Some(ancestor);
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };
        let parent = self.slots[v].parent;
        let (mut vip, mut vop, mut vim) = (v, v, w);
        let mut vom = self.slots[parent].children[0];
        let mut sip = self.slots[vip].modifier;
        let mut sop = self.slots[vop].modifier;
        let mut sim = self.slots[vim].modifier;
        let mut som = self.slots[vom].modifier;

        let (mut next_im, mut next_ip);
        loop {
            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
            let (Some(im), Some(ip)) = (next_im, next_ip) else {
                break;
            };
            // Outer contours are at least as deep as the inner ones.
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vim = im;
            vip = ip;
            vom = om;
            vop = op;
            self.slots[vop].ancestor = v;
            let shift = self.slots[vim].prelim + sim - self.slots[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.slots[vim].modifier;
            sip += self.slots[vip].modifier;
            som += self.slots[vom].modifier;
            sop += self.slots[vop].modifier;
        }

        if let Some(im) = next_im
            && self.next_right(vop).is_none()
        {
            self.slots[vop].thread = Some(im);
            self.slots[vop].modifier += sim - sop;
        }
        if let Some(ip) = next_ip
            && self.next_left(vom).is_none()
        {
            self.slots[vom].thread = Some(ip);
            self.slots[vom].modifier += sip - som;
            ancestor = v;
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.slots[vim].ancestor;
        if self.slots[candidate].parent == self.slots[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f32) {
        let span = self.slots[wp].number as f32 - self.slots[wm].number as f32;
        let change = shift / span;
        self.slots[wp].change -= change;
        self.slots[wp].shift += shift;
        self.slots[wm].change += change;
        self.slots[wp].prelim += shift;
        self.slots[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let children = self.slots[v].children.clone();
        for &w in children.iter().rev() {
            let slot = &mut self.slots[w];
            slot.prelim += shift;
            slot.modifier += shift;
            change += slot.change;
            shift += slot.shift + change;
        }
    }
}
