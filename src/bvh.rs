use crate::primitive::Primitive;
use crate::error::UnknownDescent;
use crate::{Bounds3f, Float, Ray, INFINITY};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write;
use std::ops::Range;
use std::str::FromStr;

/// How a ray walks down a `Bvh`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Descent {
    /// Single path from the root: go right if the left child's box misses, go left if the
    /// right child's box misses, and stop at the first interior node where both boxes are
    /// hit. Every primitive under the node it stops at is handed to the caller, so when
    /// boxes overlap near the root this degrades to a linear scan of most of the tree.
    FirstFit,

    /// Visit every leaf whose box the ray enters between 0 and its current `t_max`, nearest
    /// child first, so boxes behind an accepted hit are never opened.
    Exhaustive,
}

impl Default for Descent {
    fn default() -> Self {
        Descent::FirstFit
    }
}

impl FromStr for Descent {
    type Err = UnknownDescent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-fit" => Ok(Descent::FirstFit),
            "exhaustive" => Ok(Descent::Exhaustive),
            _ => Err(UnknownDescent(s.to_string())),
        }
    }
}

impl fmt::Display for Descent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descent::FirstFit => write!(f, "first-fit"),
            Descent::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// A node covers the contiguous range `range` of the tree's primitive array. Interior nodes
/// cover the concatenation of their children's ranges.
#[derive(Debug)]
pub enum BvhNode {
    Leaf {
        bounds: Bounds3f,
        range: Range<usize>,
    },

    Interior {
        bounds: Bounds3f,
        range: Range<usize>,
        split_axis: usize,
        children: Box<[BvhNode; 2]>,
    },
}

impl BvhNode {
    pub fn bounds(&self) -> Bounds3f {
        match self {
            BvhNode::Leaf { bounds, .. } => *bounds,
            BvhNode::Interior { bounds, .. } => *bounds,
        }
    }

    pub fn range(&self) -> Range<usize> {
        match self {
            BvhNode::Leaf { range, .. } => range.clone(),
            BvhNode::Interior { range, .. } => range.clone(),
        }
    }

    pub fn n_prims(&self) -> usize {
        self.range().len()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    pub fn children(&self) -> Option<&[BvhNode; 2]> {
        match self {
            BvhNode::Leaf { .. } => None,
            BvhNode::Interior { children, .. } => Some(children),
        }
    }
}

/// Binary bounding volume hierarchy built by count-median splits along the longest axis of
/// each node's box. Used both over the triangles of one surface and over the surfaces of a
/// scene.
#[derive(Debug)]
pub struct Bvh<P> {
    prims: Vec<P>,
    root: BvhNode,
    max_prims_in_node: usize,
}

impl<P: Primitive> Bvh<P> {
    /// Nodes with at most `max_prims_in_node` primitives become leaves.
    pub fn build(mut prims: Vec<P>, max_prims_in_node: usize) -> Self {
        let max_prims_in_node = max_prims_in_node.max(1);
        let bounds = union_bounds(&prims);
        let root = Self::recursive_build(&mut prims, 0, bounds, max_prims_in_node);

        Self {
            prims,
            root,
            max_prims_in_node,
        }
    }

    fn recursive_build(
        prims: &mut [P],
        offset: usize,
        bounds: Bounds3f,
        max_prims_in_node: usize,
    ) -> BvhNode {
        let n_prims = prims.len();
        let range = offset..offset + n_prims;

        if n_prims <= max_prims_in_node {
            return BvhNode::Leaf { bounds, range };
        }

        let axis = bounds.maximum_extent();
        // stable, and equal keys (including -0 and +0) keep their input order
        prims.sort_by(|a, b| {
            a.split_key(axis)
                .partial_cmp(&b.split_key(axis))
                .unwrap_or(Ordering::Equal)
        });

        // split on count, not on space
        let mid = n_prims / 2;
        let (left, right) = prims.split_at_mut(mid);
        let left_bounds = union_bounds(left);
        let right_bounds = union_bounds(right);

        let left = Self::recursive_build(left, offset, left_bounds, max_prims_in_node);
        let right = Self::recursive_build(right, offset + mid, right_bounds, max_prims_in_node);

        BvhNode::Interior {
            bounds,
            range,
            split_axis: axis,
            children: Box::new([left, right]),
        }
    }
}

impl<P> Bvh<P> {
    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    pub fn bounds(&self) -> Bounds3f {
        self.root.bounds()
    }

    /// All primitives, in tree order.
    pub fn primitives(&self) -> &[P] {
        &self.prims
    }

    pub fn node_primitives(&self, node: &BvhNode) -> &[P] {
        &self.prims[node.range()]
    }

    pub fn max_prims_in_node(&self) -> usize {
        self.max_prims_in_node
    }

    /// Nodes in depth-first pre-order.
    pub fn nodes(&self) -> Vec<&BvhNode> {
        let mut nodes = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            if let Some([left, right]) = node.children() {
                stack.push(right);
                stack.push(left);
            }
        }
        nodes
    }

    pub fn node_count(&self) -> usize {
        fn count(node: &BvhNode) -> usize {
            1 + node.children().map_or(0, |[left, right]| count(left) + count(right))
        }
        count(&self.root)
    }

    pub fn depth(&self) -> usize {
        fn depth(node: &BvhNode) -> usize {
            match node.children() {
                None => 1,
                Some([left, right]) => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }

    /// The node a `Descent::FirstFit` walk ends at. The root's own box is never tested and
    /// the returned node may well contain nothing the ray actually hits.
    pub fn first_fit(&self, ray: &Ray) -> &BvhNode {
        let mut node = &self.root;
        while let BvhNode::Interior { children, .. } = node {
            let [left, right] = &**children;
            if !left.bounds().intersect_p(ray) {
                node = right;
            } else if !right.bounds().intersect_p(ray) {
                node = left;
            } else {
                break;
            }
        }
        node
    }

    /// Hand the candidate primitives for `ray` to `visit`, one slice per node. `visit` may
    /// lower `ray.t_max`; the exhaustive descent uses the lowered value to prune the rest of
    /// the walk.
    pub fn traverse<F>(&self, ray: &mut Ray, descent: Descent, mut visit: F)
    where
        F: FnMut(&mut Ray, &[P]),
    {
        match descent {
            Descent::FirstFit => {
                let node = self.first_fit(ray);
                visit(ray, self.node_primitives(node));
            }
            Descent::Exhaustive => {
                let mut stack: SmallVec<[&BvhNode; 64]> = SmallVec::new();
                stack.push(&self.root);

                while let Some(node) = stack.pop() {
                    if node.bounds().intersect_range(ray).is_none() {
                        continue;
                    }

                    match node {
                        BvhNode::Leaf { range, .. } => visit(ray, &self.prims[range.clone()]),
                        BvhNode::Interior { children, .. } => {
                            let [left, right] = &**children;
                            let t_left = entry_distance(left, ray);
                            let t_right = entry_distance(right, ray);
                            // pushed last is popped first
                            if t_right < t_left {
                                push_if_hit(&mut stack, left, t_left);
                                push_if_hit(&mut stack, right, t_right);
                            } else {
                                push_if_hit(&mut stack, right, t_right);
                                push_if_hit(&mut stack, left, t_left);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Indented listing of the tree, one line per node with the labels of every primitive
    /// the node covers.
    pub fn dump(&self, label: impl Fn(&P) -> String) -> String {
        fn dump_node<P>(
            bvh: &Bvh<P>,
            node: &BvhNode,
            level: usize,
            label: &dyn Fn(&P) -> String,
            out: &mut String,
        ) {
            let labels: Vec<String> = bvh.node_primitives(node).iter().map(|p| label(p)).collect();
            // writing to a String cannot fail
            let _ = writeln!(out, "{}{}", "  ".repeat(level), labels.join(" "));
            if let Some([left, right]) = node.children() {
                dump_node(bvh, left, level + 1, label, out);
                dump_node(bvh, right, level + 1, label, out);
            }
        }

        let mut out = String::new();
        dump_node(self, &self.root, 0, &label, &mut out);
        out
    }
}

fn union_bounds<P: Primitive>(prims: &[P]) -> Bounds3f {
    prims.iter().fold(Bounds3f::empty(), |b, p| b.join(&p.world_bound()))
}

fn entry_distance(node: &BvhNode, ray: &Ray) -> Float {
    node.bounds().intersect_range(ray).map_or(INFINITY, |(t0, _)| t0)
}

fn push_if_hit<'a>(stack: &mut SmallVec<[&'a BvhNode; 64]>, node: &'a BvhNode, t_entry: Float) {
    if t_entry < INFINITY {
        stack.push(node);
    }
}
