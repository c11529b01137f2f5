//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in one append-only array and refer to each other by index. Each
//! leaf covers a contiguous range of the primitive array, which the build
//! reorders in place. Traversal walks parent links with a small state machine
//! instead of recursing or keeping a stack.

use crate::{HitRecord, Hittable, Primitive, RandomSource, Ray};
use ember_math::{Aabb, Interval};
use std::cmp::Ordering;

/// Index into the node array.
pub type NodeIndex = u32;

/// Sub-ranges at or below this many primitives become leaves.
const LEAF_MAX_SPAN: usize = 2;

/// Marks the parent of the root.
const NO_PARENT: NodeIndex = NodeIndex::MAX;

/// Interior nodes point at two children, leaves at a range of primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvhNodeKind {
    Interior { left: NodeIndex, right: NodeIndex },
    Leaf { start: u32, count: u32 },
}

/// A node of the flattened tree.
#[derive(Debug, Clone, Copy)]
pub struct BvhNode {
    pub bbox: Aabb,
    pub kind: BvhNodeKind,
    pub parent: NodeIndex,
}

/// Where the traversal just came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    /// Arrived at a left child from its parent.
    Descend,
    /// Arrived at a right child after finishing its left sibling.
    Sibling,
    /// The subtree under the current node is finished.
    Ascend,
}

/// Binary BVH over the scene's primitives.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    objects: Vec<Primitive>,
    nodes: Vec<BvhNode>,
    root: Option<NodeIndex>,
}

impl Bvh {
    /// Build a BVH, bounding primitives over the shutter interval `[0, shutter_time]`.
    ///
    /// The split axis is drawn from `rng` at every level. An empty primitive list
    /// gives a BVH that never reports a hit.
    pub fn new(objects: Vec<Primitive>, shutter_time: f32, rng: &mut RandomSource) -> Self {
        let mut bvh = Self {
            objects,
            nodes: Vec::new(),
            root: None,
        };
        if !bvh.objects.is_empty() {
            let end = bvh.objects.len();
            bvh.nodes.reserve(2 * end);
            let root = bvh.populate(0, end, shutter_time, rng);
            bvh.root = Some(root);
        }
        bvh
    }

    /// Recursive median-split construction over `objects[begin..end]`.
    ///
    /// Children are appended before their parent, so the root ends up last.
    fn populate(
        &mut self,
        begin: usize,
        end: usize,
        shutter_time: f32,
        rng: &mut RandomSource,
    ) -> NodeIndex {
        let span = end - begin;
        assert!(span > 0, "BVH node must cover at least one primitive");

        let axis = rng.axis();
        self.objects[begin..end].sort_by(|a, b| {
            let a_min = a.bounding_box(shutter_time).axis_interval(axis).min;
            let b_min = b.bounding_box(shutter_time).axis_interval(axis).min;
            a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
        });

        if span <= LEAF_MAX_SPAN {
            let bbox = self.objects[begin..end]
                .iter()
                .fold(Aabb::EMPTY, |acc, obj| {
                    Aabb::surrounding(&acc, &obj.bounding_box(shutter_time))
                });
            return self.push(BvhNode {
                bbox,
                kind: BvhNodeKind::Leaf {
                    start: begin as u32,
                    count: span as u32,
                },
                parent: NO_PARENT,
            });
        }

        let mid = begin + span / 2;
        let left = self.populate(begin, mid, shutter_time, rng);
        let right = self.populate(mid, end, shutter_time, rng);
        let bbox = Aabb::surrounding(&self.node(left).bbox, &self.node(right).bbox);

        let index = self.push(BvhNode {
            bbox,
            kind: BvhNodeKind::Interior { left, right },
            parent: NO_PARENT,
        });
        self.nodes[left as usize].parent = index;
        self.nodes[right as usize].parent = index;
        index
    }

    fn push(&mut self, node: BvhNode) -> NodeIndex {
        let index = self.nodes.len() as NodeIndex;
        self.nodes.push(node);
        index
    }

    #[inline]
    fn node(&self, index: NodeIndex) -> &BvhNode {
        &self.nodes[index as usize]
    }

    /// Right child of an interior node.
    #[inline]
    fn right_child(&self, index: NodeIndex) -> NodeIndex {
        match self.node(index).kind {
            BvhNodeKind::Interior { right, .. } => right,
            BvhNodeKind::Leaf { .. } => unreachable!("leaf {index} has no children"),
        }
    }

    /// Test every primitive of a leaf, folding into `closest`.
    fn hit_leaf(
        &self,
        start: u32,
        count: u32,
        ray: &Ray,
        ray_t: Interval,
        mut closest: Option<HitRecord>,
    ) -> Option<HitRecord> {
        let range = start as usize..(start + count) as usize;
        for object in &self.objects[range] {
            let search = closest.map_or(ray_t, |hit| ray_t.with_max(hit.t));
            closest = HitRecord::closest(closest, object.hit(ray, search));
        }
        closest
    }

    /// The primitives in BVH order.
    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    /// The node array; the root is the last element.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Bounds of the whole tree, or `None` when empty.
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.map(|root| self.node(root).bbox)
    }
}

impl Hittable for Bvh {
    /// Closest hit over the whole tree.
    ///
    /// The upper bound of the search shrinks to the closest hit found so far,
    /// which prunes boxes behind it without changing which hit wins.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let root = self.root?;
        let root_node = self.node(root);
        if !root_node.bbox.hit(ray, ray_t) {
            return None;
        }

        let mut index = match root_node.kind {
            BvhNodeKind::Leaf { start, count } => {
                return self.hit_leaf(start, count, ray, ray_t, None);
            }
            BvhNodeKind::Interior { left, .. } => left,
        };
        let mut state = Visit::Descend;
        let mut closest: Option<HitRecord> = None;

        loop {
            match state {
                Visit::Descend | Visit::Sibling => {
                    let current = self.node(index);
                    let search = closest.map_or(ray_t, |hit| ray_t.with_max(hit.t));

                    if current.bbox.hit(ray, search) {
                        match current.kind {
                            BvhNodeKind::Interior { left, .. } => {
                                index = left;
                                state = Visit::Descend;
                                continue;
                            }
                            BvhNodeKind::Leaf { start, count } => {
                                closest = self.hit_leaf(start, count, ray, search, closest);
                            }
                        }
                    }

                    // Leaf done or box missed: a left child moves on to its
                    // sibling, a right child hands control back to the parent.
                    if state == Visit::Descend {
                        index = self.right_child(current.parent);
                        state = Visit::Sibling;
                    } else {
                        index = current.parent;
                        state = Visit::Ascend;
                    }
                }
                Visit::Ascend => {
                    if index == root {
                        return closest;
                    }
                    let parent = self.node(index).parent;
                    match self.node(parent).kind {
                        BvhNodeKind::Interior { left, right } if left == index => {
                            index = right;
                            state = Visit::Sibling;
                        }
                        _ => {
                            index = parent;
                            state = Visit::Ascend;
                        }
                    }
                }
            }
        }
    }

    fn bounding_box(&self, _shutter_time: f32) -> Aabb {
        self.bounds().unwrap_or(Aabb::EMPTY)
    }
}
