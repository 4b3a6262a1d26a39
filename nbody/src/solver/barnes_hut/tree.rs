//! Incrementally maintained octree for Barnes–Hut gravity.
//!
//! Nodes live in an arena (a vector of slots with a free-list) and refer to
//! each other by [`NodeId`]; each body carries the id of its current external
//! node, so a moved body can be located in O(1) without searching the tree.
//! Between steps the tree is reconciled bottom-up instead of being rebuilt:
//! a body that left its leaf cube walks toward the root until an ancestor
//! still contains it, re-using the detached node for the re-insert.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, Zero};

use crate::body::Body;
use crate::constants::gravitational_force;
use crate::math::{abs, with_length};

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The eight children of a node, named by axis signs: East/West is ±x,
/// Top/Bottom is ±y, North/South is ±z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Octant {
    TopNorthEast,
    TopNorthWest,
    TopSouthEast,
    TopSouthWest,
    BottomNorthEast,
    BottomNorthWest,
    BottomSouthEast,
    BottomSouthWest,
}

impl Octant {
    /// Octant of `point` relative to `center`. A coordinate exactly on a
    /// splitting plane resolves to the negative side; only strictly greater
    /// picks the positive one.
    pub fn of(point: Point3<f64>, center: Point3<f64>) -> Self {
        match (point.x > center.x, point.y > center.y, point.z > center.z) {
            (true, true, true) => Self::TopNorthEast,
            (false, true, true) => Self::TopNorthWest,
            (true, true, false) => Self::TopSouthEast,
            (false, true, false) => Self::TopSouthWest,
            (true, false, true) => Self::BottomNorthEast,
            (false, false, true) => Self::BottomNorthWest,
            (true, false, false) => Self::BottomSouthEast,
            (false, false, false) => Self::BottomSouthWest,
        }
    }

    /// Unit direction from a node's center toward this octant's center.
    fn direction(self) -> Vector3<f64> {
        match self {
            Self::TopNorthEast => Vector3::new(1.0, 1.0, 1.0),
            Self::TopNorthWest => Vector3::new(-1.0, 1.0, 1.0),
            Self::TopSouthEast => Vector3::new(1.0, 1.0, -1.0),
            Self::TopSouthWest => Vector3::new(-1.0, 1.0, -1.0),
            Self::BottomNorthEast => Vector3::new(1.0, -1.0, 1.0),
            Self::BottomNorthWest => Vector3::new(-1.0, -1.0, 1.0),
            Self::BottomSouthEast => Vector3::new(1.0, -1.0, -1.0),
            Self::BottomSouthWest => Vector3::new(-1.0, -1.0, -1.0),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Payload distinguishing leaves from interior nodes.
///
/// Every node the arena hands out starts external; internal nodes only come
/// into being when an occupied leaf is upgraded during insertion, and an
/// internal node never covers zero bodies; maintenance prunes it first.
/// Child count (slots in use) and body count (bodies in the subtree) are
/// different quantities.
#[derive(Debug, Clone, Copy)]
pub enum NodePayload {
    External { body: usize },
    Internal { children: [Option<NodeId>; 8] },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub center: Point3<f64>,
    /// Edge length of the cube this node covers.
    pub size: f64,
    pub parent: Option<NodeId>,
    /// Which slot of the parent this node sits in. Meaningless on the root.
    pub parent_octant: Octant,
    /// Bodies in this subtree.
    pub body_count: usize,
    /// Subtree aggregates, valid after the last mass rollup.
    pub mass: f64,
    pub center_of_mass: Point3<f64>,
    pub payload: NodePayload,
}

impl Node {
    fn external(
        body: usize,
        center: Point3<f64>,
        size: f64,
        parent: Option<NodeId>,
        parent_octant: Octant,
    ) -> Self {
        Self {
            center,
            size,
            parent,
            parent_octant,
            body_count: 1,
            mass: 0.0,
            center_of_mass: center,
            payload: NodePayload::External { body },
        }
    }

    /// Placeholder written into freshly allocated slots; overwritten when
    /// the node is attached to the tree.
    fn stub() -> Self {
        Self::external(
            usize::MAX,
            Point3::new(0.0, 0.0, 0.0),
            0.0,
            None,
            Octant::TopNorthEast,
        )
    }
}

/// Node storage with a free-list. Slot contents are recycled on release, so
/// a handle is only meaningful while its node is live.
struct NodeArena {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl NodeArena {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.free.push(id);
    }

    fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}

impl std::ops::Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl std::ops::IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

pub struct Octree {
    arena: NodeArena,
    root: Option<NodeId>,
    /// Cube the root covers. Kept separately so bodies can still be
    /// classified (and the root re-seeded) after the tree has drained.
    bounds_center: Point3<f64>,
    bounds_size: f64,
    theta: f64,
}

impl Octree {
    /// Build a tree over a non-empty body collection.
    ///
    /// The universe cube is the initial bounding box blown up by
    /// `size_scale`, so bodies have room to move before falling off the edge
    /// of the universe; a body that leaves anyway is dropped from gravity
    /// rather than treated as an error.
    pub fn build(bodies: &mut [Body], theta: f64, size_scale: f64) -> Self {
        assert!(!bodies.is_empty(), "cannot build an octree over zero bodies");
        assert!(size_scale >= 2.0, "size_scale must be at least 2");

        let mut min = bodies[0].position;
        let mut max = bodies[0].position;
        for body in bodies.iter() {
            let p = body.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        let extent = max - min;
        let size = extent.x.max(extent.y).max(extent.z) * size_scale;
        let center = min + extent / 2.0;

        let mut tree = Self {
            arena: NodeArena::with_capacity(2 * bodies.len()),
            root: None,
            bounds_center: center,
            bounds_size: size,
            theta,
        };

        tree.seed_root(bodies, 0);
        for body in 1..bodies.len() {
            let fresh = tree.allocate_node();
            tree.insert(bodies, body, fresh);
        }

        tree
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    /// Nodes currently in use; allocation-leak checks compare this against
    /// an expected tree shape.
    pub fn live_node_count(&self) -> usize {
        self.arena.live_count()
    }

    /// Hand out a fresh (or recycled) node for a later [`Octree::insert`].
    /// Pre-allocating is what lets a body move re-use its detached node
    /// without touching the allocator.
    pub fn allocate_node(&mut self) -> NodeId {
        self.arena.allocate(Node::stub())
    }

    pub fn release_node(&mut self, id: NodeId) {
        self.arena.release(id);
    }

    /// Install `body` in the tree, consuming `new_node` as the external node
    /// that will hold it.
    pub fn insert(&mut self, bodies: &mut [Body], body: usize, new_node: NodeId) {
        let root = self.root.expect("insert into an empty tree");
        self.insert_at(bodies, body, new_node, root);
    }

    /// Insert a body into a live tree after construction. Returns the leaf
    /// now holding it, or `None` when the body lies outside the universe
    /// volume and stays free-floating. Refreshes the aggregates along the
    /// new leaf's ancestor chain.
    pub fn add_body(&mut self, bodies: &mut [Body], body: usize) -> Option<NodeId> {
        let rel = abs(bodies[body].position - self.bounds_center);
        let half = self.bounds_size / 2.0;
        if rel.x > half || rel.y > half || rel.z > half {
            bodies[body].tree_slot = None;
            return None;
        }

        let leaf = match self.root {
            None => self.seed_root(bodies, body),
            Some(_) => {
                let fresh = self.allocate_node();
                self.insert(bodies, body, fresh);
                fresh
            }
        };
        self.update_mass_bottom_up(bodies, leaf);
        Some(leaf)
    }

    /// Remove a body from the tree, returning its detached node for re-use.
    /// The caller owns the node: hand it back to [`Octree::insert`] or
    /// release it. Removing the last body drains the tree entirely.
    pub fn remove(&mut self, bodies: &mut [Body], body: usize) -> NodeId {
        let leaf = bodies[body]
            .tree_slot
            .take()
            .expect("removing a body that is not in the tree");
        debug_assert!(matches!(
            self.arena[leaf].payload,
            NodePayload::External { .. }
        ));

        let Some(parent) = self.arena[leaf].parent else {
            // The root was this body's leaf.
            self.root = None;
            return leaf;
        };

        // Every ancestor loses one body.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            debug_assert!(self.arena[node].body_count >= 1);
            self.arena[node].body_count -= 1;
            cursor = self.arena[node].parent;
        }

        if self.arena[parent].body_count == 0 {
            self.remove_empty_internal(parent);
        } else {
            self.detach_child(parent, self.arena[leaf].parent_octant);
        }

        leaf
    }

    /// Re-home every body whose position has left its leaf cube. Runs before
    /// each force computation so queries see a consistent tree.
    pub fn reconcile_moved_bodies(&mut self, bodies: &mut [Body]) {
        for body in 0..bodies.len() {
            let Some(leaf) = bodies[body].tree_slot else {
                continue;
            };
            if !self.contains(leaf, bodies[body].position) {
                self.move_body_bottom_up(bodies, body, leaf);
            }
        }
    }

    /// Refresh mass and center of mass for the whole tree, children first.
    pub fn update_mass_distribution(&mut self, bodies: &[Body]) {
        if let Some(root) = self.root {
            self.update_subtree_mass(bodies, root);
        }
    }

    /// Refresh aggregates after a localized change: recompute at `node`,
    /// then walk every ancestor up to the root.
    pub fn update_mass_bottom_up(&mut self, bodies: &[Body], node: NodeId) {
        match self.arena[node].payload {
            NodePayload::External { body } => {
                self.arena[node].mass = bodies[body].mass;
                self.arena[node].center_of_mass = bodies[body].position;
            }
            NodePayload::Internal { .. } => self.refresh_internal_mass(node),
        }

        let mut cursor = self.arena[node].parent;
        while let Some(ancestor) = cursor {
            self.refresh_internal_mass(ancestor);
            cursor = self.arena[ancestor].parent;
        }
    }

    /// Accumulate the gravitational force of the whole tree on `body`,
    /// approximating sufficiently distant subtrees by their aggregates.
    pub fn accumulate_force(&self, body: &mut Body) {
        let Some(root) = self.root else {
            return;
        };
        self.accumulate_from(body, root);
    }

    fn accumulate_from(&self, body: &mut Body, other: NodeId) {
        // A body exerts no force on itself.
        if body.tree_slot == Some(other) {
            return;
        }

        let node = &self.arena[other];
        let rel = node.center_of_mass - body.position;
        let dist_squared = rel.magnitude2();

        if let NodePayload::Internal { children } = node.payload {
            // The opening criterion is size / distance > theta; comparing
            // squares on both sides avoids the square root.
            if node.size * node.size > self.theta * self.theta * dist_squared {
                for child in children.into_iter().flatten() {
                    self.accumulate_from(body, child);
                }
                return;
            }
        }

        let force = gravitational_force(body.mass, node.mass, dist_squared);
        body.force += with_length(rel, force);
    }

    fn seed_root(&mut self, bodies: &mut [Body], body: usize) -> NodeId {
        debug_assert!(self.root.is_none());
        let root = self.arena.allocate(Node::external(
            body,
            self.bounds_center,
            self.bounds_size,
            None,
            Octant::TopNorthEast,
        ));
        self.root = Some(root);
        bodies[body].tree_slot = Some(root);
        root
    }

    fn insert_at(&mut self, bodies: &mut [Body], body: usize, new_node: NodeId, at: NodeId) {
        if matches!(self.arena[at].payload, NodePayload::External { .. }) {
            self.upgrade_to_internal(bodies, at);
        }

        let octant = Octant::of(bodies[body].position, self.arena[at].center);
        let slot = match self.arena[at].payload {
            NodePayload::Internal { children } => children[octant.index()],
            NodePayload::External { .. } => unreachable!(),
        };

        match slot {
            None => self.attach_external(bodies, body, new_node, at, octant),
            Some(child) => self.insert_at(bodies, body, new_node, child),
        }

        self.arena[at].body_count += 1;
    }

    /// Rewrite an external node as an internal one, pushing its resident
    /// body down into the matching child octant. Allocates the one extra
    /// node this requires.
    fn upgrade_to_internal(&mut self, bodies: &mut [Body], at: NodeId) {
        let resident = match self.arena[at].payload {
            NodePayload::External { body } => body,
            NodePayload::Internal { .. } => unreachable!("upgrading an internal node"),
        };

        self.arena[at].payload = NodePayload::Internal { children: [None; 8] };
        self.arena[at].body_count = 1;

        let octant = Octant::of(bodies[resident].position, self.arena[at].center);
        let fresh = self.allocate_node();
        self.attach_external(bodies, resident, fresh, at, octant);
    }

    /// Fill in a pre-allocated node as the external leaf for `body` in the
    /// given child slot of `parent`.
    fn attach_external(
        &mut self,
        bodies: &mut [Body],
        body: usize,
        node: NodeId,
        parent: NodeId,
        octant: Octant,
    ) {
        let (center, size) = {
            let p = &self.arena[parent];
            (p.center + octant.direction() * (p.size / 4.0), p.size / 2.0)
        };

        self.arena[node] = Node::external(body, center, size, Some(parent), octant);

        match &mut self.arena[parent].payload {
            NodePayload::Internal { children } => {
                debug_assert!(children[octant.index()].is_none());
                children[octant.index()] = Some(node);
            }
            NodePayload::External { .. } => unreachable!(),
        }

        bodies[body].tree_slot = Some(node);
    }

    /// Detach the body's leaf, then walk toward the root until an ancestor
    /// still contains the body and re-insert the cached leaf there.
    /// Ancestors left behind lose one body; emptied ones are pruned. Walking
    /// past the root means the body has left the universe: its node is
    /// released and it goes gravity-free.
    fn move_body_bottom_up(&mut self, bodies: &mut [Body], body: usize, leaf: NodeId) {
        debug_assert!(matches!(
            self.arena[leaf].payload,
            NodePayload::External { .. }
        ));

        let Some(parent) = self.arena[leaf].parent else {
            // The root is this body's leaf and the body left its cube.
            self.arena.release(leaf);
            self.root = None;
            bodies[body].tree_slot = None;
            return;
        };

        // Detach but keep the node: unless the body left the universe it is
        // re-used for the re-insert below.
        self.detach_child(parent, self.arena[leaf].parent_octant);

        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if self.contains(node, bodies[body].position) {
                // First ancestor still holding the body. Its own body count
                // already includes the body; only the subtree below changes.
                let octant = Octant::of(bodies[body].position, self.arena[node].center);
                let slot = match self.arena[node].payload {
                    NodePayload::Internal { children } => children[octant.index()],
                    NodePayload::External { .. } => unreachable!(),
                };
                match slot {
                    None => self.attach_external(bodies, body, leaf, node, octant),
                    Some(child) => self.insert_at(bodies, body, leaf, child),
                }
                return;
            }

            self.arena[node].body_count -= 1;
            let up = self.arena[node].parent;
            if self.arena[node].body_count == 0 {
                match up {
                    Some(grandparent) => {
                        self.detach_child(grandparent, self.arena[node].parent_octant)
                    }
                    None => self.root = None,
                }
                self.arena.release(node);
            }
            cursor = up;
        }

        // Walked past the root: the body is outside the universe volume.
        self.arena.release(leaf);
        bodies[body].tree_slot = None;
    }

    /// Prune an internal node whose subtree holds no more bodies, walking
    /// upward as long as the emptiness propagates.
    fn remove_empty_internal(&mut self, node: NodeId) {
        debug_assert!(self.arena[node].body_count == 0);
        match self.arena[node].parent {
            None => self.root = None,
            Some(parent) => {
                if self.arena[parent].body_count == 0 {
                    self.remove_empty_internal(parent);
                } else {
                    self.detach_child(parent, self.arena[node].parent_octant);
                }
            }
        }
        self.arena.release(node);
    }

    fn detach_child(&mut self, parent: NodeId, octant: Octant) {
        match &mut self.arena[parent].payload {
            NodePayload::Internal { children } => {
                debug_assert!(children[octant.index()].is_some());
                children[octant.index()] = None;
            }
            NodePayload::External { .. } => unreachable!("detaching from an external node"),
        }
    }

    /// Whether `point` lies inside the cube covered by `node`; points
    /// exactly on a face count as inside.
    fn contains(&self, node: NodeId, point: Point3<f64>) -> bool {
        let n = &self.arena[node];
        let rel = abs(point - n.center);
        let half = n.size / 2.0;
        rel.x <= half && rel.y <= half && rel.z <= half
    }

    fn update_subtree_mass(&mut self, bodies: &[Body], node: NodeId) {
        match self.arena[node].payload {
            NodePayload::External { body } => {
                self.arena[node].mass = bodies[body].mass;
                self.arena[node].center_of_mass = bodies[body].position;
            }
            NodePayload::Internal { children } => {
                for child in children.into_iter().flatten() {
                    self.update_subtree_mass(bodies, child);
                }
                self.refresh_internal_mass(node);
            }
        }
    }

    /// Recompute an internal node's aggregates from its children, assuming
    /// the children are current.
    fn refresh_internal_mass(&mut self, node: NodeId) {
        let children = match self.arena[node].payload {
            NodePayload::Internal { children } => children,
            NodePayload::External { .. } => unreachable!(),
        };

        let mut mass = 0.0;
        let mut weighted = Vector3::zero();
        for child in children.into_iter().flatten() {
            let child = &self.arena[child];
            mass += child.mass;
            weighted += child.center_of_mass.to_vec() * child.mass;
        }

        let node = &mut self.arena[node];
        node.mass = mass;
        node.center_of_mass = Point3::from_vec(weighted / mass);
    }
}
