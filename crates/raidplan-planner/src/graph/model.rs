use raidplan_core::EventId;
use serde::Serialize;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub usize);

/// Synthetic root that seeds the first event's parents. Never drawn.
pub const ROOT: NodeIndex = NodeIndex(0);

pub type NodeSet = SmallVec<[NodeIndex; 4]>;

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: EventId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    pub time: f64,
    pub depth: u32,
    pub level: u32,
    pub previous: NodeSet,
    pub next: NodeSet,
    pub left: f64,
    pub top: f64,
}

impl Node {
    fn new(id: EventId, info: Option<String>, time: f64, depth: u32) -> Self {
        Self {
            id,
            info,
            time,
            depth,
            level: 0,
            previous: NodeSet::new(),
            next: NodeSet::new(),
            left: 0.0,
            top: 0.0,
        }
    }
}

/// Encounter events as a DAG, stored in creation order.
///
/// Slot 0 is the synthetic root; every event after it was pushed after all of
/// its parents, so iterating in index order is a valid topological order.
#[derive(Debug, Clone)]
pub struct TimelineGraph {
    nodes: Vec<Node>,
}

impl Default for TimelineGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(EventId(String::new()), None, 0.0, 0)],
        }
    }

    // Parents must already be in the arena; only the parser and tests build
    // graphs, so this stays crate-private.
    pub(crate) fn push_event(
        &mut self,
        id: EventId,
        info: Option<String>,
        time: f64,
        depth: u32,
        parents: &[NodeIndex],
    ) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len());
        let mut node = Node::new(id, info, time, depth);
        node.previous.extend(parents.iter().copied());
        self.nodes.push(node);
        for p in parents {
            self.nodes[p.0].next.push(idx);
        }
        idx
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.0)
    }

    pub fn contains_event(&self, idx: NodeIndex) -> bool {
        idx != ROOT && idx.0 < self.nodes.len()
    }

    /// Number of events, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn event_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (1..self.nodes.len()).map(NodeIndex)
    }

    pub fn events(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter().enumerate().skip(1).map(|(i, n)| (NodeIndex(i), n))
    }

    /// Events hanging directly off the synthetic root.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.nodes[ROOT.0].next
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.events()
            .flat_map(|(idx, n)| n.previous.iter().map(move |p| (*p, idx)))
    }
}

impl Index<NodeIndex> for TimelineGraph {
    type Output = Node;

    fn index(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.0]
    }
}

impl IndexMut<NodeIndex> for TimelineGraph {
    fn index_mut(&mut self, idx: NodeIndex) -> &mut Node {
        &mut self.nodes[idx.0]
    }
}
