use crate::point::Point;
use crate::OPEN_LIST_BUCKET_WIDTH;
use std::cmp::Ordering;

/// Position of a [Node] in the arena of the network that owns it. Only meaningful for
/// the network that handed it out, and only until that network is prepared again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    #[default]
    Undefined,
    Open,
    Closed,
}

/// Per-search bookkeeping for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub position: Point,
    /// Accumulated cost from the start (G).
    pub cost_until_now: u32,
    /// `cost_until_now` plus the heuristic estimate to the end (F).
    pub predicted_total_cost: u32,
    /// The node this one was reached from; [None] for the start node and for nodes
    /// which have not been reached yet.
    pub previous: Option<NodeIndex>,
    pub status: NodeStatus,
}

impl Node {
    pub fn new(position: Point) -> Node {
        Node {
            position,
            cost_until_now: 0,
            predicted_total_cost: 0,
            previous: None,
            status: NodeStatus::Undefined,
        }
    }

    /// Forgets everything learned during the previous search.
    pub fn reset(&mut self) {
        self.cost_until_now = 0;
        self.predicted_total_cost = 0;
        self.previous = None;
        self.status = NodeStatus::Undefined;
    }

    pub fn is_closed(&self) -> bool {
        self.status == NodeStatus::Closed
    }
}

/// An open list entry. The predicted cost is copied at push time, so a node that is
/// improved while open is simply pushed again and the outdated entry is skipped once
/// the node is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpenEntry {
    pub predicted_total_cost: u32,
    pub position: Point,
    pub node: NodeIndex,
}

impl OpenEntry {
    pub fn new(node: NodeIndex, position: Point, predicted_total_cost: u32) -> OpenEntry {
        OpenEntry {
            predicted_total_cost,
            position,
            node,
        }
    }

    /// Coarse cost bucket used by [IndexedLinkedList](crate::IndexedLinkedList).
    pub fn bucket(&self) -> usize {
        (self.predicted_total_cost / OPEN_LIST_BUCKET_WIDTH) as usize
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ties on the predicted cost are broken by position rather than arena index, so
        // every open list and every network expands nodes in the same order.
        self.predicted_total_cost
            .cmp(&other.predicted_total_cost)
            .then_with(|| self.position.cmp(&other.position))
            .then_with(|| self.node.cmp(&other.node))
    }
}
