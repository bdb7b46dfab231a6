//! Networks own the per-search [Node] cache and decide which neighbours a node has.
//!
//! All three grid networks share [expand_neighbors]; they differ in how nodes are
//! stored and addressed:
//! * [GridNetwork] allocates every node of the terrain up front,
//! * [FullGridNetwork] covers the whole 256x256 coordinate space but creates nodes on
//!   first touch,
//! * [ScopedGridNetwork] only addresses a small square window around start and end.
use crate::node::{Node, NodeIndex, NodeStatus};
use crate::point::Point;
use crate::terrain::TerrainGrid;
use crate::{DEFAULT_MAX_SEGMENT_SIDE, DEFAULT_MIN_SEGMENT_SIDE, N_SMALLVEC_SIZE};
use smallvec::SmallVec;

pub mod full_grid;
pub mod grid;
pub mod scoped_grid;

pub use full_grid::FullGridNetwork;
pub use grid::GridNetwork;
pub use scoped_grid::ScopedGridNetwork;

pub type Successors = SmallVec<[NodeIndex; N_SMALLVEC_SIZE]>;

/// Straight moves first, then diagonals, so 4-directional movement is a prefix.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

pub trait Network {
    /// Readies the node cache for a search from `start` to `end`. Returns [false] if the
    /// network cannot serve this pair, which is an ordinary search failure.
    fn prepare(
        &mut self,
        start: Point,
        end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
    ) -> bool;

    /// The node at `position`, created on first access. [None] if the position lies
    /// outside the addressable area of the network.
    fn node_at(&mut self, position: Point) -> Option<NodeIndex>;

    fn node(&self, index: NodeIndex) -> &Node;

    fn node_mut(&mut self, index: NodeIndex) -> &mut Node;

    /// Neighbours of `node` which are worth (re)visiting, with their
    /// `cost_until_now` already lowered to the cost via `node`.
    ///
    /// Panics if the network has not been prepared.
    fn possible_next_nodes(&mut self, terrain: &TerrainGrid, node: NodeIndex) -> Successors;

    /// Returns every node touched by earlier searches to [NodeStatus::Undefined].
    fn reset_status(&mut self);
}

impl<N: Network + ?Sized> Network for Box<N> {
    fn prepare(
        &mut self,
        start: Point,
        end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
    ) -> bool {
        (**self).prepare(start, end, terrain, include_safezone)
    }
    fn node_at(&mut self, position: Point) -> Option<NodeIndex> {
        (**self).node_at(position)
    }
    fn node(&self, index: NodeIndex) -> &Node {
        (**self).node(index)
    }
    fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        (**self).node_mut(index)
    }
    fn possible_next_nodes(&mut self, terrain: &TerrainGrid, node: NodeIndex) -> Successors {
        (**self).possible_next_nodes(terrain, node)
    }
    fn reset_status(&mut self) {
        (**self).reset_status()
    }
}

/// Per-search movement rules, fixed by [Network::prepare].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchScope {
    pub include_safezone: bool,
    pub allow_diagonals: bool,
}

impl SearchScope {
    pub(crate) fn expect_prepared(scope: Option<SearchScope>) -> SearchScope {
        scope.expect("network used for a search before prepare was called")
    }
}

/// Neighbour expansion shared by the grid networks.
///
/// A neighbour is skipped when it lies off the terrain (including offsets that would
/// wrap around the byte-sized coordinates), is impassable, is an excluded safezone,
/// lies outside the network's window, is already closed, or is open with a cost no
/// worse than the one reached through `current`.
pub fn expand_neighbors<N: Network + ?Sized>(
    network: &mut N,
    scope: SearchScope,
    terrain: &TerrainGrid,
    current: NodeIndex,
) -> Successors {
    let (position, cost_until_now) = {
        let node = network.node(current);
        (node.position, node.cost_until_now)
    };
    let directions = if scope.allow_diagonals {
        &DIRECTIONS[..]
    } else {
        &DIRECTIONS[..4]
    };
    let mut successors = Successors::new();
    for &(dx, dy) in directions {
        let Some(target) = position.checked_offset(dx, dy) else {
            continue;
        };
        let Some(cell) = terrain.cell(target) else {
            continue;
        };
        if !cell.passable_for(scope.include_safezone) {
            continue;
        }
        let Some(index) = network.node_at(target) else {
            continue;
        };
        let new_cost = cost_until_now + cell.cost() as u32;
        let node = network.node_mut(index);
        match node.status {
            NodeStatus::Closed => continue,
            NodeStatus::Open if node.cost_until_now <= new_cost => continue,
            _ => {}
        }
        node.cost_until_now = new_cost;
        successors.push(index);
    }
    successors
}

/// Selects a [Network] implementation from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkKind {
    Grid,
    FullGrid,
    Scoped {
        max_segment_side: usize,
        min_segment_side: usize,
    },
}

impl Default for NetworkKind {
    fn default() -> NetworkKind {
        NetworkKind::Scoped {
            max_segment_side: DEFAULT_MAX_SEGMENT_SIDE,
            min_segment_side: DEFAULT_MIN_SEGMENT_SIDE,
        }
    }
}

impl NetworkKind {
    pub fn build(self, allow_diagonals: bool) -> Box<dyn Network + Send> {
        match self {
            NetworkKind::Grid => Box::new(GridNetwork::new(allow_diagonals)),
            NetworkKind::FullGrid => Box::new(FullGridNetwork::new(allow_diagonals)),
            NetworkKind::Scoped {
                max_segment_side,
                min_segment_side,
            } => Box::new(ScopedGridNetwork::new(
                allow_diagonals,
                max_segment_side,
                min_segment_side,
            )),
        }
    }
}
