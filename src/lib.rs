//! # terrain_pathfinding
//!
//! Bounded [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinding over
//! byte-encoded terrain grids of at most 256x256 cells, as used for NPC movement and
//! player-movement validation on a game server. Every terrain byte carries a traversal
//! cost in its low seven bits (0 is impassable) and a safezone flag in its high bit.
//!
//! A [PathFinder] combines three pluggable parts:
//! * a [Network](network::Network) which owns the per-search node cache and enumerates
//!   neighbours ([GridNetwork], [FullGridNetwork] or the memory-bounded
//!   [ScopedGridNetwork]),
//! * an open list implementing [PriorityQueue] ([BinaryMinHeap] or [IndexedLinkedList]),
//! * a [Heuristic].
//!
//! Searches are bounded by a maximum number of node expansions and optionally by a
//! geometric distance, can be cancelled cooperatively and report to an optional
//! [SearchMetrics] collaborator.
pub mod config;
pub mod heuristic;
pub mod metrics;
pub mod network;
pub mod node;
pub mod open_list;
pub mod path_finder;
pub mod point;
pub mod pool;
pub mod terrain;

pub use config::{ConfigError, PathFinderConfig};
pub use heuristic::{
    EuclideanHeuristic, Heuristic, HeuristicKind, ManhattanHeuristic, MaxAxisHeuristic,
    NoHeuristic,
};
pub use metrics::{NoopMetrics, PathFinderMetrics, SearchMetrics, METER_NAME};
pub use network::{FullGridNetwork, GridNetwork, Network, NetworkKind, ScopedGridNetwork};
pub use node::{Node, NodeIndex, NodeStatus, OpenEntry};
pub use open_list::{BinaryMinHeap, IndexedLinkedList, OpenListKind, PriorityQueue};
pub use path_finder::{
    CancellationToken, DynPathFinder, PathFinder, SearchFailure, SearchState, SearchStatistics,
};
pub use point::Point;
pub use pool::{PathFinderPool, PooledPathFinder};
pub use terrain::{TerrainCell, TerrainGrid};

/// Default number of node expansions after which a search is abandoned.
pub const DEFAULT_SEARCH_LIMIT: usize = 500;
/// Default multiplier applied to heuristic estimates.
pub const DEFAULT_HEURISTIC_ESTIMATE: u32 = 2;
/// Default largest window side of the [ScopedGridNetwork].
pub const DEFAULT_MAX_SEGMENT_SIDE: usize = 16;
/// Default smallest window side of the [ScopedGridNetwork].
pub const DEFAULT_MIN_SEGMENT_SIDE: usize = 8;
/// Width of the cost buckets indexing an [IndexedLinkedList] of [OpenEntry] values.
pub const OPEN_LIST_BUCKET_WIDTH: u32 = 10;
/// Upper bound on neighbours of a single node, used to size inline successor buffers.
pub const N_SMALLVEC_SIZE: usize = 8;

/// One step of a computed path: the reached [Point] and the point it was entered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathResultNode {
    pub point: Point,
    pub previous_point: Point,
}

impl PathResultNode {
    pub fn new(point: Point, previous_point: Point) -> PathResultNode {
        PathResultNode {
            point,
            previous_point,
        }
    }
}

/// Sums the cost of entering every cell along a path returned by
/// [PathFinder::find_path]. The start cell is free, as it is never entered.
pub fn path_cost(terrain: &TerrainGrid, path: &[PathResultNode]) -> u32 {
    path.iter()
        .map(|step| terrain.cell(step.point).map_or(0, |cell| cell.cost() as u32))
        .sum()
}

/// Strips a path down to the sequence of visited points, start excluded.
pub fn path_points(path: &[PathResultNode]) -> Vec<Point> {
    path.iter().map(|step| step.point).collect()
}
