use super::{expand_neighbors, Network, SearchScope, Successors};
use crate::node::{Node, NodeIndex};
use crate::point::Point;
use crate::terrain::TerrainGrid;
use crate::{DEFAULT_MAX_SEGMENT_SIDE, DEFAULT_MIN_SEGMENT_SIDE};
use log::debug;

/// Addresses only a square window (segment) of the terrain, just large enough to hold
/// both start and end.
///
/// The window side is a power of two between `min_segment_side` and
/// `max_segment_side`, and the memory of the network is bounded by the largest window.
/// Pairs further apart than the largest window can cover are rejected by
/// [prepare](Network::prepare). Paths leaving the window cannot be found, which is the
/// price for keeping long detours from exploring large parts of the map.
#[derive(Clone, Debug)]
pub struct ScopedGridNetwork {
    pub allow_diagonals: bool,
    max_segment_side: usize,
    min_segment_side: usize,
    nodes: Vec<Node>,
    origin: Point,
    side: usize,
    row_shift: u32,
    scope: Option<SearchScope>,
}

impl Default for ScopedGridNetwork {
    fn default() -> ScopedGridNetwork {
        ScopedGridNetwork::new(true, DEFAULT_MAX_SEGMENT_SIDE, DEFAULT_MIN_SEGMENT_SIDE)
    }
}

/// First coordinate of a window of `side` cells covering both `a` and `b`, centred on
/// them and kept inside `0..limit` where possible.
fn window_origin(a: u8, b: u8, side: usize, limit: usize) -> u8 {
    let low = a.min(b) as usize;
    let span = a.abs_diff(b) as usize + 1;
    let centred = low.saturating_sub((side - span) / 2);
    centred.min(limit.max(side) - side) as u8
}

impl ScopedGridNetwork {
    /// Panics unless both sides are powers of two with
    /// `min_segment_side <= max_segment_side <= 256`.
    pub fn new(
        allow_diagonals: bool,
        max_segment_side: usize,
        min_segment_side: usize,
    ) -> ScopedGridNetwork {
        assert!(
            max_segment_side.is_power_of_two() && min_segment_side.is_power_of_two(),
            "segment sides must be powers of two, got max {} and min {}",
            max_segment_side,
            min_segment_side
        );
        assert!(
            min_segment_side <= max_segment_side && max_segment_side <= 256,
            "segment sides must satisfy min {} <= max {} <= 256",
            min_segment_side,
            max_segment_side
        );
        ScopedGridNetwork {
            allow_diagonals,
            max_segment_side,
            min_segment_side,
            nodes: Vec::with_capacity(max_segment_side * max_segment_side),
            origin: Point::default(),
            side: 0,
            row_shift: 0,
            scope: None,
        }
    }

    pub fn max_segment_side(&self) -> usize {
        self.max_segment_side
    }

    pub fn min_segment_side(&self) -> usize {
        self.min_segment_side
    }

    /// Top-left corner and side of the current window.
    pub fn segment(&self) -> (Point, usize) {
        (self.origin, self.side)
    }

    fn readdress(&mut self, origin: Point, side: usize) {
        self.origin = origin;
        self.side = side;
        self.row_shift = side.trailing_zeros();
        self.nodes.clear();
        let row_shift = self.row_shift;
        self.nodes.extend((0..side * side).map(|ix| {
            let x = origin.x as usize + (ix & (side - 1));
            let y = origin.y as usize + (ix >> row_shift);
            Node::new(Point::new(x as u8, y as u8))
        }));
    }
}

impl Network for ScopedGridNetwork {
    fn prepare(
        &mut self,
        start: Point,
        end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
    ) -> bool {
        let (dx, dy) = start.axis_deltas(&end);
        let span = dx.max(dy) as usize + 1;
        let side = span.next_power_of_two().max(self.min_segment_side);
        if side > self.max_segment_side {
            debug!(
                "{} and {} need a segment of {} but at most {} is allowed",
                start, end, side, self.max_segment_side
            );
            self.scope = None;
            self.side = 0;
            return false;
        }
        let origin = Point::new(
            window_origin(start.x, end.x, side, terrain.width()),
            window_origin(start.y, end.y, side, terrain.height()),
        );
        self.readdress(origin, side);
        self.scope = Some(SearchScope {
            include_safezone,
            allow_diagonals: self.allow_diagonals,
        });
        true
    }

    fn node_at(&mut self, position: Point) -> Option<NodeIndex> {
        let x = (position.x as usize).checked_sub(self.origin.x as usize)?;
        let y = (position.y as usize).checked_sub(self.origin.y as usize)?;
        (x < self.side && y < self.side).then(|| NodeIndex((y << self.row_shift) + x))
    }

    fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index.0]
    }

    fn possible_next_nodes(&mut self, terrain: &TerrainGrid, node: NodeIndex) -> Successors {
        let scope = SearchScope::expect_prepared(self.scope);
        expand_neighbors(self, scope, terrain, node)
    }

    fn reset_status(&mut self) {
        self.nodes.iter_mut().for_each(Node::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_grows_only_as_needed() {
        let terrain = TerrainGrid::new(256, 256, 1);
        let mut network = ScopedGridNetwork::new(true, 32, 8);
        assert!(network.prepare(Point::new(100, 100), Point::new(102, 101), &terrain, false));
        assert_eq!(network.segment().1, 8);
        assert!(network.prepare(Point::new(100, 100), Point::new(108, 101), &terrain, false));
        assert_eq!(network.segment().1, 16);
        assert!(network.prepare(Point::new(100, 100), Point::new(131, 90), &terrain, false));
        assert_eq!(network.segment().1, 32);
        assert!(!network.prepare(Point::new(100, 100), Point::new(132, 90), &terrain, false));
    }

    #[test]
    fn window_covers_start_and_end() {
        let terrain = TerrainGrid::new(256, 256, 1);
        let mut network = ScopedGridNetwork::default();
        let pairs = [
            ((0, 0), (15, 15)),
            ((255, 255), (240, 250)),
            ((3, 250), (9, 255)),
            ((128, 7), (120, 0)),
            ((60, 60), (60, 60)),
        ];
        for ((sx, sy), (ex, ey)) in pairs {
            let (start, end) = (Point::new(sx, sy), Point::new(ex, ey));
            assert!(network.prepare(start, end, &terrain, false));
            for p in [start, end] {
                let index = network.node_at(p).unwrap();
                assert_eq!(network.node(index).position, p);
            }
        }
    }

    #[test]
    fn window_is_centred_and_clamped() {
        let terrain = TerrainGrid::new(256, 256, 1);
        let mut network = ScopedGridNetwork::default();
        assert!(network.prepare(Point::new(100, 100), Point::new(102, 102), &terrain, false));
        assert_eq!(network.segment(), (Point::new(98, 98), 8));
        assert!(network.prepare(Point::new(1, 254), Point::new(2, 255), &terrain, false));
        assert_eq!(network.segment(), (Point::new(0, 248), 8));

        // On a terrain smaller than the window the window starts at the origin.
        let small = TerrainGrid::new(5, 5, 1);
        assert!(network.prepare(Point::new(4, 4), Point::new(3, 3), &small, false));
        assert_eq!(network.segment(), (Point::new(0, 0), 8));
    }

    #[test]
    fn outside_window_is_not_addressable() {
        let terrain = TerrainGrid::new(64, 64, 1);
        let mut network = ScopedGridNetwork::default();
        assert!(network.prepare(Point::new(20, 20), Point::new(21, 21), &terrain, false));
        let (origin, side) = network.segment();
        assert_eq!(network.node_at(Point::new(origin.x - 1, origin.y)), None);
        assert_eq!(network.node_at(Point::new(origin.x, origin.y + side as u8)), None);
        assert!(network.node_at(origin).is_some());
    }

    #[test]
    fn rejection_clears_the_window() {
        let terrain = TerrainGrid::new(64, 64, 1);
        let mut network = ScopedGridNetwork::default();
        assert!(!network.prepare(Point::new(0, 0), Point::new(16, 0), &terrain, false));
        assert_eq!(network.node_at(Point::new(0, 0)), None);
    }

    #[test]
    #[should_panic(expected = "powers of two")]
    fn rejects_non_power_of_two_sides() {
        ScopedGridNetwork::new(true, 12, 8);
    }
}
