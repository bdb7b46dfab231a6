use super::{expand_neighbors, Network, SearchScope, Successors};
use crate::node::{Node, NodeIndex};
use crate::point::Point;
use crate::terrain::TerrainGrid;
use log::trace;

/// Eagerly allocates one node per terrain cell. Rows are padded to a power of two so
/// a position is addressed by `(y << row_shift) + x` without a multiplication.
///
/// Every node is reset before each search, which makes this network a good fit for
/// small and medium maps searched over and over.
#[derive(Clone, Debug)]
pub struct GridNetwork {
    pub allow_diagonals: bool,
    nodes: Vec<Node>,
    width: usize,
    height: usize,
    row_shift: u32,
    scope: Option<SearchScope>,
}

impl Default for GridNetwork {
    fn default() -> GridNetwork {
        GridNetwork::new(true)
    }
}

impl GridNetwork {
    /// Creates a network which allocates its nodes on the first [prepare](Network::prepare).
    pub fn new(allow_diagonals: bool) -> GridNetwork {
        GridNetwork {
            allow_diagonals,
            nodes: Vec::new(),
            width: 0,
            height: 0,
            row_shift: 0,
            scope: None,
        }
    }

    /// Creates a network with nodes already allocated for `terrain`.
    pub fn for_terrain(terrain: &TerrainGrid, allow_diagonals: bool) -> GridNetwork {
        let mut network = GridNetwork::new(allow_diagonals);
        network.allocate(terrain.width(), terrain.height());
        network
    }

    /// Number of node slots, padding included.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    fn allocate(&mut self, width: usize, height: usize) {
        let row_shift = width.next_power_of_two().trailing_zeros();
        trace!(
            "Allocating grid network nodes for {}x{} terrain (row shift {})",
            width,
            height,
            row_shift
        );
        self.nodes = (0..height << row_shift)
            .map(|ix| {
                let x = ix & ((1 << row_shift) - 1);
                let y = ix >> row_shift;
                Node::new(Point::new(x as u8, y as u8))
            })
            .collect();
        self.width = width;
        self.height = height;
        self.row_shift = row_shift;
    }
}

impl Network for GridNetwork {
    fn prepare(
        &mut self,
        _start: Point,
        _end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
    ) -> bool {
        if terrain.width() != self.width || terrain.height() != self.height {
            self.allocate(terrain.width(), terrain.height());
        } else {
            self.reset_status();
        }
        self.scope = Some(SearchScope {
            include_safezone,
            allow_diagonals: self.allow_diagonals,
        });
        true
    }

    fn node_at(&mut self, position: Point) -> Option<NodeIndex> {
        let (x, y) = (position.x as usize, position.y as usize);
        (x < self.width && y < self.height).then(|| NodeIndex((y << self.row_shift) + x))
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
