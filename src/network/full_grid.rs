use super::{expand_neighbors, Network, SearchScope, Successors};
use crate::node::{Node, NodeIndex};
use crate::point::Point;
use crate::terrain::TerrainGrid;

const SLOT_COUNT: usize = 1 << 16;

#[derive(Clone, Copy, Debug)]
struct Slot {
    node: NodeIndex,
    generation: u32,
}

/// Covers the complete 256x256 coordinate space with a fixed lookup table, but only
/// creates a [Node] once its cell is first touched.
///
/// Resetting is lazy: [reset_status](Network::reset_status) starts a new generation and
/// a node is reset the first time it is handed out in that generation, so a search
/// only pays for the nodes it actually visits.
#[derive(Clone, Debug)]
pub struct FullGridNetwork {
    pub allow_diagonals: bool,
    slots: Box<[Option<Slot>]>,
    nodes: Vec<Node>,
    generation: u32,
    width: usize,
    height: usize,
    scope: Option<SearchScope>,
}

impl Default for FullGridNetwork {
    fn default() -> FullGridNetwork {
        FullGridNetwork::new(true)
    }
}

impl FullGridNetwork {
    pub fn new(allow_diagonals: bool) -> FullGridNetwork {
        FullGridNetwork {
            allow_diagonals,
            slots: vec![None; SLOT_COUNT].into_boxed_slice(),
            nodes: Vec::new(),
            generation: 0,
            // Until prepared, the whole coordinate space is addressable.
            width: 256,
            height: 256,
            scope: None,
        }
    }

    /// Number of nodes created so far, across all searches.
    pub fn created_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn slot_index(position: Point) -> usize {
        ((position.y as usize) << 8) | position.x as usize
    }
}

impl Network for FullGridNetwork {
    fn prepare(
        &mut self,
        _start: Point,
        _end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
    ) -> bool {
        self.reset_status();
        self.width = terrain.width();
        self.height = terrain.height();
        self.scope = Some(SearchScope {
            include_safezone,
            allow_diagonals: self.allow_diagonals,
        });
        true
    }

    fn node_at(&mut self, position: Point) -> Option<NodeIndex> {
        if position.x as usize >= self.width || position.y as usize >= self.height {
            return None;
        }
        let generation = self.generation;
        let slot = &mut self.slots[Self::slot_index(position)];
        if let Some(existing) = slot {
            if existing.generation != generation {
                self.nodes[existing.node.0].reset();
                existing.generation = generation;
            }
            return Some(existing.node);
        }
        let node = NodeIndex(self.nodes.len());
        self.nodes.push(Node::new(position));
        *slot = Some(Slot { node, generation });
        Some(node)
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
        match self.generation.checked_add(1) {
            Some(generation) => self.generation = generation,
            None => {
                // Stamps of the old generations could collide with new ones.
                self.nodes.iter_mut().for_each(Node::reset);
                self.slots
                    .iter_mut()
                    .flatten()
                    .for_each(|slot| slot.generation = 0);
                self.generation = 0;
            }
        }
    }
}
