//! The A* search loop.
//!
//! A [PathFinder] owns its network and open list and is reused across searches, so it
//! is not meant to be shared: give every worker its own instance or check one out of a
//! [PathFinderPool](crate::PathFinderPool) per search. The terrain is only borrowed
//! and can be read by any number of finders at once.
use crate::heuristic::{Heuristic, NoHeuristic};
use crate::metrics::SearchMetrics;
use crate::network::Network;
use crate::node::{NodeIndex, NodeStatus, OpenEntry};
use crate::open_list::PriorityQueue;
use crate::point::Point;
use crate::terrain::TerrainGrid;
use crate::{PathResultNode, DEFAULT_HEURISTIC_ESTIMATE, DEFAULT_SEARCH_LIMIT};
use core::fmt;
use itertools::Itertools;
use log::{debug, trace, warn};
use std::iter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A [PathFinder] with its parts picked at runtime, as built by
/// [PathFinderConfig](crate::PathFinderConfig).
pub type DynPathFinder =
    PathFinder<Box<dyn Network + Send>, Box<dyn PriorityQueue<OpenEntry> + Send>>;

/// Cooperative cancellation shared between the searching thread and whoever wants to
/// stop it. The search checks it once per node expansion.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_cancellation_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a search ended without a path. None of these are errors of the caller; they
/// are expected outcomes the caller has to fall back from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchFailure {
    /// Every reachable node was expanded without reaching the end.
    NoPath,
    /// The search expanded as many nodes as its search limit allows.
    SearchLimitExceeded,
    /// Start and end are further apart than the maximum distance.
    DistanceExceeded,
    /// The network cannot address both start and end.
    PrepareRejected,
    Cancelled,
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            SearchFailure::NoPath => "no path exists",
            SearchFailure::SearchLimitExceeded => "search limit exceeded",
            SearchFailure::DistanceExceeded => "maximum distance exceeded",
            SearchFailure::PrepareRejected => "network rejected the search",
            SearchFailure::Cancelled => "search was cancelled",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for SearchFailure {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchState {
    #[default]
    NotStarted,
    Running,
    Succeeded,
    Failed(SearchFailure),
}

/// Bookkeeping of the most recent search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    pub expanded_nodes: usize,
    pub elapsed: Duration,
}

pub struct PathFinder<N, Q> {
    network: N,
    open_list: Q,
    heuristic: Box<dyn Heuristic + Send>,
    /// Upper bound on the straight-line distance between start and end, and on the
    /// detour `start -> node -> end` of every visited node. 0 disables the bound.
    pub maximum_distance: u32,
    /// Number of node expansions after which a search gives up.
    pub search_limit: usize,
    metrics: Option<Arc<dyn SearchMetrics>>,
    state: SearchState,
    statistics: SearchStatistics,
}

impl<N: Network, Q: PriorityQueue<OpenEntry>> PathFinder<N, Q> {
    /// Creates a finder searching like Dijkstra's algorithm ([NoHeuristic]) with the
    /// default search limit, no distance bound and no metrics.
    pub fn new(network: N, open_list: Q) -> PathFinder<N, Q> {
        PathFinder {
            network,
            open_list,
            heuristic: Box::new(NoHeuristic {
                multiplier: DEFAULT_HEURISTIC_ESTIMATE,
            }),
            maximum_distance: 0,
            search_limit: DEFAULT_SEARCH_LIMIT,
            metrics: None,
            state: SearchState::NotStarted,
            statistics: SearchStatistics::default(),
        }
    }

    pub fn with_heuristic<H: Heuristic + Send + 'static>(mut self, heuristic: H) -> Self {
        self.heuristic = Box::new(heuristic);
        self
    }

    pub fn with_boxed_heuristic(mut self, heuristic: Box<dyn Heuristic + Send>) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn SearchMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_search_limit(mut self, search_limit: usize) -> Self {
        self.search_limit = search_limit;
        self
    }

    pub fn with_maximum_distance(mut self, maximum_distance: u32) -> Self {
        self.maximum_distance = maximum_distance;
        self
    }

    pub fn set_metrics(&mut self, metrics: Option<Arc<dyn SearchMetrics>>) {
        self.metrics = metrics;
    }

    /// Multiplier of the current heuristic.
    pub fn heuristic_estimate(&self) -> u32 {
        self.heuristic.heuristic_estimate_multiplier()
    }

    pub fn set_heuristic_estimate(&mut self, multiplier: u32) {
        self.heuristic.set_heuristic_estimate_multiplier(multiplier);
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn last_statistics(&self) -> SearchStatistics {
        self.statistics
    }

    /// Searches a path from `start` to `end`. The path excludes `start` and ends with
    /// `end`; it is empty if both are equal. Returns [None] on any failure, see
    /// [try_find_path](Self::try_find_path) for the reason.
    pub fn find_path(
        &mut self,
        start: Point,
        end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
        cancellation: &CancellationToken,
    ) -> Option<Vec<PathResultNode>> {
        self.try_find_path(start, end, terrain, include_safezone, cancellation)
            .ok()
    }

    /// Like [find_path](Self::find_path), but tells why no path was returned.
    pub fn try_find_path(
        &mut self,
        start: Point,
        end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
        cancellation: &CancellationToken,
    ) -> Result<Vec<PathResultNode>, SearchFailure> {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.search_started();
        }
        self.state = SearchState::Running;
        trace!("Searching path from {} to {}", start, end);

        let mut expanded_nodes = 0;
        let result = self.search(
            start,
            end,
            terrain,
            include_safezone,
            cancellation,
            &mut expanded_nodes,
        );

        let elapsed = started.elapsed();
        self.statistics = SearchStatistics {
            expanded_nodes,
            elapsed,
        };
        match &result {
            Ok(path) => {
                self.state = SearchState::Succeeded;
                trace!(
                    "Found path of {} steps from {} to {} after {} expansions",
                    path.len(),
                    start,
                    end,
                    expanded_nodes
                );
            }
            Err(failure) => {
                self.state = SearchState::Failed(*failure);
                debug!(
                    "No path from {} to {}: {} after {} expansions",
                    start, end, failure, expanded_nodes
                );
            }
        }
        if let Some(metrics) = &self.metrics {
            metrics.search_finished(result.is_ok(), elapsed);
        }
        result
    }

    fn search(
        &mut self,
        start: Point,
        end: Point,
        terrain: &TerrainGrid,
        include_safezone: bool,
        cancellation: &CancellationToken,
        expanded_nodes: &mut usize,
    ) -> Result<Vec<PathResultNode>, SearchFailure> {
        let maximum_distance = self.maximum_distance as f64;
        let bounded = self.maximum_distance > 0;
        if bounded && start.euclidean_distance_to(&end) > maximum_distance {
            return Err(SearchFailure::DistanceExceeded);
        }

        self.open_list.clear();
        if !self.network.prepare(start, end, terrain, include_safezone) {
            return Err(SearchFailure::PrepareRejected);
        }
        let Some(start_index) = self.network.node_at(start) else {
            return Err(SearchFailure::NoPath);
        };
        {
            let node = self.network.node_mut(start_index);
            node.cost_until_now = 0;
            node.predicted_total_cost = 0;
            node.previous = None;
            node.status = NodeStatus::Open;
        }
        self.open_list.push(OpenEntry::new(start_index, start, 0));

        while !self.open_list.is_empty() {
            if cancellation.is_cancellation_requested() {
                return Err(SearchFailure::Cancelled);
            }
            let current_index = self.open_list.pop().node;
            let current = *self.network.node(current_index);
            if current.is_closed() {
                // Outdated entry of a node that was improved after being pushed.
                continue;
            }
            if current.position == end {
                self.network.node_mut(current_index).status = NodeStatus::Closed;
                return Ok(self.backtrace(current_index));
            }
            if *expanded_nodes >= self.search_limit {
                warn!(
                    "Search from {} to {} hit the limit of {} expansions",
                    start, end, self.search_limit
                );
                return Err(SearchFailure::SearchLimitExceeded);
            }

            for next in self.network.possible_next_nodes(terrain, current_index) {
                let position = self.network.node(next).position;
                if bounded
                    && start.euclidean_distance_to(&position)
                        + position.euclidean_distance_to(&end)
                        > maximum_distance
                {
                    continue;
                }
                let estimate = self.heuristic.calculate_heuristic_distance(position, end);
                let node = self.network.node_mut(next);
                node.predicted_total_cost = node.cost_until_now + estimate;
                node.previous = Some(current_index);
                node.status = NodeStatus::Open;
                self.open_list
                    .push(OpenEntry::new(next, position, node.predicted_total_cost));
            }

            self.network.node_mut(current_index).status = NodeStatus::Closed;
            *expanded_nodes += 1;
        }
        Err(SearchFailure::NoPath)
    }

    /// Follows the predecessors from `end` back to the start node, which is the only
    /// node on the chain without one.
    fn backtrace(&self, end: NodeIndex) -> Vec<PathResultNode> {
        let network = &self.network;
        let mut path: Vec<PathResultNode> =
            iter::successors(Some(end), |&index| network.node(index).previous)
                .map(|index| network.node(index).position)
                .tuple_windows()
                .map(|(point, previous_point)| PathResultNode::new(point, previous_point))
                .collect();
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::ManhattanHeuristic;
    use crate::metrics::PathFinderMetrics;
    use crate::network::{FullGridNetwork, GridNetwork, ScopedGridNetwork};
    use crate::open_list::{BinaryMinHeap, IndexedLinkedList};

    fn finder() -> PathFinder<GridNetwork, BinaryMinHeap<OpenEntry>> {
        PathFinder::new(GridNetwork::new(true), BinaryMinHeap::new())
    }

    #[test]
    fn straight_line() {
        let terrain = TerrainGrid::new(5, 1, 1);
        let mut finder = finder();
        let path = finder
            .find_path(
                Point::new(0, 0),
                Point::new(4, 0),
                &terrain,
                false,
                &CancellationToken::new(),
            )
            .unwrap();
        let expected: Vec<PathResultNode> = (1..5)
            .map(|x| PathResultNode::new(Point::new(x, 0), Point::new(x - 1, 0)))
            .collect();
        assert_eq!(path, expected);
        assert_eq!(finder.state(), SearchState::Succeeded);
        assert_eq!(finder.last_statistics().expanded_nodes, 4);
    }

    #[test]
    fn start_equals_end() {
        let terrain = TerrainGrid::new(3, 3, 1);
        let mut finder = finder();
        let p = Point::new(1, 1);
        let path = finder.find_path(p, p, &terrain, false, &CancellationToken::new());
        assert_eq!(path, Some(vec![]));
    }

    #[test]
    fn cancelled_before_start() {
        let terrain = TerrainGrid::new(5, 5, 1);
        let mut finder = finder();
        let token = CancellationToken::new();
        token.cancel();
        let result = finder.try_find_path(
            Point::new(0, 0),
            Point::new(4, 4),
            &terrain,
            false,
            &token,
        );
        assert_eq!(result, Err(SearchFailure::Cancelled));
        assert_eq!(
            finder.state(),
            SearchState::Failed(SearchFailure::Cancelled)
        );
    }

    #[test]
    fn distance_precheck() {
        let terrain = TerrainGrid::new(20, 20, 1);
        let mut finder = finder().with_maximum_distance(5);
        let token = CancellationToken::new();
        assert_eq!(
            finder.try_find_path(Point::new(0, 0), Point::new(4, 4), &terrain, false, &token),
            Err(SearchFailure::DistanceExceeded)
        );
        assert!(finder
            .find_path(Point::new(0, 0), Point::new(3, 3), &terrain, false, &token)
            .is_some());
    }

    #[test]
    fn distance_bound_prunes_detours() {
        // The only way around the wall leaves the ellipse allowed by the distance bound.
        // 1 1 1 1 1
        // 1 0 0 0 1
        // 1 1 1 0 1
        let terrain = TerrainGrid::from_rows(&[
            [1, 1, 1, 1, 1],
            [1, 0, 0, 0, 1],
            [1, 1, 1, 0, 1],
        ]);
        let token = CancellationToken::new();
        let (start, end) = (Point::new(2, 2), Point::new(4, 2));
        let mut finder = finder();
        assert!(finder.find_path(start, end, &terrain, false, &token).is_some());
        finder.maximum_distance = 3;
        assert_eq!(
            finder.try_find_path(start, end, &terrain, false, &token),
            Err(SearchFailure::NoPath)
        );
    }

    #[test]
    fn reports_metrics() {
        let terrain = TerrainGrid::from_rows(&[[1, 1, 0, 1]]);
        let metrics = Arc::new(PathFinderMetrics::new());
        let mut finder = finder().with_metrics(metrics.clone());
        let token = CancellationToken::new();
        assert!(finder
            .find_path(Point::new(0, 0), Point::new(1, 0), &terrain, false, &token)
            .is_some());
        assert!(finder
            .find_path(Point::new(0, 0), Point::new(3, 0), &terrain, false, &token)
            .is_none());
        assert_eq!(metrics.current_searches(), 0);
        assert_eq!(metrics.completed_searches(), 1);
        assert_eq!(metrics.failed_searches(), 1);
        assert_eq!(metrics.completed_duration().count(), 1);
        assert_eq!(metrics.failed_duration().count(), 1);
    }

    #[test]
    fn heuristic_estimate_is_forwarded() {
        let mut finder = finder().with_heuristic(ManhattanHeuristic::new(1));
        assert_eq!(finder.heuristic_estimate(), 1);
        finder.set_heuristic_estimate(3);
        assert_eq!(finder.heuristic_estimate(), 3);
    }

    #[test]
    fn every_network_and_open_list_finds_the_same_path() {
        let terrain = TerrainGrid::from_rows(&[
            [1, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 3, 1],
            [1, 2, 1, 0, 1, 1],
            [1, 1, 1, 0, 1, 1],
            [5, 5, 1, 1, 1, 1],
        ]);
        let (start, end) = (Point::new(1, 3), Point::new(4, 2));
        let token = CancellationToken::new();
        let reference = finder()
            .find_path(start, end, &terrain, false, &token)
            .unwrap();
        let others: [(Box<dyn Network + Send>, Box<dyn PriorityQueue<OpenEntry> + Send>); 3] = [
            (
                Box::new(FullGridNetwork::new(true)),
                Box::new(IndexedLinkedList::for_open_entries()),
            ),
            (
                Box::new(ScopedGridNetwork::default()),
                Box::new(BinaryMinHeap::new()),
            ),
            (
                Box::new(GridNetwork::new(true)),
                Box::new(IndexedLinkedList::for_open_entries()),
            ),
        ];
        for (network, open_list) in others {
            let mut other = PathFinder::new(network, open_list);
            assert_eq!(
                other.find_path(start, end, &terrain, false, &token),
                Some(reference.clone())
            );
        }
    }
}
