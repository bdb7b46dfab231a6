use crate::heuristic::HeuristicKind;
use crate::metrics::SearchMetrics;
use crate::network::NetworkKind;
use crate::open_list::OpenListKind;
use crate::path_finder::{DynPathFinder, PathFinder};
use crate::{DEFAULT_HEURISTIC_ESTIMATE, DEFAULT_SEARCH_LIMIT};
use core::fmt;
use std::sync::Arc;

/// Every tunable of a [PathFinder], for building finders whose parts are chosen at
/// runtime, e.g. from a server configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathFinderConfig {
    /// 0 disables the distance bound.
    pub maximum_distance: u32,
    pub search_limit: usize,
    pub heuristic_estimate: u32,
    pub heuristic: HeuristicKind,
    pub open_list: OpenListKind,
    pub network: NetworkKind,
    pub allow_diagonals: bool,
}

impl Default for PathFinderConfig {
    fn default() -> PathFinderConfig {
        PathFinderConfig {
            maximum_distance: 0,
            search_limit: DEFAULT_SEARCH_LIMIT,
            heuristic_estimate: DEFAULT_HEURISTIC_ESTIMATE,
            heuristic: HeuristicKind::default(),
            open_list: OpenListKind::default(),
            network: NetworkKind::default(),
            allow_diagonals: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Segment sides of a scoped network must be powers of two with
    /// `min <= max <= 256`.
    InvalidSegmentSides { max: usize, min: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidSegmentSides { max, min } => write!(
                f,
                "invalid segment sides max {} and min {}: expected powers of two with min <= max <= 256",
                max, min
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl PathFinderConfig {
    pub fn with_maximum_distance(mut self, maximum_distance: u32) -> Self {
        self.maximum_distance = maximum_distance;
        self
    }
    pub fn with_search_limit(mut self, search_limit: usize) -> Self {
        self.search_limit = search_limit;
        self
    }
    pub fn with_heuristic(mut self, heuristic: HeuristicKind, estimate: u32) -> Self {
        self.heuristic = heuristic;
        self.heuristic_estimate = estimate;
        self
    }
    pub fn with_open_list(mut self, open_list: OpenListKind) -> Self {
        self.open_list = open_list;
        self
    }
    pub fn with_network(mut self, network: NetworkKind) -> Self {
        self.network = network;
        self
    }
    pub fn with_diagonals(mut self, allow_diagonals: bool) -> Self {
        self.allow_diagonals = allow_diagonals;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let NetworkKind::Scoped {
            max_segment_side: max,
            min_segment_side: min,
        } = self.network
        {
            let valid = max.is_power_of_two() && min.is_power_of_two() && min <= max && max <= 256;
            if !valid {
                return Err(ConfigError::InvalidSegmentSides { max, min });
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Result<DynPathFinder, ConfigError> {
        self.validate()?;
        let finder = PathFinder::new(
            self.network.build(self.allow_diagonals),
            self.open_list.build(),
        )
        .with_boxed_heuristic(self.heuristic.build(self.heuristic_estimate))
        .with_search_limit(self.search_limit)
        .with_maximum_distance(self.maximum_distance);
        Ok(finder)
    }

    /// Like [build](Self::build), reporting every search to `metrics`.
    pub fn build_with_metrics(
        &self,
        metrics: Arc<dyn SearchMetrics>,
    ) -> Result<DynPathFinder, ConfigError> {
        Ok(self.build()?.with_metrics(metrics))
    }
}
