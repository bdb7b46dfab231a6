//! Sharing finders between worker threads.
//!
//! A [PathFinder](crate::PathFinder) is reused across searches but serves one search
//! at a time. [PathFinderPool] keeps idle finders around and hands each caller one for
//! the duration of a search, building a new one when every finder is busy.
use crate::config::{ConfigError, PathFinderConfig};
use crate::metrics::SearchMetrics;
use crate::path_finder::DynPathFinder;
use log::trace;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

pub struct PathFinderPool {
    config: PathFinderConfig,
    metrics: Option<Arc<dyn SearchMetrics>>,
    idle: Mutex<Vec<DynPathFinder>>,
}

impl PathFinderPool {
    /// Fails if `config` cannot build a finder, so checking out never fails later.
    pub fn new(config: PathFinderConfig) -> Result<PathFinderPool, ConfigError> {
        config.validate()?;
        Ok(PathFinderPool {
            config,
            metrics: None,
            idle: Mutex::new(Vec::new()),
        })
    }

    /// Every finder of this pool reports to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn SearchMetrics>) -> Self {
        let idle = self.idle.get_mut().unwrap_or_else(PoisonError::into_inner);
        for finder in idle.iter_mut() {
            finder.set_metrics(Some(metrics.clone()));
        }
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &PathFinderConfig {
        &self.config
    }

    /// Checks out an idle finder, or builds one if none is idle. It returns to the pool
    /// when the guard is dropped.
    pub fn get(&self) -> PooledPathFinder<'_> {
        // A panic during a search only leaves finders behind that are reset before
        // their next search anyway.
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let finder = match reused {
            Some(finder) => finder,
            None => {
                trace!("Building a new path finder for the pool");
                self.build()
            }
        };
        PooledPathFinder {
            pool: self,
            finder: Some(finder),
        }
    }

    pub fn idle_count(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn build(&self) -> DynPathFinder {
        let finder = match self.config.build() {
            Ok(finder) => finder,
            Err(error) => unreachable!("configuration was validated on creation: {}", error),
        };
        match &self.metrics {
            Some(metrics) => finder.with_metrics(metrics.clone()),
            None => finder,
        }
    }

    fn give_back(&self, finder: DynPathFinder) {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(finder);
    }
}

/// A finder checked out of a [PathFinderPool].
pub struct PooledPathFinder<'a> {
    pool: &'a PathFinderPool,
    finder: Option<DynPathFinder>,
}

impl Deref for PooledPathFinder<'_> {
    type Target = DynPathFinder;

    fn deref(&self) -> &DynPathFinder {
        self.finder
            .as_ref()
            .expect("pooled finder is only taken on drop")
    }
}

impl DerefMut for PooledPathFinder<'_> {
    fn deref_mut(&mut self) -> &mut DynPathFinder {
        self.finder
            .as_mut()
            .expect("pooled finder is only taken on drop")
    }
}

impl Drop for PooledPathFinder<'_> {
    fn drop(&mut self) {
        if let Some(finder) = self.finder.take() {
            self.pool.give_back(finder);
        }
    }
}
