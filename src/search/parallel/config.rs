//! Configuration for portfolio search.

use std::time::Duration;

/// Configuration for running several engines side by side.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Number of engines to run.
    pub num_workers: usize,
    /// Base tie-break seed (worker `i` gets `base_seed + i`).
    pub base_seed: Option<u64>,
    /// Overall timeout for the portfolio.
    pub timeout: Option<Duration>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            base_seed: None,
            timeout: None,
        }
    }
}

impl PortfolioConfig {
    /// Set the number of workers (at least one).
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    pub fn with_seed_option(mut self, seed: Option<u64>) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Tie-break seed for one worker.
    ///
    /// Without a base seed, worker 0 keeps plain insertion order and the
    /// others are seeded with their index.
    pub fn worker_seed(&self, worker_id: usize) -> Option<u64> {
        match self.base_seed {
            Some(base) => Some(base.wrapping_add(worker_id as u64)),
            None if worker_id == 0 => None,
            None => Some(worker_id as u64),
        }
    }
}
