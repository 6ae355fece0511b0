//! Configuration types for the FlashBeam engine

use crate::search::error::SearchError;
use std::time::Duration;

/// What to do as the visited set grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitedPolicy {
    /// Never cap the visited set (memory grows for the whole run)
    #[default]
    Unbounded,
    /// Stop the search once this many canonical keys have been visited
    Limit(usize),
}

impl VisitedPolicy {
    /// True if `visited` keys exceed what the policy allows
    pub fn is_exceeded(&self, visited: usize) -> bool {
        match self {
            VisitedPolicy::Unbounded => false,
            VisitedPolicy::Limit(limit) => visited >= *limit,
        }
    }
}

impl std::fmt::Display for VisitedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitedPolicy::Unbounded => write!(f, "unbounded"),
            VisitedPolicy::Limit(limit) => write!(f, "limit:{}", limit),
        }
    }
}

impl std::str::FromStr for VisitedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "unbounded" | "none" | "unlimited" => Ok(VisitedPolicy::Unbounded),
            _ => {
                let digits = lower.strip_prefix("limit:").unwrap_or(&lower);
                digits
                    .replace('_', "")
                    .parse::<usize>()
                    .map(VisitedPolicy::Limit)
                    .map_err(|_| {
                        format!(
                            "Unknown visited policy: '{}'. Valid options: unbounded, limit:<n>, <n>",
                            s
                        )
                    })
            }
        }
    }
}

/// Main FlashBeam configuration
#[derive(Debug, Clone)]
pub struct FlashBeamConfig {
    /// Maximum number of nodes carried from one iteration to the next
    pub beam_width: usize,
    /// Maximum number of best-ever nodes used as macro generators
    pub flash_size: usize,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Stop after this many non-trivial solutions
    pub max_solutions: usize,
    /// Cap on visited-set growth
    pub visited_policy: VisitedPolicy,
    /// Overall timeout, checked once per iteration
    pub timeout: Option<Duration>,
    /// Expansion threads (0 = one per logical CPU, 1 = serial)
    pub threads: usize,
    /// Seed for shuffling candidates before sorting (None = keep insertion order on ties)
    pub tie_break_seed: Option<u64>,
    /// Number of flash entries shown in debug progress output
    pub preview_len: usize,
}

impl Default for FlashBeamConfig {
    fn default() -> Self {
        Self {
            beam_width: 5000,
            flash_size: 50,
            max_iterations: 1000,
            max_solutions: 1,
            visited_policy: VisitedPolicy::Unbounded,
            timeout: None,
            threads: 1,
            tie_break_seed: None,
            preview_len: 5,
        }
    }
}

impl FlashBeamConfig {
    /// Configuration with the four core knobs set and everything else default
    pub fn new(
        beam_width: usize,
        flash_size: usize,
        max_iterations: usize,
        max_solutions: usize,
    ) -> Self {
        Self {
            beam_width,
            flash_size,
            max_iterations,
            max_solutions,
            ..Default::default()
        }
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_flash_size(mut self, flash_size: usize) -> Self {
        self.flash_size = flash_size;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = max_solutions;
        self
    }

    pub fn with_visited_policy(mut self, policy: VisitedPolicy) -> Self {
        self.visited_policy = policy;
        self
    }

    pub fn with_visited_limit(mut self, limit: usize) -> Self {
        self.visited_policy = VisitedPolicy::Limit(limit);
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

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_tie_break_seed(mut self, seed: u64) -> Self {
        self.tie_break_seed = Some(seed);
        self
    }

    pub fn with_tie_break_seed_option(mut self, seed: Option<u64>) -> Self {
        self.tie_break_seed = seed;
        self
    }

    pub fn with_preview_len(mut self, preview_len: usize) -> Self {
        self.preview_len = preview_len;
        self
    }

    /// Number of expansion threads after resolving 0 to the CPU count
    pub fn resolved_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.threads
        }
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.beam_width == 0 {
            return Err(SearchError::InvalidConfig(
                "beam_width must be positive".to_string(),
            ));
        }
        if self.max_solutions == 0 {
            return Err(SearchError::InvalidConfig(
                "max_solutions must be positive".to_string(),
            ));
        }
        if let VisitedPolicy::Limit(0) = self.visited_policy {
            return Err(SearchError::InvalidConfig(
                "visited limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
