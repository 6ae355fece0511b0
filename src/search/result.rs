//! Search result types and statistics

use crate::search::node::Node;
use std::time::Duration;

/// Why a search stopped. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// Collected `max_solutions` solutions
    Solved,
    /// An iteration produced no new candidates
    Exhausted,
    /// Ran `max_iterations` iterations
    #[default]
    BudgetExceeded,
    /// The visited set reached its configured limit
    VisitedLimit,
    /// The configured timeout elapsed
    TimedOut,
    /// The cancel flag was raised
    Cancelled,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Solved => write!(f, "solved"),
            Termination::Exhausted => write!(f, "exhausted"),
            Termination::BudgetExceeded => write!(f, "budget exceeded"),
            Termination::VisitedLimit => write!(f, "visited limit reached"),
            Termination::TimedOut => write!(f, "timed out"),
            Termination::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for Termination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").trim() {
            "solved" => Ok(Termination::Solved),
            "exhausted" => Ok(Termination::Exhausted),
            "budget exceeded" | "budget" => Ok(Termination::BudgetExceeded),
            "visited limit reached" | "visited limit" => Ok(Termination::VisitedLimit),
            "timed out" | "timeout" => Ok(Termination::TimedOut),
            "cancelled" => Ok(Termination::Cancelled),
            _ => Err(format!(
                "Unknown termination: '{}'. Valid options: solved, exhausted, budget-exceeded, visited-limit, timed-out, cancelled",
                s
            )),
        }
    }
}

/// Statistics from one `solve()` call
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Iterations started (an iteration cut short by a solution counts)
    pub iterations: usize,
    /// Calls to `combine`
    pub combinations: u64,
    /// Children whose canonical key was already visited
    pub duplicates_skipped: u64,
    /// Children kept as candidates
    pub candidates_generated: u64,
    /// Solutions dropped by `is_nontrivial`
    pub trivial_solutions_rejected: u64,
    /// Non-trivial solutions reported
    pub solutions_found: usize,
    /// Size of the visited set at the end of the run
    pub visited_count: usize,
    /// Best frontier score seen at the end of any iteration
    pub best_score: f64,
    /// Total time spent searching
    pub elapsed_time: Duration,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self {
            iterations: 0,
            combinations: 0,
            duplicates_skipped: 0,
            candidates_generated: 0,
            trivial_solutions_rejected: 0,
            solutions_found: 0,
            visited_count: 0,
            best_score: f64::INFINITY,
            elapsed_time: Duration::ZERO,
        }
    }
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of combinations that landed on an already-visited key (0.0 to 1.0)
    pub fn duplicate_rate(&self) -> f64 {
        if self.combinations == 0 {
            0.0
        } else {
            self.duplicates_skipped as f64 / self.combinations as f64
        }
    }

    /// Combinations per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.combinations as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Iterations: {}\n", self.iterations));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Combinations: {}\n", self.combinations));
        s.push_str(&format!(
            "Throughput: {:.0} combinations/sec\n",
            self.throughput()
        ));
        s.push_str(&format!(
            "Duplicate rate: {:.2}%\n",
            self.duplicate_rate() * 100.0
        ));
        s.push_str(&format!(
            "Candidates generated: {}\n",
            self.candidates_generated
        ));
        if self.trivial_solutions_rejected > 0 {
            s.push_str(&format!(
                "Trivial solutions rejected: {}\n",
                self.trivial_solutions_rejected
            ));
        }
        s.push_str(&format!("Visited: {}\n", self.visited_count));
        s.push_str(&format!("Best score: {:.4}\n", self.best_score));
        s.push_str(&format!("Solutions found: {}\n", self.solutions_found));
        s
    }
}

/// Result of a search: the solutions in discovery order, why it stopped, and statistics
#[derive(Debug, Clone)]
pub struct SearchResult<S> {
    pub solutions: Vec<Node<S>>,
    pub termination: Termination,
    pub statistics: SearchStatistics,
}

impl<S> SearchResult<S> {
    pub fn found_solution(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// The shortest solution word, if any
    pub fn shortest(&self) -> Option<&Node<S>> {
        self.solutions.iter().min_by_key(|node| node.word_len())
    }
}

impl<S> std::fmt::Display for SearchResult<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.solutions.is_empty() {
            writeln!(f, "No solution found ({}).", self.termination)?;
        } else {
            writeln!(
                f,
                "Found {} solution(s) ({}):",
                self.solutions.len(),
                self.termination
            )?;
            for node in &self.solutions {
                writeln!(f, "  [{}] {}", node.word_len(), node.identifier())?;
            }
        }
        Ok(())
    }
}
