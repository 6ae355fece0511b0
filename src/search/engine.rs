//! FlashBeam: beam search with a persistent flash pool
//!
//! The engine keeps two bounded sets between iterations:
//! - the **frontier**, the best new nodes of the last iteration, and
//! - the **flash pool**, the best nodes seen so far (see [`FlashPool`]).
//!
//! Each iteration:
//! 1. Build the expansion pool (flash entries, then generators, deduplicated)
//! 2. Combine every frontier node with every pool node
//! 3. Skip children whose canonical key was already visited
//! 4. Report non-trivial solutions, stopping at `max_solutions`
//! 5. Keep the `beam_width` best children as the next frontier
//! 6. Refresh the flash pool from the new frontier
//!
//! With more than one expansion thread, children are computed on a rayon pool
//! but admitted (visited check, solution test, candidate order) sequentially in
//! frontier-then-pool order, so parallel and serial runs return identical results.

use crate::search::cancel::CancelFlag;
use crate::search::config::FlashBeamConfig;
use crate::search::error::{SearchError, SearchOutcome};
use crate::search::flash::FlashPool;
use crate::search::frontier::select_frontier;
use crate::search::node::{Node, compare_scores};
use crate::search::problem::SearchProblem;
use crate::search::progress::{IterationReport, LogSink, ProgressSink, SolutionReport};
use crate::search::result::{SearchResult, SearchStatistics, Termination};
use log::{debug, info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::ThreadPool;
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;

/// Frontier rows handed to each expansion thread per parallel batch
const ROWS_PER_THREAD: usize = 32;

/// Frontier nodes between trace messages during expansion
const EXPANSION_LOG_INTERVAL: usize = 1000;

/// Mutable state of one `solve()` call
struct RunState<S, K> {
    visited: HashSet<K>,
    solutions: Vec<Node<S>>,
    candidates: Vec<Node<S>>,
    statistics: SearchStatistics,
}

impl<S, K> RunState<S, K> {
    fn new() -> Self {
        Self {
            visited: HashSet::new(),
            solutions: Vec::new(),
            candidates: Vec::new(),
            statistics: SearchStatistics::new(),
        }
    }
}

/// The FlashBeam search engine
pub struct FlashBeam<P: SearchProblem> {
    problem: P,
    config: FlashBeamConfig,
    cancel: CancelFlag,
}

impl<P: SearchProblem> FlashBeam<P> {
    pub fn new(problem: P, config: FlashBeamConfig) -> Self {
        Self {
            problem,
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Share a cancel flag with the caller (or with other engines)
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that stops this engine at the start of its next iteration
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &FlashBeamConfig {
        &self.config
    }

    /// Run the search, logging progress through the `log` facade
    pub fn solve(&self) -> SearchOutcome<SearchResult<P::State>> {
        self.solve_with(&mut LogSink)
    }

    /// Run the search, sending progress to `sink`.
    ///
    /// Fails only on contract violations or invalid configuration, before any
    /// expansion happens. Not finding a solution is a normal result.
    pub fn solve_with(
        &self,
        sink: &mut dyn ProgressSink<P::State>,
    ) -> SearchOutcome<SearchResult<P::State>> {
        let start_time = Instant::now();
        self.config.validate()?;

        let root = self.problem.initial_node();
        if root.score.is_nan() {
            return Err(SearchError::InvalidRootScore);
        }
        let generators = self.problem.generator_nodes();
        validate_generators(&generators)?;

        let thread_pool = self.build_thread_pool()?;
        let mut tie_break = self.config.tie_break_seed.map(ChaCha8Rng::seed_from_u64);

        let mut run = RunState::new();
        run.visited.insert(self.problem.canonical_key(&root));
        for generator in &generators {
            run.visited.insert(self.problem.canonical_key(generator));
        }

        let mut frontier: Vec<Node<P::State>> = std::iter::once(root)
            .chain(generators.iter().cloned())
            .collect();
        let mut flash = FlashPool::seeded(&generators, self.config.flash_size);

        info!(
            "Starting FlashBeam on {} (beam {}, flash {}, {} generators, {} thread(s))",
            self.problem.name(),
            self.config.beam_width,
            self.config.flash_size,
            generators.len(),
            thread_pool
                .as_ref()
                .map(|pool| pool.current_num_threads())
                .unwrap_or(1)
        );

        let mut termination = Termination::BudgetExceeded;

        for iteration in 0..self.config.max_iterations {
            if self.cancel.is_cancelled() {
                termination = Termination::Cancelled;
                break;
            }
            if let Some(timeout) = self.config.timeout {
                if start_time.elapsed() >= timeout {
                    termination = Termination::TimedOut;
                    break;
                }
            }
            if self.config.visited_policy.is_exceeded(run.visited.len()) {
                termination = Termination::VisitedLimit;
                break;
            }

            run.statistics.iterations = iteration + 1;

            let pool = flash.expansion_pool(&generators, &self.problem);
            debug!(
                "Iteration {}: frontier {}, expansion pool {}",
                iteration,
                frontier.len(),
                pool.len()
            );

            let solved = match &thread_pool {
                Some(thread_pool) => {
                    self.expand_parallel(thread_pool, &frontier, &pool, &mut run, iteration, sink)
                }
                None => self.expand_serial(&frontier, &pool, &mut run, iteration, sink),
            };
            if solved {
                info!(
                    "Reached max_solutions ({}) at iteration {}. Stopping.",
                    self.config.max_solutions, iteration
                );
                termination = Termination::Solved;
                break;
            }

            if run.candidates.is_empty() {
                info!("Iteration {}: no new points found.", iteration);
                termination = Termination::Exhausted;
                break;
            }

            let candidates = std::mem::take(&mut run.candidates);
            frontier = select_frontier(candidates, self.config.beam_width, tie_break.as_mut());
            flash.refresh(&frontier, &self.problem);

            let best = &frontier[0];
            if compare_scores(best.score, run.statistics.best_score).is_lt() {
                run.statistics.best_score = best.score;
            }

            let report = IterationReport {
                iteration,
                frontier_size: frontier.len(),
                flash_size: flash.len(),
                expansion_pool_size: pool.len(),
                best_score: best.score,
                best_score_display: self.problem.format_score(best),
                best_word: best.identifier(),
                flash_preview: flash.preview(self.config.preview_len),
                visited_count: run.visited.len(),
                solutions_found: run.solutions.len(),
                elapsed: start_time.elapsed(),
            };
            sink.on_iteration(&report);
        }

        let mut statistics = run.statistics;
        statistics.solutions_found = run.solutions.len();
        statistics.visited_count = run.visited.len();
        statistics.elapsed_time = start_time.elapsed();

        info!(
            "Search complete ({}): {} solution(s), {} visited in {:.1?}",
            termination,
            run.solutions.len(),
            statistics.visited_count,
            statistics.elapsed_time
        );

        Ok(SearchResult {
            solutions: run.solutions,
            termination,
            statistics,
        })
    }

    fn build_thread_pool(&self) -> Result<Option<ThreadPool>, SearchError> {
        let threads = self.config.resolved_threads();
        if threads <= 1 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map(Some)
            .map_err(|e| SearchError::ThreadPool(e.to_string()))
    }

    /// Expand one frontier on the calling thread. Returns true once `max_solutions` is reached.
    fn expand_serial(
        &self,
        frontier: &[Node<P::State>],
        pool: &[Node<P::State>],
        run: &mut RunState<P::State, P::Key>,
        iteration: usize,
        sink: &mut dyn ProgressSink<P::State>,
    ) -> bool {
        for (idx, base) in frontier.iter().enumerate() {
            if idx > 0 && idx % EXPANSION_LOG_INTERVAL == 0 {
                trace!("  ... {}/{} frontier nodes expanded", idx, frontier.len());
            }
            for operand in pool {
                let child = self.problem.combine(base, operand);
                let key = self.problem.canonical_key(&child);
                if self.admit(run, key, child, iteration, sink) {
                    return true;
                }
            }
        }
        false
    }

    /// Expand one frontier in batches of rows computed on the thread pool.
    ///
    /// Each batch is admitted in row order before the next one is computed, so
    /// early termination wastes at most one batch of combinations.
    fn expand_parallel(
        &self,
        thread_pool: &ThreadPool,
        frontier: &[Node<P::State>],
        pool: &[Node<P::State>],
        run: &mut RunState<P::State, P::Key>,
        iteration: usize,
        sink: &mut dyn ProgressSink<P::State>,
    ) -> bool {
        let batch_len = (thread_pool.current_num_threads() * ROWS_PER_THREAD).max(1);
        let problem = &self.problem;

        for (batch_idx, batch) in frontier.chunks(batch_len).enumerate() {
            let rows: Vec<Vec<(P::Key, Node<P::State>)>> = thread_pool.install(|| {
                batch
                    .par_iter()
                    .map(|base| {
                        pool.iter()
                            .map(|operand| {
                                let child = problem.combine(base, operand);
                                (problem.canonical_key(&child), child)
                            })
                            .collect()
                    })
                    .collect()
            });

            for (key, child) in rows.into_iter().flatten() {
                if self.admit(run, key, child, iteration, sink) {
                    return true;
                }
            }

            let expanded = (batch_idx + 1) * batch_len;
            if expanded < frontier.len() && expanded % EXPANSION_LOG_INTERVAL < batch_len {
                trace!("  ... {}/{} frontier nodes expanded", expanded, frontier.len());
            }
        }
        false
    }

    /// Admit one child: deduplicate, test for a solution, keep as a candidate.
    ///
    /// Returns true once `max_solutions` solutions have been collected.
    fn admit(
        &self,
        run: &mut RunState<P::State, P::Key>,
        key: P::Key,
        child: Node<P::State>,
        iteration: usize,
        sink: &mut dyn ProgressSink<P::State>,
    ) -> bool {
        run.statistics.combinations += 1;
        if !run.visited.insert(key) {
            run.statistics.duplicates_skipped += 1;
            return false;
        }

        if self.problem.is_solution(&child) {
            if self.problem.is_nontrivial(&child) {
                run.solutions.push(child.clone());
                let report = SolutionReport {
                    iteration,
                    word: child.identifier(),
                    word_len: child.word_len(),
                    score_display: self.problem.format_score(&child),
                    ordinal: run.solutions.len(),
                };
                sink.on_solution(&child, &report);

                if run.solutions.len() >= self.config.max_solutions {
                    return true;
                }
            } else {
                run.statistics.trivial_solutions_rejected += 1;
            }
        }

        // Rejected-as-trivial solutions stay in play as intermediate nodes
        run.statistics.candidates_generated += 1;
        run.candidates.push(child);
        false
    }
}

fn validate_generators<S>(generators: &[Node<S>]) -> Result<(), SearchError> {
    if generators.is_empty() {
        return Err(SearchError::EmptyGenerators);
    }
    if let Some(bad) = generators.iter().find(|g| g.score.is_nan()) {
        return Err(SearchError::InvalidGeneratorScore {
            identifier: bad.identifier(),
        });
    }
    Ok(())
}
