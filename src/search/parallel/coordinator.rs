//! Portfolio coordinator that runs several engines and merges their solutions.

use crate::search::cancel::CancelFlag;
use crate::search::config::FlashBeamConfig;
use crate::search::engine::FlashBeam;
use crate::search::error::SearchOutcome;
use crate::search::node::Node;
use crate::search::parallel::channel::{WorkerMessage, WorkerSink, create_channels};
use crate::search::parallel::config::PortfolioConfig;
use crate::search::problem::SearchProblem;
use crate::search::result::{SearchResult, SearchStatistics};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// How long the coordinator blocks before re-checking the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of one portfolio worker.
#[derive(Debug)]
pub struct WorkerResult<S> {
    pub worker_id: usize,
    /// Tie-break seed the worker ran with.
    pub seed: Option<u64>,
    pub outcome: SearchOutcome<SearchResult<S>>,
}

/// Result from a portfolio run.
#[derive(Debug)]
pub struct PortfolioResult<S> {
    /// Distinct solutions (by canonical key) in arrival order.
    pub solutions: Vec<Node<S>>,
    /// Per-worker outcomes, ordered by worker id.
    pub worker_results: Vec<WorkerResult<S>>,
    pub elapsed: Duration,
}

impl<S> PortfolioResult<S> {
    pub fn found_solution(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// Statistics summed over every worker that ran to completion.
    pub fn total_statistics(&self) -> SearchStatistics {
        let mut total = SearchStatistics::new();
        for result in self.worker_results.iter().filter_map(|w| w.outcome.as_ref().ok()) {
            let stats = &result.statistics;
            total.iterations = total.iterations.max(stats.iterations);
            total.combinations += stats.combinations;
            total.duplicates_skipped += stats.duplicates_skipped;
            total.candidates_generated += stats.candidates_generated;
            total.trivial_solutions_rejected += stats.trivial_solutions_rejected;
            total.visited_count += stats.visited_count;
            if stats.best_score < total.best_score {
                total.best_score = stats.best_score;
            }
        }
        total.solutions_found = self.solutions.len();
        total.elapsed_time = self.elapsed;
        total
    }
}

/// Run `portfolio.num_workers` engines on the same problem with different
/// tie-break seeds.
///
/// Every worker shares one cancel flag, raised once `max_solutions` distinct
/// solutions have arrived or the portfolio timeout elapses. Fails only when
/// every worker failed, returning the first worker's error.
pub fn run_portfolio<P: SearchProblem>(
    problem: &P,
    config: &FlashBeamConfig,
    portfolio: &PortfolioConfig,
) -> SearchOutcome<PortfolioResult<P::State>> {
    config.validate()?;

    let start_time = Instant::now();
    let num_workers = portfolio.num_workers.max(1);
    let cancel = CancelFlag::new();
    let (from_workers, to_coordinator) = create_channels(num_workers);

    info!(
        "Starting portfolio of {} worker(s) on {}",
        num_workers,
        problem.name()
    );

    let (solutions, mut worker_results) = std::thread::scope(|scope| {
        for (worker_id, sender) in to_coordinator.into_iter().enumerate() {
            let seed = portfolio.worker_seed(worker_id);
            let worker_config = config.clone().with_tie_break_seed_option(seed);
            let cancel = cancel.clone();

            scope.spawn(move || {
                debug!("Worker {} starting with seed {:?}", worker_id, seed);
                let engine = FlashBeam::new(problem, worker_config).with_cancel_flag(cancel);
                let mut sink = WorkerSink::new(worker_id, sender.clone());
                let outcome = engine.solve_with(&mut sink);
                let _ = sender.send(WorkerMessage::Finished { worker_id, outcome });
            });
        }

        coordinate(
            problem,
            &from_workers,
            &cancel,
            num_workers,
            config.max_solutions,
            portfolio.timeout.map(|t| start_time + t),
        )
    });

    worker_results.sort_by_key(|w| w.worker_id);
    for worker in &mut worker_results {
        worker.seed = portfolio.worker_seed(worker.worker_id);
    }

    if !worker_results.is_empty() && worker_results.iter().all(|w| w.outcome.is_err()) {
        let first = worker_results.remove(0);
        if let Err(err) = first.outcome {
            return Err(err);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        "Portfolio complete: {} distinct solution(s) in {:.1?}",
        solutions.len(),
        elapsed
    );

    Ok(PortfolioResult {
        solutions,
        worker_results,
        elapsed,
    })
}

/// Coordinator loop: collect solutions until every worker has finished.
fn coordinate<P: SearchProblem>(
    problem: &P,
    from_workers: &Receiver<WorkerMessage<P::State>>,
    cancel: &CancelFlag,
    num_workers: usize,
    max_solutions: usize,
    deadline: Option<Instant>,
) -> (Vec<Node<P::State>>, Vec<WorkerResult<P::State>>) {
    let mut solutions = Vec::new();
    let mut seen = HashSet::new();
    let mut worker_results = Vec::with_capacity(num_workers);

    while worker_results.len() < num_workers {
        if deadline.is_some_and(|d| Instant::now() >= d) && !cancel.is_cancelled() {
            info!("Portfolio timeout reached, stopping workers");
            cancel.cancel();
        }

        match from_workers.recv_timeout(POLL_INTERVAL) {
            Ok(WorkerMessage::Solution { worker_id, node }) => {
                // Workers may still be mid-iteration after the cancel; drop the surplus
                if solutions.len() >= max_solutions {
                    continue;
                }
                if seen.insert(problem.canonical_key(&node)) {
                    info!(
                        "Worker {} found solution #{} (length {}): {}",
                        worker_id,
                        solutions.len() + 1,
                        node.word_len(),
                        node.identifier()
                    );
                    solutions.push(node);
                    if solutions.len() >= max_solutions {
                        cancel.cancel();
                    }
                }
            }
            Ok(WorkerMessage::Finished { worker_id, outcome }) => {
                match &outcome {
                    Ok(result) => debug!("Worker {} finished: {}", worker_id, result.termination),
                    Err(err) => warn!("Worker {} failed: {}", worker_id, err),
                }
                worker_results.push(WorkerResult {
                    worker_id,
                    seed: None,
                    outcome,
                });
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    (solutions, worker_results)
}
