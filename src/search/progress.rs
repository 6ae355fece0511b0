//! Progress reporting for running searches
//!
//! Sinks are purely observational: nothing they do feeds back into the search.

use crate::search::node::Node;
use crossbeam_channel::Sender;
use log::{debug, info};
use std::time::Duration;

/// Snapshot emitted once at the end of every completed iteration
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub iteration: usize,
    pub frontier_size: usize,
    pub flash_size: usize,
    pub expansion_pool_size: usize,
    pub best_score: f64,
    /// Best frontier score as rendered by the problem's `format_score`
    pub best_score_display: String,
    pub best_word: String,
    /// Identifiers of the best few flash entries
    pub flash_preview: Vec<String>,
    pub visited_count: usize,
    pub solutions_found: usize,
    pub elapsed: Duration,
}

/// A solution as seen by a sink
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionReport {
    pub iteration: usize,
    pub word: String,
    pub word_len: usize,
    pub score_display: String,
    /// 1-based index among the solutions of this run
    pub ordinal: usize,
}

/// Receives progress from a running search
pub trait ProgressSink<S> {
    fn on_iteration(&mut self, _report: &IterationReport) {}

    fn on_solution(&mut self, _node: &Node<S>, _report: &SolutionReport) {}
}

/// Ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl<S> ProgressSink<S> for NoopSink {}

/// Logs progress through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl<S> ProgressSink<S> for LogSink {
    fn on_iteration(&mut self, report: &IterationReport) {
        debug!("Flash words (top {}): {:?}", report.flash_preview.len(), report.flash_preview);
        info!(
            "Iteration {} complete: frontier {}, pool {}, best score {} ({}) | visited {} | solutions {} | {:.1?}",
            report.iteration,
            report.frontier_size,
            report.expansion_pool_size,
            report.best_score_display,
            report.best_word,
            report.visited_count,
            report.solutions_found,
            report.elapsed
        );
    }

    fn on_solution(&mut self, _node: &Node<S>, report: &SolutionReport) {
        info!(
            "Solution #{} found at iteration {} (length {}): {}",
            report.ordinal, report.iteration, report.word_len, report.word
        );
    }
}

/// Wraps a closure called with every iteration report
pub struct FnSink<F>(pub F);

impl<S, F> ProgressSink<S> for FnSink<F>
where
    F: FnMut(&IterationReport),
{
    fn on_iteration(&mut self, report: &IterationReport) {
        (self.0)(report)
    }
}

/// Keeps every report in memory
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub iterations: Vec<IterationReport>,
    pub solutions: Vec<SolutionReport>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> ProgressSink<S> for CollectingSink {
    fn on_iteration(&mut self, report: &IterationReport) {
        self.iterations.push(report.clone());
    }

    fn on_solution(&mut self, _node: &Node<S>, report: &SolutionReport) {
        self.solutions.push(report.clone());
    }
}

/// Events forwarded by [`ChannelSink`]
#[derive(Debug, Clone)]
pub enum ProgressEvent<S> {
    Iteration(IterationReport),
    Solution(Node<S>),
}

/// Forwards progress over a channel.
///
/// Send failures (receiver dropped) are ignored; the search keeps running.
pub struct ChannelSink<S> {
    sender: Sender<ProgressEvent<S>>,
    forward_iterations: bool,
}

impl<S> ChannelSink<S> {
    pub fn new(sender: Sender<ProgressEvent<S>>) -> Self {
        Self {
            sender,
            forward_iterations: true,
        }
    }

    /// Forward solutions only
    pub fn solutions_only(sender: Sender<ProgressEvent<S>>) -> Self {
        Self {
            sender,
            forward_iterations: false,
        }
    }
}

impl<S: Clone> ProgressSink<S> for ChannelSink<S> {
    fn on_iteration(&mut self, report: &IterationReport) {
        if self.forward_iterations {
            let _ = self.sender.send(ProgressEvent::Iteration(report.clone()));
        }
    }

    fn on_solution(&mut self, node: &Node<S>, _report: &SolutionReport) {
        let _ = self.sender.send(ProgressEvent::Solution(node.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::word::{Alphabet, Word};
    use crossbeam_channel::unbounded;
    use std::sync::Arc;

    fn report(iteration: usize) -> IterationReport {
        IterationReport {
            iteration,
            frontier_size: 3,
            flash_size: 2,
            expansion_pool_size: 4,
            best_score: 1.0,
            best_score_display: "1.0000".to_string(),
            best_word: "a".to_string(),
            flash_preview: vec!["a".to_string()],
            visited_count: 10,
            solutions_found: 0,
            elapsed: Duration::from_millis(5),
        }
    }

    fn solution() -> (Node<i32>, SolutionReport) {
        let alphabet = Arc::new(Alphabet::from_inverse_pairs(&[("a", "A")], "."));
        let node = Node::new(7, Word::from_letters(&alphabet, vec![0, 0]), 0.0);
        let report = SolutionReport {
            iteration: 1,
            word: node.identifier(),
            word_len: 2,
            score_display: "0".to_string(),
            ordinal: 1,
        };
        (node, report)
    }

    #[test]
    fn test_collecting_sink() {
        let mut sink = CollectingSink::new();
        let (node, sol) = solution();
        ProgressSink::<i32>::on_iteration(&mut sink, &report(0));
        ProgressSink::<i32>::on_iteration(&mut sink, &report(1));
        sink.on_solution(&node, &sol);

        assert_eq!(sink.iterations.len(), 2);
        assert_eq!(sink.iterations[1].iteration, 1);
        assert_eq!(sink.solutions[0].word, "a.a");
    }

    #[test]
    fn test_fn_sink_calls_closure() {
        let mut seen = Vec::new();
        {
            let mut sink = FnSink(|r: &IterationReport| seen.push(r.iteration));
            ProgressSink::<i32>::on_iteration(&mut sink, &report(3));
            ProgressSink::<i32>::on_iteration(&mut sink, &report(4));
        }
        assert_eq!(seen, vec![3, 4]);
    }

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, rx) = unbounded();
        let mut sink = ChannelSink::new(tx);
        let (node, sol) = solution();
        sink.on_iteration(&report(0));
        sink.on_solution(&node, &sol);

        assert!(matches!(rx.recv().unwrap(), ProgressEvent::Iteration(r) if r.iteration == 0));
        match rx.recv().unwrap() {
            ProgressEvent::Solution(n) => assert_eq!(n.state, 7),
            _ => panic!("Unexpected event"),
        }
    }

    #[test]
    fn test_channel_sink_solutions_only() {
        let (tx, rx) = unbounded();
        let mut sink = ChannelSink::solutions_only(tx);
        let (node, sol) = solution();
        sink.on_iteration(&report(0));
        sink.on_solution(&node, &sol);

        assert!(matches!(rx.recv().unwrap(), ProgressEvent::Solution(_)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_ignores_dropped_receiver() {
        let (tx, rx) = unbounded::<ProgressEvent<i32>>();
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.on_iteration(&report(0));
    }
}
