//! Messages between portfolio workers and the coordinator.

use crate::search::error::SearchOutcome;
use crate::search::node::Node;
use crate::search::progress::{ProgressSink, SolutionReport};
use crate::search::result::SearchResult;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Message sent from a worker to the coordinator.
#[derive(Debug, Clone)]
pub enum WorkerMessage<S> {
    /// Worker found a non-trivial solution.
    Solution { worker_id: usize, node: Node<S> },
    /// Worker's engine returned.
    Finished {
        worker_id: usize,
        outcome: SearchOutcome<SearchResult<S>>,
    },
}

/// Progress sink that streams a worker's solutions to the coordinator.
pub struct WorkerSink<S> {
    worker_id: usize,
    to_coordinator: Sender<WorkerMessage<S>>,
}

impl<S> WorkerSink<S> {
    pub fn new(worker_id: usize, to_coordinator: Sender<WorkerMessage<S>>) -> Self {
        Self {
            worker_id,
            to_coordinator,
        }
    }
}

impl<S: Clone> ProgressSink<S> for WorkerSink<S> {
    fn on_solution(&mut self, node: &Node<S>, _report: &SolutionReport) {
        // Coordinator may already be gone after a timeout
        let _ = self.to_coordinator.send(WorkerMessage::Solution {
            worker_id: self.worker_id,
            node: node.clone(),
        });
    }
}

/// Create one coordinator receiver and a sender per worker.
pub fn create_channels<S>(
    num_workers: usize,
) -> (Receiver<WorkerMessage<S>>, Vec<Sender<WorkerMessage<S>>>) {
    // Unbounded so workers never block on a slow coordinator
    let (worker_tx, coordinator_rx) = unbounded();
    let senders = (0..num_workers).map(|_| worker_tx.clone()).collect();
    (coordinator_rx, senders)
}
