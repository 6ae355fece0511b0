//! The FlashBeam search engine
//!
//! This module provides a generic beam search over words in a group's
//! generators, plus the pieces it is built from:
//! - [`SearchProblem`]: the contract a domain implements
//! - [`FlashBeam`]: the engine, with serial or rayon-parallel expansion
//! - [`FlashPool`]: the bounded pool of best-ever nodes reused as macro steps
//! - [`parallel`]: portfolio runs of several engines with different seeds

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod flash;
pub mod frontier;
pub mod node;
pub mod parallel;
pub mod problem;
pub mod progress;
pub mod result;
pub mod word;

pub use cancel::CancelFlag;
pub use config::{FlashBeamConfig, VisitedPolicy};
pub use engine::FlashBeam;
pub use error::{SearchError, SearchOutcome};
pub use flash::FlashPool;
pub use node::Node;
pub use parallel::{PortfolioConfig, PortfolioResult, run_portfolio};
pub use problem::SearchProblem;
pub use progress::{
    ChannelSink, CollectingSink, FnSink, IterationReport, LogSink, NoopSink, ProgressEvent,
    ProgressSink, SolutionReport,
};
pub use result::{SearchResult, SearchStatistics, Termination};
pub use word::{Alphabet, Letter, Word};
