//! FlashBeam: beam search with a persistent pool of best-ever nodes, for
//! finding relations (words evaluating to the identity) among generators of
//! a group.
//!
//! Domains plug in through [`SearchProblem`]; ready-made problems live in
//! [`problems`].

pub mod problems;
pub mod search;

pub use search::{
    FlashBeam, FlashBeamConfig, Node, SearchError, SearchProblem, SearchResult, Termination,
};
