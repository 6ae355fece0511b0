//! Errors raised before a search starts

use thiserror::Error;

/// Problem-contract violations and invalid configuration.
///
/// A search that runs and finds nothing is not an error; it returns a
/// [`SearchResult`](crate::search::SearchResult) with no solutions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Problem supplied no generators")]
    EmptyGenerators,

    #[error("Generator '{identifier}' has a NaN score")]
    InvalidGeneratorScore { identifier: String },

    #[error("Initial node has a NaN score")]
    InvalidRootScore,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build expansion thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for search operations
pub type SearchOutcome<T> = Result<T, SearchError>;
