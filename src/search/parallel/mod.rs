//! Portfolio search: several FlashBeam engines on one problem.
//!
//! Each worker runs a full engine with its own tie-break seed. Workers differ
//! only in how equal scores are ordered.
//!
//! # Architecture
//!
//! - A **coordinator** on the calling thread collects solutions and
//!   deduplicates them by canonical key
//! - **Workers** on scoped threads stream solutions through a channel
//! - A shared **cancel flag** stops every worker once enough solutions arrived
//!   or the portfolio timeout elapsed
//!
//! # Example
//!
//! ```ignore
//! use flashbeam::search::parallel::{PortfolioConfig, run_portfolio};
//!
//! let portfolio = PortfolioConfig::default()
//!     .with_workers(4)
//!     .with_seed(7)
//!     .with_timeout(Duration::from_secs(60));
//!
//! let result = run_portfolio(&problem, &config, &portfolio)?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;

pub use config::PortfolioConfig;
pub use coordinator::{PortfolioResult, WorkerResult, run_portfolio};
