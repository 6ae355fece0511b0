use flashbeam::problems::{CyclicProblem, MatrixProblem};
use flashbeam::search::{
    FlashBeamConfig, PortfolioConfig, SearchError, SearchProblem, Termination, run_portfolio,
};
use std::collections::HashSet;

#[test]
fn test_portfolio_collects_distinct_solutions() {
    let problem = CyclicProblem::new(7).unwrap();
    let config = FlashBeamConfig::new(500, 50, 100, 3);
    let portfolio = PortfolioConfig::default().with_workers(3).with_seed(11);

    let result = run_portfolio(&problem, &config, &portfolio).unwrap();

    assert!(result.found_solution());
    assert_eq!(result.solutions.len(), 3);
    let keys: HashSet<_> = result
        .solutions
        .iter()
        .map(|node| problem.canonical_key(node))
        .collect();
    assert_eq!(keys.len(), result.solutions.len());
    for node in &result.solutions {
        assert!(problem.is_solution(node));
        assert!(problem.is_nontrivial(node));
    }

    assert_eq!(result.worker_results.len(), 3);
    let seeds: Vec<_> = result.worker_results.iter().map(|w| w.seed).collect();
    assert_eq!(seeds, vec![Some(11), Some(12), Some(13)]);
}

#[test]
fn test_portfolio_statistics_sum_workers() {
    let problem = MatrixProblem::long_reid(9).unwrap();
    let config = FlashBeamConfig::new(50, 5, 3, 1);
    let portfolio = PortfolioConfig::default().with_workers(2);

    let result = run_portfolio(&problem, &config, &portfolio).unwrap();
    let total = result.total_statistics();

    let combinations: u64 = result
        .worker_results
        .iter()
        .filter_map(|w| w.outcome.as_ref().ok())
        .map(|r| r.statistics.combinations)
        .sum();
    assert_eq!(total.combinations, combinations);
    for worker in &result.worker_results {
        let outcome = worker.outcome.as_ref().unwrap();
        assert!(matches!(
            outcome.termination,
            Termination::Solved | Termination::BudgetExceeded | Termination::Cancelled
        ));
    }
}

#[test]
fn test_portfolio_rejects_invalid_config() {
    let problem = CyclicProblem::new(5).unwrap();
    let config = FlashBeamConfig::new(0, 5, 3, 1);
    let err = run_portfolio(&problem, &config, &PortfolioConfig::default()).unwrap_err();
    assert!(matches!(err, SearchError::InvalidConfig(_)));
}
