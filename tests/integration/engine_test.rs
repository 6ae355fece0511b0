use flashbeam::problems::{CyclicProblem, MatrixProblem, QuaternionProblem};
use flashbeam::search::{
    Alphabet, CollectingSink, FlashBeam, FlashBeamConfig, FnSink, IterationReport, Node,
    NoopSink, SearchError, SearchProblem, SearchResult, Termination, VisitedPolicy, Word,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn z7() -> CyclicProblem {
    CyclicProblem::new(7).unwrap()
}

fn identifiers<S>(result: &SearchResult<S>) -> Vec<String> {
    result.solutions.iter().map(Node::identifier).collect()
}

fn reports<P: SearchProblem>(problem: P, config: FlashBeamConfig) -> Vec<IterationReport> {
    let mut sink = CollectingSink::new();
    FlashBeam::new(problem, config).solve_with(&mut sink).unwrap();
    sink.iterations
}

/// Reports without wall-clock fields
fn comparable(reports: &[IterationReport]) -> Vec<(usize, usize, usize, String, Vec<String>, usize)> {
    reports
        .iter()
        .map(|r| {
            (
                r.frontier_size,
                r.flash_size,
                r.expansion_pool_size,
                r.best_word.clone(),
                r.flash_preview.clone(),
                r.visited_count,
            )
        })
        .collect()
}

#[test]
fn test_cyclic_seven_finds_full_cycle() {
    let config = FlashBeamConfig::new(500, 50, 100, 1);
    let result = FlashBeam::new(z7(), config).solve_with(&mut NoopSink).unwrap();

    assert_eq!(result.termination, Termination::Solved);
    assert_eq!(result.solutions.len(), 1);

    let solution = &result.solutions[0];
    assert_eq!(solution.identifier(), "+1.+1.+1.+1.+1.+1.+1");
    assert_eq!(solution.word_len(), 7);
    assert_eq!(solution.state.lift, 7);
    assert_eq!(result.statistics.iterations, 3);
    // +1.-1 lands on residue 0 but cancels in Z
    assert!(result.statistics.trivial_solutions_rejected >= 1);
}

#[test]
fn test_search_is_deterministic() {
    let config = FlashBeamConfig::new(300, 20, 4, 5);
    let first = FlashBeam::new(MatrixProblem::long_reid(9).unwrap(), config.clone())
        .solve_with(&mut NoopSink)
        .unwrap();
    let second = FlashBeam::new(MatrixProblem::long_reid(9).unwrap(), config.clone())
        .solve_with(&mut NoopSink)
        .unwrap();

    assert_eq!(identifiers(&first), identifiers(&second));
    assert_eq!(first.termination, second.termination);
    assert_eq!(first.statistics.combinations, second.statistics.combinations);
    assert_eq!(first.statistics.visited_count, second.statistics.visited_count);

    let a = reports(MatrixProblem::long_reid(9).unwrap(), config.clone());
    let b = reports(MatrixProblem::long_reid(9).unwrap(), config);
    assert_eq!(comparable(&a), comparable(&b));
}

#[test]
fn test_frontier_and_flash_stay_bounded() {
    let config = FlashBeamConfig::new(40, 6, 5, 1);
    let long_reid = reports(MatrixProblem::long_reid(9).unwrap(), config.clone());
    let quaternion = reports(QuaternionProblem::su2_pair().unwrap(), config);

    for report in long_reid.iter().chain(quaternion.iter()) {
        assert!(report.frontier_size <= 40);
        assert!(report.flash_size <= 6);
        assert!(report.flash_preview.len() <= 5);
    }
    assert!(!long_reid.is_empty());
    assert!(!quaternion.is_empty());
}

#[test]
fn test_flash_preview_length() {
    let config = FlashBeamConfig::new(40, 6, 4, 1).with_preview_len(2);
    let reports = reports(MatrixProblem::long_reid(9).unwrap(), config);

    assert!(!reports.is_empty());
    for report in &reports {
        assert_eq!(report.flash_preview.len(), report.flash_size.min(2));
    }
}

#[test]
fn test_visited_grows_every_iteration() {
    let reports = reports(
        MatrixProblem::long_reid(9).unwrap(),
        FlashBeamConfig::new(30, 5, 5, 1),
    );
    for pair in reports.windows(2) {
        assert!(pair[1].visited_count > pair[0].visited_count);
    }
}

#[test]
fn test_solutions_are_valid_and_distinct() {
    let problem = z7();
    let config = FlashBeamConfig::new(500, 50, 100, 3);
    let result = FlashBeam::new(z7(), config).solve_with(&mut NoopSink).unwrap();

    assert_eq!(result.solutions.len(), 3);
    assert_eq!(result.statistics.solutions_found, 3);
    let mut keys = HashSet::new();
    for solution in &result.solutions {
        assert!(problem.is_solution(solution));
        assert!(problem.is_nontrivial(solution));
        assert!(keys.insert(problem.canonical_key(solution)));
    }
}

#[test]
fn test_early_exit_reports_exactly_max_solutions() {
    let mut sink = CollectingSink::new();
    let config = FlashBeamConfig::new(500, 50, 100, 2);
    let result = FlashBeam::new(z7(), config).solve_with(&mut sink).unwrap();

    assert_eq!(result.termination, Termination::Solved);
    assert_eq!(result.solutions.len(), 2);
    assert_eq!(sink.solutions.len(), 2);
    assert_eq!(sink.solutions[1].ordinal, 2);
}

#[test]
fn test_parallel_expansion_matches_serial() {
    let serial_config = FlashBeamConfig::new(200, 10, 4, 3);
    let parallel_config = serial_config.clone().with_threads(4);

    let serial = reports(MatrixProblem::long_reid(9).unwrap(), serial_config.clone());
    let parallel = reports(MatrixProblem::long_reid(9).unwrap(), parallel_config.clone());
    assert_eq!(comparable(&serial), comparable(&parallel));

    let serial = FlashBeam::new(z7(), serial_config.with_max_iterations(100))
        .solve_with(&mut NoopSink)
        .unwrap();
    let parallel = FlashBeam::new(z7(), parallel_config.with_max_iterations(100))
        .solve_with(&mut NoopSink)
        .unwrap();
    assert_eq!(identifiers(&serial), identifiers(&parallel));
    assert_eq!(serial.statistics.combinations, parallel.statistics.combinations);
}

#[test]
fn test_tie_break_seed_is_reproducible() {
    let config = FlashBeamConfig::new(20, 5, 6, 1).with_tie_break_seed(42);
    let a = reports(CyclicProblem::new(1009).unwrap(), config.clone());
    let b = reports(CyclicProblem::new(1009).unwrap(), config);
    assert_eq!(comparable(&a), comparable(&b));
}

#[test]
fn test_visited_limit_aborts() {
    let config =
        FlashBeamConfig::new(100, 10, 1000, 1).with_visited_policy(VisitedPolicy::Limit(200));
    let result = FlashBeam::new(CyclicProblem::new(100_003).unwrap(), config)
        .solve_with(&mut NoopSink)
        .unwrap();

    assert_eq!(result.termination, Termination::VisitedLimit);
    assert!(result.statistics.visited_count >= 200);
    assert!(result.solutions.is_empty());
}

#[test]
fn test_cancel_from_progress_sink() {
    let engine = FlashBeam::new(
        CyclicProblem::new(100_003).unwrap(),
        FlashBeamConfig::new(50, 10, 1000, 1),
    );
    let cancel = engine.cancel_flag();
    let mut sink = FnSink(|report: &IterationReport| {
        if report.iteration == 2 {
            cancel.cancel();
        }
    });

    let result = engine.solve_with(&mut sink).unwrap();
    assert_eq!(result.termination, Termination::Cancelled);
    assert_eq!(result.statistics.iterations, 3);
}

#[test]
fn test_zero_timeout() {
    let config = FlashBeamConfig::new(50, 10, 1000, 1).with_timeout(Duration::ZERO);
    let result = FlashBeam::new(z7(), config).solve_with(&mut NoopSink).unwrap();
    assert_eq!(result.termination, Termination::TimedOut);
    assert_eq!(result.statistics.iterations, 0);
}

/// A problem with a configurable (possibly broken) generator set
struct Broken {
    alphabet: Arc<Alphabet>,
    generators: Vec<Node<u8>>,
    root_score: f64,
}

impl Broken {
    fn new(generator_scores: &[f64]) -> Self {
        let alphabet = Arc::new(Alphabet::new(".").with_letter("g").with_letter("h"));
        let generators = generator_scores
            .iter()
            .enumerate()
            .map(|(idx, &score)| Node::new(idx as u8 + 1, Word::letter(&alphabet, idx as u16), score))
            .collect();
        Self {
            alphabet,
            generators,
            root_score: f64::INFINITY,
        }
    }
}

impl SearchProblem for Broken {
    type State = u8;
    type Key = u8;

    fn initial_node(&self) -> Node<u8> {
        Node::new(0, Word::empty(&self.alphabet), self.root_score)
    }

    fn generator_nodes(&self) -> Vec<Node<u8>> {
        self.generators.clone()
    }

    fn combine(&self, a: &Node<u8>, b: &Node<u8>) -> Node<u8> {
        Node::new(a.state.wrapping_add(b.state), a.word.concat(&b.word), 1.0)
    }

    fn canonical_key(&self, node: &Node<u8>) -> u8 {
        node.state
    }

    fn is_solution(&self, _node: &Node<u8>) -> bool {
        false
    }

    fn is_nontrivial(&self, _node: &Node<u8>) -> bool {
        true
    }
}

#[test]
fn test_contract_violations_fail_before_search() {
    let config = FlashBeamConfig::new(10, 2, 10, 1);

    let err = FlashBeam::new(Broken::new(&[]), config.clone())
        .solve_with(&mut NoopSink)
        .unwrap_err();
    assert_eq!(err, SearchError::EmptyGenerators);

    let err = FlashBeam::new(Broken::new(&[1.0, f64::NAN]), config.clone())
        .solve_with(&mut NoopSink)
        .unwrap_err();
    assert_eq!(
        err,
        SearchError::InvalidGeneratorScore {
            identifier: "h".to_string()
        }
    );

    let mut broken_root = Broken::new(&[1.0]);
    broken_root.root_score = f64::NAN;
    let err = FlashBeam::new(broken_root, config)
        .solve_with(&mut NoopSink)
        .unwrap_err();
    assert_eq!(err, SearchError::InvalidRootScore);
}

#[test]
fn test_finite_group_is_exhausted() {
    // u8 addition generated by 1 has 256 elements and no solutions
    let config = FlashBeamConfig::new(1000, 10, 1000, 1);
    let result = FlashBeam::new(Broken::new(&[1.0]), config)
        .solve_with(&mut NoopSink)
        .unwrap();

    assert_eq!(result.termination, Termination::Exhausted);
    assert_eq!(result.statistics.visited_count, 256);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_cyclic_reports_respect_bounds(
        modulus in 2u64..200,
        beam_width in 1usize..40,
        flash_size in 0usize..8,
    ) {
        let config = FlashBeamConfig::new(beam_width, flash_size, 6, 2);
        let mut sink = CollectingSink::new();
        let result = FlashBeam::new(CyclicProblem::new(modulus).unwrap(), config)
            .solve_with(&mut sink)
            .unwrap();

        prop_assert!(result.solutions.len() <= 2);
        for report in &sink.iterations {
            prop_assert!(report.frontier_size <= beam_width);
            prop_assert!(report.flash_size <= flash_size);
        }
        for solution in &result.solutions {
            prop_assert_eq!(solution.state.residue, 0);
            prop_assert!(solution.state.lift != 0);
        }
    }
}
