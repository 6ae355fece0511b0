use clap::{Parser, Subcommand};
use flashbeam::problems::{CyclicProblem, Exact, MatrixProblem, QuaternionProblem};
use flashbeam::search::{
    FlashBeam, FlashBeamConfig, Node, PortfolioConfig, SearchProblem, SearchStatistics,
    VisitedPolicy, run_portfolio,
};
use log::info;
use std::time::Duration;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "flashbeam")]
#[command(about = "flashbeam - relation search with beam search and a persistent flash pool")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every search command
#[derive(clap::Args, Debug, Clone)]
struct SearchArgs {
    /// Number of nodes kept in the frontier each iteration
    #[arg(long, default_value = "5000")]
    beam_width: usize,
    /// Number of best-ever nodes reused as macro steps
    #[arg(long, default_value = "50")]
    flash_size: usize,
    /// Maximum number of iterations
    #[arg(long, default_value = "1000")]
    max_iterations: usize,
    /// Stop after this many solutions
    #[arg(long, default_value = "1")]
    max_solutions: usize,
    /// Expansion threads per engine (0 = all cores)
    #[arg(long, default_value = "1")]
    threads: usize,
    /// Tie-break seed (base seed for a portfolio)
    #[arg(long)]
    seed: Option<u64>,
    /// Timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Stop once this many states were visited (e.g. 5000000 or limit:5_000_000)
    #[arg(long)]
    visited_limit: Option<VisitedPolicy>,
    /// Number of flash words shown in verbose progress output
    #[arg(long, default_value = "5")]
    preview_len: usize,
    /// Run a portfolio of this many engines with different seeds
    #[arg(long, default_value = "1")]
    workers: usize,
    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

impl SearchArgs {
    fn to_config(&self) -> FlashBeamConfig {
        FlashBeamConfig::new(
            self.beam_width,
            self.flash_size,
            self.max_iterations,
            self.max_solutions,
        )
        .with_threads(self.threads)
        .with_timeout_option(self.timeout())
        .with_tie_break_seed_option(self.seed)
        .with_visited_policy(self.visited_limit.unwrap_or_default())
        .with_preview_len(self.preview_len)
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search for relations in the cyclic group Z/n
    Cyclic {
        /// Order of the group
        #[arg(long, default_value = "7")]
        modulus: u64,
        /// Reject solutions with at most this many letters
        #[arg(long, default_value = "0")]
        trivial_len: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Search for relations in the Long-Reid group with parameter t
    LongReid {
        /// Group parameter
        #[arg(long, default_value = "9")]
        t: i64,
        /// Identify M with -M
        #[arg(long)]
        sign_projective: bool,
        /// Reject solutions with |trace| <= 2 and at most this many letters
        #[arg(long, default_value = "10")]
        trivial_len: usize,
        /// Subword to exclude (repeatable), e.g. "a . b . ai"
        #[arg(long = "forbid")]
        forbidden: Vec<String>,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Search for relations between two integer quaternions in SU(2)
    Quaternion {
        /// Reject solutions with at most this many letters
        #[arg(long, default_value = "8")]
        trivial_len: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Evaluate a Long-Reid word and print its matrix
    Verify {
        /// Word to evaluate, e.g. "a . b . ai . bi"
        word: String,
        /// Group parameter
        #[arg(long, default_value = "9")]
        t: i64,
    },
}

// --- Search Commands ---

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run_search<P: SearchProblem>(
    problem: P,
    args: &SearchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config();

    println!("Searching for relations in {}", problem.name());
    println!("  Beam width: {}", config.beam_width);
    println!("  Flash size: {}", config.flash_size);
    println!("  Max iterations: {}", config.max_iterations);
    println!("  Max solutions: {}", config.max_solutions);
    println!("  Visited policy: {}", config.visited_policy);
    if let Some(seed) = args.seed {
        println!("  Seed: {}", seed);
    }

    if args.workers > 1 {
        println!("  Workers: {}", args.workers);

        let portfolio = PortfolioConfig::default()
            .with_workers(args.workers)
            .with_seed_option(args.seed)
            .with_timeout_option(args.timeout());
        let result = run_portfolio(&problem, &config, &portfolio)?;

        println!();
        if result.found_solution() {
            println!("Found {} distinct solution(s):", result.solutions.len());
            for node in &result.solutions {
                print_solution(&problem, node);
            }
        } else {
            println!("No solution found.");
        }
        for worker in &result.worker_results {
            match &worker.outcome {
                Ok(outcome) => println!(
                    "  Worker {} (seed {:?}): {}",
                    worker.worker_id, worker.seed, outcome.termination
                ),
                Err(e) => println!("  Worker {} failed: {}", worker.worker_id, e),
            }
        }
        print_search_statistics(&result.total_statistics());
    } else {
        let engine = FlashBeam::new(problem, config);
        let result = engine.solve()?;

        println!();
        if result.found_solution() {
            println!(
                "Found {} solution(s) ({}):",
                result.solutions.len(),
                result.termination
            );
            for node in &result.solutions {
                print_solution(engine.problem(), node);
            }
        } else {
            println!("No solution found ({}).", result.termination);
        }
        print_search_statistics(&result.statistics);
    }

    Ok(())
}

fn print_solution<P: SearchProblem>(problem: &P, node: &Node<P::State>) {
    println!(
        "  [{}] {}  (score: {})",
        node.word_len(),
        node.identifier(),
        problem.format_score(node)
    );
}

fn print_search_statistics(stats: &SearchStatistics) {
    println!("\nSearch Statistics:");
    for line in stats.format_summary().lines() {
        println!("  {}", line);
    }
}

fn verify_long_reid_word(t: i64, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let problem = MatrixProblem::long_reid(t as i128)?;
    let word = problem.parse_word(text)?;
    let reduced = word.reduced();

    println!("Group: {}", problem.name());
    println!("Word: {} (length {})", word, word.len());
    if reduced.len() != word.len() {
        println!("Reduced: {} (length {})", reduced, reduced.len());
    }

    let state = problem.evaluate(&word)?;
    let values = match &state {
        Exact::Value(values) => *values,
        Exact::Overflow => return Err("Arithmetic overflow while evaluating word".into()),
    };
    let node = Node::new(state, word, 0.0);
    let trace = values
        .matrix
        .checked_trace()
        .ok_or("Arithmetic overflow computing trace")?;

    println!("Matrix: {}", values.matrix);
    println!(
        "Determinant: {} ({})",
        values.det,
        problem.format_score(&node)
    );
    println!("Trace: {}", trace);
    if values.matrix.is_scalar() {
        println!("Relation: yes (projectively the identity)");
    } else if problem.is_solution(&node) {
        println!("Relation: no (|det| = 1, but not scalar)");
    } else {
        println!("Relation: no");
    }

    Ok(())
}

fn run_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Cyclic {
            modulus,
            trivial_len,
            search,
        } => {
            init_logging(search.verbose);
            let problem = CyclicProblem::new(modulus)?.with_trivial_len(trivial_len);
            run_search(problem, &search)
        }
        Commands::LongReid {
            t,
            sign_projective,
            trivial_len,
            forbidden,
            search,
        } => {
            init_logging(search.verbose);
            info!("Building Long-Reid group with t = {}", t);
            let mut problem = MatrixProblem::long_reid(t as i128)?
                .with_sign_projective(sign_projective)
                .with_trivial_len(trivial_len);
            for subword in &forbidden {
                problem = problem.with_forbidden_subword(subword)?;
            }
            run_search(problem, &search)
        }
        Commands::Quaternion {
            trivial_len,
            search,
        } => {
            init_logging(search.verbose);
            let problem = QuaternionProblem::su2_pair()?.with_trivial_len(trivial_len);
            run_search(problem, &search)
        }
        Commands::Verify { word, t } => {
            init_logging(false);
            verify_long_reid_word(t, &word)
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run_command(args.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
