use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::Context;
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use scspan::{
    exact::BranchAndBound,
    graph::Graph,
    heuristic::SegmentPermutationSearch,
    log::build_logger_for_level,
    prelude::*,
    utils::Solution,
};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Opts {
    /// Input edge list; stdin if omitted
    #[structopt(short = "i", long)]
    input: Option<PathBuf>,

    /// Output file; stdout if omitted
    #[structopt(short = "o", long)]
    output: Option<PathBuf>,

    /// Wall-clock budget in seconds for the exhaustive phase; unlimited if
    /// omitted
    #[structopt(short = "T", long)]
    timeout: Option<f64>,

    /// Skip the heuristic warm start and search without an initial bound
    #[structopt(long)]
    no_warm_start: bool,

    /// Seed of the heuristic's random source
    #[structopt(short = "s", long, default_value = "123")]
    seed: u64,

    /// Segment sizes for the heuristic warm start, largest first
    #[structopt(short = "k", long, use_delimiter = true, default_value = "5,4,3,2")]
    segment_sizes: Vec<usize>,
}

fn load_graph(path: &Option<PathBuf>) -> anyhow::Result<Graph> {
    if let Some(path) = path {
        Graph::try_read_edges_file(path).with_context(|| format!("reading {}", path.display()))
    } else {
        let stdin = std::io::stdin().lock();
        Ok(Graph::try_read_edges(stdin)?)
    }
}

fn write_solution(solution: &Solution, path: &Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = path {
        let writer = std::io::BufWriter::new(File::create(path)?);
        solution.write(writer)
    } else {
        solution.write(std::io::stdout())
    }
}

fn main() -> anyhow::Result<()> {
    build_logger_for_level(log::LevelFilter::Info);

    let opts = Opts::from_args();
    let graph = load_graph(&opts.input)?;
    anyhow::ensure!(!graph.is_empty(), "input contains no edges");

    info!(
        "loaded graph with {} nodes, {} edges; circuit lower bound = {}",
        graph.number_of_nodes(),
        graph.number_of_edges(),
        graph.circuit_lower_bound()
    );

    // the heuristic's upper bound seeds the pruning threshold
    let warm_start = if opts.no_warm_start {
        None
    } else {
        let mut rng = Pcg64Mcg::seed_from_u64(opts.seed);
        let mut search =
            SegmentPermutationSearch::new(&graph, opts.segment_sizes.iter().copied(), &mut rng);
        let solution = search.run_to_completion();

        if let Some(solution) = &solution {
            info!("heuristic upper bound = {}", solution.total_weight());
        }
        solution
    };

    let mut search = BranchAndBound::new(&graph, warm_start.as_ref().map(Solution::total_weight));

    let improved = if let Some(seconds) = opts.timeout {
        search.run_until_timeout(Duration::from_secs_f64(seconds));
        search.best_known_solution()
    } else {
        search.run_to_completion()
    };

    // fall back to the warm start if the exhaustive phase could not beat it
    let best = improved.or(warm_start);
    anyhow::ensure!(
        best.as_ref().is_some_and(|s| s.is_valid(&graph)),
        "no feasible solution found"
    );

    write_solution(&best.unwrap(), &opts.output)?;

    Ok(())
}
