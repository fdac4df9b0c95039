use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::Context;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use scspan::{
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

    /// Wall-clock budget in seconds; run to completion if omitted
    #[structopt(short = "T", long)]
    timeout: Option<f64>,

    /// Seed of the random source; fixed default for reproducible runs
    #[structopt(short = "s", long, default_value = "123")]
    seed: u64,

    /// Segment sizes tried in order, largest first
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

    log::info!(
        "loaded graph with {} nodes, {} edges; circuit lower bound = {}",
        graph.number_of_nodes(),
        graph.number_of_edges(),
        graph.circuit_lower_bound()
    );

    let mut rng = Pcg64Mcg::seed_from_u64(opts.seed);
    let mut search =
        SegmentPermutationSearch::new(&graph, opts.segment_sizes.iter().copied(), &mut rng);

    let solution = if let Some(seconds) = opts.timeout {
        search.run_until_timeout(Duration::from_secs_f64(seconds));
        search.best_known_solution()
    } else {
        search.run_to_completion()
    };

    if let Some(solution) = solution {
        log::info!("tour weight = {}", search.tour_weight());
        write_solution(&solution, &opts.output)?;
    }

    Ok(())
}
