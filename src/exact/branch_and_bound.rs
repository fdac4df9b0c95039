use std::time::Instant;

use log::{debug, info};

use crate::{
    algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm},
    graph::*,
    utils::Solution,
};

/// # Exhaustive branch-and-bound subset search
///
/// Verifies or improves a known upper bound on the minimum-weight spanning
/// strongly connected subgraph by enumerating edge subsets of increasing
/// size. Edges are pre-sorted by ascending weight; for each candidate size m
/// from n up to min(2n, edge count), the search walks index-increasing
/// combinations depth first, so partial sums grow incrementally and every
/// continuation of a pruned prefix is at least as heavy.
///
/// Pruning: once a partial weight exceeds the best known total, the current
/// position and all higher indices at this level are abandoned (the edge
/// ordering guarantees no suffix can reduce the sum). A complete combination
/// is accepted only if every node was covered as a target and the induced
/// subgraph passes the single-SCC oracle; equal-weight solutions replace the
/// incumbent, so the last tie found wins.
///
/// The subset-size cap is justified by minimality: a spanning strongly
/// connected subgraph needs at least one outgoing edge per node, and a
/// minimal one never needs more than two per node.
///
/// One [`IterativeAlgorithm::execute_step`] performs the full enumeration for
/// a single subset size. The search also completes as soon as its bound
/// reaches the circuit lower bound of the graph, which certifies optimality
/// without exhausting the remaining sizes.
pub struct BranchAndBound<'a> {
    graph: &'a Graph,

    /// All edges sorted ascending by weight; combination indices refer to
    /// this ordering
    edges: Vec<Edge>,
    /// Per edge, the dense indices of (source, target)
    endpoints: Vec<(NodeIndex, NodeIndex)>,

    n: usize,
    max_edges: usize,
    /// Subset size handled by the next step
    current_size: usize,

    best_weight: Weight,
    /// Indices (into `edges`) of the best feasible subset found by this
    /// search; None while only the caller-supplied bound stands
    best: Option<Vec<usize>>,

    lower_bound: Weight,

    scc: SccCheck,

    // scratch carried through the recursion instead of per-level allocations
    chosen: Vec<usize>,
    covered: Vec<NumNodes>,
    covered_count: usize,
    endpoint_buf: Vec<(NodeIndex, NodeIndex)>,
}

impl<'a> BranchAndBound<'a> {
    /// `initial_bound` seeds the pruning threshold, typically with the weight
    /// of a heuristic solution; candidates of exactly that weight are still
    /// accepted.
    pub fn new(graph: &'a Graph, initial_bound: Option<Weight>) -> Self {
        let mut edges: Vec<Edge> = graph.edges().collect();
        edges.sort_by_key(Edge::by_weight);

        let endpoints = edges
            .iter()
            .map(|e| (graph.index_of(e.source), graph.index_of(e.target)))
            .collect();

        let n = graph.len();
        let max_edges = edges.len().min(2 * n);

        Self {
            graph,
            endpoints,
            n,
            max_edges,
            current_size: n,
            best_weight: initial_bound.unwrap_or(INFINITY),
            best: None,
            lower_bound: graph.circuit_lower_bound(),
            scc: SccCheck::new(n as NumNodes),
            chosen: vec![0; max_edges],
            covered: vec![0; n],
            covered_count: 0,
            endpoint_buf: Vec::with_capacity(max_edges),
            edges,
        }
    }

    pub fn best_weight(&self) -> Weight {
        self.best_weight
    }

    fn search(&mut self, m: usize, level: usize, weight: Weight, start: usize) {
        let end = self.edges.len() - (m - level);

        for i in start..=end {
            let w = weight + self.edges[i].weight;
            if w > self.best_weight {
                // edges are weight-sorted: every later start is heavier
                return;
            }

            self.chosen[level] = i;
            let target = self.endpoints[i].1 as usize;
            self.covered[target] += 1;
            self.covered_count += (self.covered[target] == 1) as usize;

            if level + 1 == m {
                if self.covered_count == self.n && self.is_candidate_feasible(m) {
                    debug!("feasible subset {:?} w={w}", &self.chosen[..m]);
                    self.best_weight = w;
                    self.best = Some(self.chosen[..m].to_vec());
                }
            } else {
                self.search(m, level + 1, w, i + 1);
            }

            self.covered[target] -= 1;
            self.covered_count -= (self.covered[target] == 0) as usize;
        }
    }

    fn is_candidate_feasible(&mut self, len: usize) -> bool {
        self.endpoint_buf.clear();
        self.endpoint_buf
            .extend(self.chosen[..len].iter().map(|&i| self.endpoints[i]));

        self.scc.is_single_scc(&self.endpoint_buf)
    }
}

impl IterativeAlgorithm<Solution> for BranchAndBound<'_> {
    fn execute_step(&mut self) {
        let m = self.current_size;
        debug!("trying {m} edges...");

        let start = Instant::now();
        self.search(m, 0, 0, 0);
        debug!("size {m} done, elapsed = {:?}", start.elapsed());

        self.current_size += 1;

        if self.is_completed() {
            info!(
                "exhaustive search finished, best weight = {}",
                self.best_weight
            );
        }
    }

    fn is_completed(&self) -> bool {
        self.n == 0
            || self.current_size > self.max_edges
            || (self.best.is_some() && self.best_weight <= self.lower_bound)
    }

    fn best_known_solution(&mut self) -> Option<Solution> {
        let best = self.best.as_ref()?;
        Some(Solution::new(best.iter().map(|&i| self.edges[i]).collect()))
    }
}

impl TerminatingIterativeAlgorithm<Solution> for BranchAndBound<'_> {}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{
        graph::random::random_strongly_connected, heuristic::SegmentPermutationSearch,
        testing::brute_force_best_weight,
    };

    fn triangle() -> Graph {
        let mut graph = Graph::new();
        graph.add_edges([
            Edge::new(1, 10, 20, 1),
            Edge::new(2, 20, 30, 1),
            Edge::new(3, 30, 10, 1),
        ]);
        graph
    }

    #[test]
    fn solves_triangle() {
        let graph = triangle();
        let mut search = BranchAndBound::new(&graph, None);

        let solution = search.run_to_completion().unwrap();
        assert_eq!(solution.total_weight(), 3);
        assert_eq!(
            solution
                .edges()
                .iter()
                .map(|e| e.name)
                .sorted()
                .collect_vec(),
            vec![1, 2, 3]
        );
        assert!(solution.is_valid(&graph));
    }

    #[test]
    fn forced_expensive_edge() {
        // node 4 is only reachable via the expensive edge 4, which every
        // feasible solution must therefore contain
        let mut graph = Graph::new();
        graph.add_edges([
            Edge::new(1, 1, 2, 1),
            Edge::new(2, 2, 3, 1),
            Edge::new(3, 3, 1, 2),
            Edge::new(4, 3, 4, 50),
            Edge::new(5, 4, 1, 1),
        ]);

        let mut search = BranchAndBound::new(&graph, None);
        let solution = search.run_to_completion().unwrap();

        assert_eq!(solution.total_weight(), 53);
        assert!(solution.edges().iter().any(|e| e.name == 4));
        assert!(solution.is_valid(&graph));
    }

    #[test]
    fn never_fewer_than_n_edges() {
        let mut rng = Pcg64Mcg::seed_from_u64(99);

        for _ in 0..10 {
            let graph = random_strongly_connected(&mut rng, 5, 4, 10);
            let mut search = BranchAndBound::new(&graph, None);

            let solution = search.run_to_completion().unwrap();
            assert!(solution.len() >= graph.len());
            assert!(solution.is_valid(&graph));
        }
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = Pcg64Mcg::seed_from_u64(0xabcd);

        for n in 3..6u32 {
            for _ in 0..5 {
                let graph = random_strongly_connected(&mut rng, n, 4, 15);
                let expected = brute_force_best_weight(&graph).unwrap();

                let mut search = BranchAndBound::new(&graph, None);
                let solution = search.run_to_completion().unwrap();

                assert_eq!(solution.total_weight(), expected);
                assert!(search.best_weight() >= graph.circuit_lower_bound());
            }
        }
    }

    #[test]
    fn heuristic_bound_preserves_optimality() {
        let mut rng = Pcg64Mcg::seed_from_u64(2024);

        for _ in 0..5 {
            let graph = random_strongly_connected(&mut rng, 6, 6, 20);

            let heuristic_weight = {
                let mut search = SegmentPermutationSearch::new(&graph, [4, 3, 2], &mut rng);
                search.run_to_completion().unwrap().total_weight()
            };

            let unseeded = BranchAndBound::new(&graph, None)
                .run_to_completion()
                .unwrap()
                .total_weight();

            let mut seeded = BranchAndBound::new(&graph, Some(heuristic_weight));
            let seeded_best = seeded
                .run_to_completion()
                .map_or(heuristic_weight, |s| s.total_weight());

            assert!(unseeded <= heuristic_weight);
            assert_eq!(seeded_best, unseeded);
        }
    }

    #[test]
    fn tiny_instances() {
        use crate::io::GraphEdgeListReader;

        let files = glob::glob("instances/tiny/*.txt")
            .expect("Failed to glob")
            .map(|r| r.expect("Failed to access globbed path"))
            .collect_vec();
        assert!(!files.is_empty());

        let mut rng = Pcg64Mcg::seed_from_u64(123);

        for file in files {
            let graph = Graph::try_read_edges_file(&file).expect("Cannot read instance");
            let expected = brute_force_best_weight(&graph).unwrap();

            let heuristic_solution = {
                let mut search = SegmentPermutationSearch::new(&graph, [5, 4, 3, 2], &mut rng);
                search.run_to_completion().unwrap()
            };
            assert!(heuristic_solution.is_valid(&graph), "file: {file:?}");
            assert!(
                heuristic_solution.total_weight() >= expected,
                "file: {file:?}"
            );

            let mut search =
                BranchAndBound::new(&graph, Some(heuristic_solution.total_weight()));
            let best = search
                .run_to_completion()
                .map_or(heuristic_solution.total_weight(), |s| s.total_weight());

            assert_eq!(best, expected, "file: {file:?}");
        }
    }

    #[test]
    fn known_optimum_of_shipped_instances() {
        use crate::io::GraphEdgeListReader;

        let graph = Graph::try_read_edges_file("instances/tiny/expensive_link.txt").unwrap();
        let solution = BranchAndBound::new(&graph, None)
            .run_to_completion()
            .unwrap();

        assert_eq!(solution.total_weight(), 53);
        assert!(solution.edges().iter().any(|e| e.name == 4));
    }

    #[test]
    fn stops_at_lower_bound_certificate() {
        // uniform cycle: the circuit lower bound is tight, so the first size
        // already certifies optimality
        let graph = triangle();
        let mut search = BranchAndBound::new(&graph, None);

        search.execute_step();
        assert!(search.is_completed());
        assert_eq!(search.best_weight(), 3);
    }
}
