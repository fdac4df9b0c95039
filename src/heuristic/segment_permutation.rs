use std::collections::VecDeque;

use fxhash::FxHashSet;
use itertools::Itertools;
use log::debug;
use rand::{Rng, seq::SliceRandom, seq::index::sample};

use crate::{
    algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm},
    graph::*,
    utils::Solution,
};

/// Number of consecutive unimproved segment choices before the search gives
/// up on the current segment size and moves to the next one
const STAGNATION_LIMIT: u32 = 10_000;

/// Segment choices tried per [`IterativeAlgorithm::execute_step`]
const ATTEMPTS_PER_STEP: u32 = 256;

/// # Segment-permutation local search
///
/// Maintains a closed tour visiting every node once, scored as the sum of
/// pairwise shortest-path distances between consecutive tour positions
/// (including the wrap-around). Starting from a uniformly random tour, each
/// attempt picks K distinct positions uniformly at random and tries every
/// non-identity permutation of their occupants; a candidate replaces the
/// incumbent only on strict improvement.
///
/// The segment sizes K are supplied by the caller and processed front to
/// back (largest first by convention, e.g. 5,4,3,2): small random
/// perturbations escape local optima without the combinatorial cost of full
/// tour enumeration, and shrinking K performs a coarse-to-fine search. A size
/// exceeding the node count is skipped. After [`STAGNATION_LIMIT`] attempts
/// without improvement the next size is tried; the search terminates once the
/// queue is exhausted.
///
/// The final tour is expanded back into real graph edges by routing every
/// consecutive tour pair through its reconstructed shortest path and
/// collecting the distinct edges used.
///
/// Reproducibility: all randomness is drawn from the rng handed to the
/// constructor, so identical input, segment sizes and rng state reproduce
/// identical runs.
pub struct SegmentPermutationSearch<'a, R: Rng> {
    graph: &'a Graph,
    shortest_paths: ShortestPaths,
    rng: &'a mut R,

    /// Current tour as a permutation of all node indices
    tour: Vec<NodeIndex>,
    /// Weight of `tour` under the shortest-path matrix
    tour_weight: Weight,

    /// Remaining segment sizes, processed front to back
    segment_sizes: VecDeque<usize>,
    current_size: Option<usize>,
    /// Consecutive attempts without improvement at the current size
    stagnation: u32,

    /// Scratch tour rebuilt for every candidate permutation
    candidate: Vec<NodeIndex>,

    completed: bool,
}

impl<'a, R: Rng> SegmentPermutationSearch<'a, R> {
    pub fn new(
        graph: &'a Graph,
        segment_sizes: impl IntoIterator<Item = usize>,
        rng: &'a mut R,
    ) -> Self {
        let shortest_paths = ShortestPaths::new(graph);

        let mut tour: Vec<NodeIndex> = (0..graph.number_of_nodes()).collect();
        tour.shuffle(rng);

        let tour_weight = Self::weight_of(&shortest_paths, &tour);
        debug!("initial tour weight = {tour_weight}");

        Self {
            graph,
            shortest_paths,
            rng,
            candidate: tour.clone(),
            tour,
            tour_weight,
            segment_sizes: segment_sizes.into_iter().collect(),
            current_size: None,
            stagnation: STAGNATION_LIMIT,
            completed: false,
        }
    }

    /// Weight of the current tour under the shortest-path matrix
    pub fn tour_weight(&self) -> Weight {
        self.tour_weight
    }

    fn weight_of(shortest_paths: &ShortestPaths, tour: &[NodeIndex]) -> Weight {
        let mut weight: Weight = 0;
        for i in 0..tour.len() {
            let j = (i + 1) % tour.len();
            weight = weight.saturating_add(shortest_paths.distance(tour[i], tour[j]));
        }
        weight
    }

    /// Pops segment sizes until one fits the node count; false if exhausted
    fn advance_segment_size(&mut self) -> bool {
        while let Some(k) = self.segment_sizes.pop_front() {
            if k > self.tour.len() {
                continue;
            }
            debug!("K = {k}");
            self.current_size = Some(k);
            self.stagnation = 0;
            return true;
        }
        false
    }

    /// One attempt: choose K random positions and try all non-identity
    /// permutations of their occupants
    fn try_random_segment(&mut self, k: usize) {
        let positions = sample(self.rng, self.tour.len(), k).into_vec();

        for perm in (0..k).permutations(k).skip(1) {
            self.candidate.clear();
            self.candidate.extend_from_slice(&self.tour);
            for (i, &p) in perm.iter().enumerate() {
                self.candidate[positions[i]] = self.tour[positions[p]];
            }

            let weight = Self::weight_of(&self.shortest_paths, &self.candidate);
            if weight < self.tour_weight {
                debug!("better weight = {weight}");
                std::mem::swap(&mut self.tour, &mut self.candidate);
                self.tour_weight = weight;
                self.stagnation = 0;
            }
        }
    }

    /// Expands the tour into the distinct real edges along its shortest-path
    /// routing; None if some consecutive pair is unreachable
    fn expand_tour(&self) -> Option<Solution> {
        let n = self.tour.len();
        if n == 0 {
            return None;
        }

        let mut route = vec![self.tour[0]];
        for i in 0..n {
            let j = (i + 1) % n;
            let leg = self.shortest_paths.path(self.tour[i], self.tour[j]);
            if leg.is_empty() {
                return None;
            }
            route.extend_from_slice(&leg[1..]);
        }

        let mut seen: FxHashSet<EdgeName> = FxHashSet::default();
        let mut edges = Vec::new();
        for (&a, &b) in route.iter().tuple_windows() {
            // consecutive routed nodes are joined by a direct edge
            let edge = self
                .graph
                .edge_between(self.graph.node(a), self.graph.node(b))
                .unwrap();
            if seen.insert(edge.name) {
                edges.push(edge);
            }
        }

        Some(Solution::new(edges))
    }
}

impl<R: Rng> IterativeAlgorithm<Solution> for SegmentPermutationSearch<'_, R> {
    fn execute_step(&mut self) {
        for _ in 0..ATTEMPTS_PER_STEP {
            if self.current_size.is_none() || self.stagnation >= STAGNATION_LIMIT {
                if !self.advance_segment_size() {
                    self.completed = true;
                    return;
                }
            }

            self.stagnation += 1;
            let k = self.current_size.unwrap();
            self.try_random_segment(k);
        }
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn best_known_solution(&mut self) -> Option<Solution> {
        self.expand_tour()
    }
}

impl<R: Rng> TerminatingIterativeAlgorithm<Solution> for SegmentPermutationSearch<'_, R> {}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::graph::random::random_strongly_connected;

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
        let mut rng = Pcg64Mcg::seed_from_u64(123);
        let mut search = SegmentPermutationSearch::new(&graph, [5, 4, 3, 2], &mut rng);

        let solution = search.run_to_completion().unwrap();
        assert_eq!(solution.total_weight(), 3);
        assert_eq!(solution.len(), 3);
        assert!(solution.is_valid(&graph));
    }

    #[test]
    fn oversized_segments_are_skipped() {
        let graph = triangle();
        let mut rng = Pcg64Mcg::seed_from_u64(123);
        let mut search = SegmentPermutationSearch::new(&graph, [10, 2], &mut rng);

        let solution = search.run_to_completion().unwrap();
        assert_eq!(solution.total_weight(), 3);
    }

    #[test]
    fn never_worse_than_initial_tour() {
        let mut rng = Pcg64Mcg::seed_from_u64(0xfeed);

        for n in [5u32, 8, 12] {
            let graph = random_strongly_connected(&mut rng, n, n, 25);
            let mut search = SegmentPermutationSearch::new(&graph, [4, 3, 2], &mut rng);
            let initial = search.tour_weight();

            search.run_to_completion().unwrap();
            assert!(search.tour_weight() <= initial);
        }
    }

    #[test]
    fn deterministic_under_fixed_seed() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let graph = random_strongly_connected(&mut rng, 9, 9, 30);

        let solve = |graph: &Graph| {
            let mut rng = Pcg64Mcg::seed_from_u64(7);
            let mut search = SegmentPermutationSearch::new(graph, [4, 3, 2], &mut rng);
            search.run_to_completion().unwrap()
        };

        assert_eq!(solve(&graph), solve(&graph));
    }

    #[test]
    fn solution_weight_bounded_by_tour_weight() {
        // distinct-edge collection can only drop duplicate legs, never add
        let mut rng = Pcg64Mcg::seed_from_u64(555);
        let graph = random_strongly_connected(&mut rng, 10, 15, 40);

        let mut search = SegmentPermutationSearch::new(&graph, [3, 2], &mut rng);
        let solution = search.run_to_completion().unwrap();

        assert!(solution.total_weight() <= search.tour_weight());
        assert!(solution.is_valid(&graph));
    }
}
