use itertools::Itertools;

use crate::graph::*;

/// Reference answer by unpruned enumeration of every edge subset; only
/// sensible for instances with a handful of edges.
pub fn brute_force_best_weight(graph: &Graph) -> Option<Weight> {
    let edges = graph.edges().collect_vec();
    assert!(edges.len() <= 20, "brute force is exponential in edge count");

    let endpoints = edges
        .iter()
        .map(|e| (graph.index_of(e.source), graph.index_of(e.target)))
        .collect_vec();

    let mut scc = SccCheck::new(graph.number_of_nodes());
    let mut best: Option<Weight> = None;

    for mask in 1u32..(1 << edges.len()) {
        let selected = (0..edges.len())
            .filter(|i| mask & (1 << i) != 0)
            .collect_vec();

        let weight = Edge::total_weight(selected.iter().map(|&i| &edges[i]));
        if best.is_some_and(|b| b <= weight) {
            continue;
        }

        let pairs = selected.iter().map(|&i| endpoints[i]).collect_vec();
        if scc.is_single_scc(&pairs) {
            best = Some(weight);
        }
    }

    best
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::graph::random::random_strongly_connected;

    #[test]
    fn brute_force_triangle() {
        let mut graph = Graph::new();
        graph.add_edges([
            Edge::new(1, 0, 1, 1),
            Edge::new(2, 1, 2, 1),
            Edge::new(3, 2, 0, 1),
            Edge::new(4, 1, 0, 5),
        ]);

        assert_eq!(brute_force_best_weight(&graph), Some(3));
    }

    #[test]
    fn brute_force_finds_feasible_generated_instances() {
        let mut rng = Pcg64::seed_from_u64(1);
        for _ in 0..5 {
            let graph = random_strongly_connected(&mut rng, 4, 3, 9);
            let best = brute_force_best_weight(&graph).unwrap();
            assert!(best >= graph.circuit_lower_bound());
        }
    }
}
