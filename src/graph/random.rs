use rand::{Rng, seq::SliceRandom};

use super::*;

/// Generates a random graph that is guaranteed to be strongly connected: a
/// Hamiltonian cycle through all `n` nodes in shuffled order, plus up to
/// `extra_edges` additional random non-loop edges. Weights are drawn
/// uniformly from `1..=max_weight`.
///
/// Nodes are named `0..n`; edge names are consecutive starting at 1. Extra
/// edges falling on an already occupied ordered pair are subject to the usual
/// deduplication, so the resulting edge count may be below `n + extra_edges`.
pub fn random_strongly_connected(
    rng: &mut impl Rng,
    n: NumNodes,
    extra_edges: NumEdges,
    max_weight: Weight,
) -> Graph {
    assert!(n > 0);

    let mut order: Vec<Node> = (0..n).collect();
    order.shuffle(rng);

    let mut graph = Graph::new();
    let mut name: EdgeName = 1;

    for i in 0..n as usize {
        let source = order[i];
        let target = order[(i + 1) % n as usize];
        graph.try_add_edge(Edge::new(name, source, target, rng.gen_range(1..=max_weight)));
        name += 1;
    }

    for _ in 0..extra_edges {
        let source = rng.gen_range(0..n);
        let target = rng.gen_range(0..n);
        if source == target {
            continue;
        }
        graph.try_add_edge(Edge::new(name, source, target, rng.gen_range(1..=max_weight)));
        name += 1;
    }

    graph
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn generated_instances_are_feasible() {
        let mut rng = Pcg64::seed_from_u64(31337);

        for n in 2..20 {
            let graph = random_strongly_connected(&mut rng, n, n / 2, 10);
            assert_eq!(graph.number_of_nodes(), n);
            assert!(graph.number_of_edges() >= n);
            assert!(graph.leaf_nodes().is_empty());

            let edges = graph
                .edges()
                .map(|e| (graph.index_of(e.source), graph.index_of(e.target)))
                .collect_vec();
            let mut scc = SccCheck::new(n);
            assert!(scc.is_single_scc(&edges));
        }
    }
}
