use super::*;

/// All-pairs shortest distances with path reconstruction, computed once from
/// a graph's current edge set by the classic triple-nested relaxation.
///
/// The matrix does not track later mutation of the graph it was built from;
/// callers must finish mutating before constructing it.
///
/// The distance from a node to itself is deliberately not forced to zero: it
/// is the weight of the cheapest non-empty closed walk through that node
/// ([`INFINITY`] if the node lies on no cycle). Tour evaluation only ever
/// queries distinct nodes, and the convention gives "is this node on a
/// circuit at all" for free.
pub struct ShortestPaths {
    n: usize,
    dist: Vec<Weight>,
    /// Intermediate waypoint recorded for (i, j), if the best known path does
    /// not consist of the direct edge alone
    via: Vec<Option<NodeIndex>>,
}

impl ShortestPaths {
    pub fn new(graph: &Graph) -> Self {
        let n = graph.len();
        let mut dist = vec![INFINITY; n * n];
        let mut via = vec![None; n * n];

        for edge in graph.edges() {
            let i = graph.index_of(edge.source) as usize;
            let j = graph.index_of(edge.target) as usize;
            dist[i * n + j] = edge.weight;
        }

        for k in 0..n {
            for i in 0..n {
                if dist[i * n + k] == INFINITY {
                    continue;
                }
                for j in 0..n {
                    if dist[k * n + j] == INFINITY {
                        continue;
                    }
                    let through_k = dist[i * n + k] + dist[k * n + j];
                    if through_k < dist[i * n + j] {
                        dist[i * n + j] = through_k;
                        via[i * n + j] = Some(k as NodeIndex);
                    }
                }
            }
        }

        Self { n, dist, via }
    }

    /// Shortest distance between two node indices, [`INFINITY`] if
    /// unreachable
    pub fn distance(&self, source: NodeIndex, target: NodeIndex) -> Weight {
        self.dist[source as usize * self.n + target as usize]
    }

    pub fn distance_between(&self, graph: &Graph, source: Node, target: Node) -> Weight {
        self.distance(graph.index_of(source), graph.index_of(target))
    }

    /// Shortest path as node indices from `source` to `target` inclusive;
    /// empty if unreachable
    pub fn path(&self, source: NodeIndex, target: NodeIndex) -> Vec<NodeIndex> {
        if self.distance(source, target) == INFINITY {
            return Vec::new();
        }

        let mut path = vec![source];
        self.push_intermediate(source, target, &mut path);
        path.push(target);
        path
    }

    pub fn path_between(&self, graph: &Graph, source: Node, target: Node) -> Vec<Node> {
        self.path(graph.index_of(source), graph.index_of(target))
            .into_iter()
            .map(|i| graph.node(i))
            .collect()
    }

    // splits recursively at the recorded waypoint
    fn push_intermediate(&self, source: NodeIndex, target: NodeIndex, path: &mut Vec<NodeIndex>) {
        if let Some(k) = self.via[source as usize * self.n + target as usize] {
            self.push_intermediate(source, k, path);
            path.push(k);
            self.push_intermediate(k, target, path);
        }
    }
}
