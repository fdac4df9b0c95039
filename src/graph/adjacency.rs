use fxhash::FxHashMap;
use log::trace;

use super::*;
use crate::errors::{GraphInvariantError, InvariantCheck};

/// A directed weighted graph keyed by external node names.
///
/// Both forward adjacency (outgoing edges) and reverse adjacency (incoming
/// edges) are maintained, each kept sorted by ascending weight. At most one
/// edge is retained between any ordered (source, target) pair: a duplicate
/// insertion only replaces the incumbent if it is strictly cheaper.
///
/// Every node referenced by an edge is registered with a dense zero-based
/// index in first-seen order. Indices are assigned once and never reused; the
/// search components rely on them for their scratch arrays and matrices.
#[derive(Clone, Default)]
pub struct Graph {
    out_edges: FxHashMap<Node, Vec<Edge>>,
    in_edges: FxHashMap<Node, Vec<Edge>>,

    index_of: FxHashMap<Node, NodeIndex>,
    nodes: Vec<Node>,

    number_of_edges: NumEdges,
}

impl Graph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.nodes.len() as NumNodes
    }

    pub fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in first-seen (index) order
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Nodes sorted by name
    pub fn sorted_nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.nodes.clone();
        nodes.sort_unstable();
        nodes
    }

    /// Nodes with zero outgoing edges
    pub fn leaf_nodes(&self) -> Vec<Node> {
        self.nodes()
            .filter(|&u| self.out_edges_of(u).is_empty())
            .collect()
    }

    /// Dense index of a known node.
    /// ** Panics if the node was never registered **
    pub fn index_of(&self, node: Node) -> NodeIndex {
        self.index_of[&node]
    }

    /// Node registered under `index`.
    /// ** Panics if index >= n **
    pub fn node(&self, index: NodeIndex) -> Node {
        self.nodes[index as usize]
    }

    /// Inserts `edge`, or rejects it if an edge between the same ordered
    /// endpoint pair with equal or lower weight is already present (the
    /// cheaper incumbent survives; ties keep the earlier insertion). Returns
    /// true iff the edge was retained.
    pub fn try_add_edge(&mut self, edge: Edge) -> bool {
        trace!(
            "add edge {}: {}->{} w={}",
            edge.name, edge.source, edge.target, edge.weight
        );

        if let Some(incumbent) = self.edge_between(edge.source, edge.target) {
            if incumbent.weight <= edge.weight {
                return false;
            }
            self.remove_edge(&incumbent);
        }

        Self::insert_sorted(self.out_edges.entry(edge.source).or_default(), edge);
        Self::insert_sorted(self.in_edges.entry(edge.target).or_default(), edge);
        self.number_of_edges += 1;

        self.register_node(edge.source);
        self.register_node(edge.target);

        true
    }

    pub fn add_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        for edge in edges {
            self.try_add_edge(edge);
        }
    }

    /// Removes `edge` from both adjacency maps; no-op if absent
    pub fn remove_edge(&mut self, edge: &Edge) {
        let mut removed = false;

        if let Some(list) = self.out_edges.get_mut(&edge.source) {
            if let Some(pos) = list.iter().position(|e| e == edge) {
                list.remove(pos);
                removed = true;
            }
        }

        if let Some(list) = self.in_edges.get_mut(&edge.target) {
            if let Some(pos) = list.iter().position(|e| e == edge) {
                list.remove(pos);
            }
        }

        self.number_of_edges -= removed as NumEdges;
    }

    /// Outgoing edges of `source` in ascending weight order; empty for nodes
    /// without recorded outgoing edges
    pub fn out_edges_of(&self, source: Node) -> &[Edge] {
        self.out_edges.get(&source).map_or(&[], Vec::as_slice)
    }

    /// Incoming edges of `target` in ascending weight order; empty for nodes
    /// without recorded incoming edges
    pub fn in_edges_of(&self, target: Node) -> &[Edge] {
        self.in_edges.get(&target).map_or(&[], Vec::as_slice)
    }

    /// The unique retained edge between an ordered endpoint pair, if any
    pub fn edge_between(&self, source: Node, target: Node) -> Option<Edge> {
        self.out_edges_of(source)
            .iter()
            .find(|e| e.target == target)
            .copied()
    }

    /// All retained edges, grouped by source in index order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes()
            .flat_map(|u| self.out_edges_of(u).iter().copied())
    }

    /// A cheap admissible lower bound on the weight of any spanning strongly
    /// connected subgraph: every node on a circuit pays at least its cheapest
    /// incoming and cheapest outgoing edge, each shared between two nodes.
    /// Nodes lacking either direction contribute nothing.
    pub fn circuit_lower_bound(&self) -> Weight {
        self.nodes()
            .filter_map(|u| {
                let cheapest_in = self.in_edges_of(u).first()?;
                let cheapest_out = self.out_edges_of(u).first()?;
                Some((cheapest_in.weight + cheapest_out.weight) / 2)
            })
            .sum()
    }

    fn register_node(&mut self, node: Node) {
        if self.index_of.contains_key(&node) {
            return;
        }
        self.index_of.insert(node, self.nodes.len() as NodeIndex);
        self.nodes.push(node);
    }

    // insertion point found by linear scan; lists stay short
    fn insert_sorted(list: &mut Vec<Edge>, edge: Edge) {
        let pos = list
            .iter()
            .position(|e| edge.weight < e.weight)
            .unwrap_or(list.len());
        list.insert(pos, edge);
    }
}

impl InvariantCheck<GraphInvariantError> for Graph {
    fn is_correct(&self) -> Result<(), GraphInvariantError> {
        use GraphInvariantError::*;

        for &u in self.out_edges.keys().chain(self.in_edges.keys()) {
            if !self.index_of.contains_key(&u) {
                return Err(UnindexedNode(u));
            }
        }

        let mut indices: Vec<NodeIndex> = self.index_of.values().copied().collect();
        indices.sort_unstable();
        if indices.len() != self.nodes.len()
            || indices
                .iter()
                .enumerate()
                .any(|(pos, &i)| pos as NodeIndex != i)
        {
            return Err(NonDenseIndices);
        }

        for (u, list) in self.out_edges.iter().chain(self.in_edges.iter()) {
            if list.windows(2).any(|w| w[0].weight > w[1].weight) {
                return Err(UnsortedAdjacency(*u));
            }
        }

        for u in self.nodes() {
            let out = self.out_edges_of(u);
            for e in out {
                if out.iter().filter(|o| o.target == e.target).count() > 1 {
                    return Err(DuplicateEdge(u, e.target));
                }
                if !self.in_edges_of(e.target).contains(e) {
                    return Err(AsymmetricEdge(e.name));
                }
            }
        }

        Ok(())
    }
}
