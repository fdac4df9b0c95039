use smallvec::SmallVec;

use super::*;

const UNVISITED: NodeIndex = NodeIndex::MAX;

/// Reusable feasibility oracle answering whether a candidate edge set induces
/// a single strongly connected component spanning all `n` nodes.
///
/// Runs Tarjan's algorithm from node index 0 in one DFS pass. The candidate is
/// rejected as soon as any node turns out to have no outgoing candidate edge,
/// as soon as a terminal component smaller than `n` closes, and implicitly
/// when some node is unreachable from the start (the component containing the
/// start then closes with fewer than `n` members).
///
/// All per-node scratch (index, low-link, on-stack flag) lives in arrays owned
/// by the oracle and is reset on every call, so one instance can be reused
/// across the many checks of the exhaustive search without reallocation.
pub struct SccCheck {
    n: usize,

    adj: Vec<SmallVec<[NodeIndex; 4]>>,

    index: Vec<NodeIndex>,
    lowlink: Vec<NodeIndex>,
    on_stack: Vec<bool>,
    stack: Vec<NodeIndex>,
    next_index: NodeIndex,
}

impl SccCheck {
    pub fn new(n: NumNodes) -> Self {
        let n = n as usize;
        Self {
            n,
            adj: vec![SmallVec::new(); n],
            index: vec![UNVISITED; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::with_capacity(n),
            next_index: 0,
        }
    }

    /// Checks the candidate given as (source index, target index) pairs.
    /// Indices must be smaller than the `n` passed at construction.
    pub fn is_single_scc(&mut self, edges: &[(NodeIndex, NodeIndex)]) -> bool {
        if self.n == 0 {
            return false;
        }

        self.reset();
        for &(u, v) in edges {
            self.adj[u as usize].push(v);
        }

        if self.adj.iter().any(SmallVec::is_empty) {
            return false;
        }

        self.visit(0)
    }

    fn reset(&mut self) {
        for list in &mut self.adj {
            list.clear();
        }
        self.index.fill(UNVISITED);
        self.on_stack.fill(false);
        self.stack.clear();
        self.next_index = 0;
    }

    // recursion depth is bounded by the node count, which is small here
    fn visit(&mut self, v: usize) -> bool {
        self.index[v] = self.next_index;
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v as NodeIndex);
        self.on_stack[v] = true;

        for i in 0..self.adj[v].len() {
            let w = self.adj[v][i] as usize;

            if self.index[w] == UNVISITED {
                if !self.visit(w) {
                    return false;
                }
                self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
            } else if self.on_stack[w] {
                self.lowlink[v] = self.lowlink[v].min(self.index[w]);
            }
        }

        if self.lowlink[v] == self.index[v] {
            let mut popped = 0;
            loop {
                let w = self.stack.pop().unwrap();
                self.on_stack[w as usize] = false;
                popped += 1;
                if w as usize == v {
                    break;
                }
            }
            // a terminal component must swallow the whole graph
            if popped != self.n {
                return false;
            }
        }

        true
    }
}
