use std::io::Write;

use itertools::Itertools;

use crate::graph::*;

/// A candidate answer: the chosen subset of real graph edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    edges: Vec<Edge>,
}

impl Solution {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn total_weight(&self) -> Weight {
        Edge::total_weight(&self.edges)
    }

    /// True iff the chosen edges induce a single strongly connected component
    /// spanning every node of `graph`
    pub fn is_valid(&self, graph: &Graph) -> bool {
        let endpoints = self
            .edges
            .iter()
            .map(|e| (graph.index_of(e.source), graph.index_of(e.target)))
            .collect_vec();

        SccCheck::new(graph.number_of_nodes()).is_single_scc(&endpoints)
    }

    /// Prints the total weight on one line and the edge names, sorted
    /// ascending and space-separated, on the next. An empty solution prints
    /// nothing.
    pub fn write<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        if self.edges.is_empty() {
            return Ok(());
        }

        writeln!(&mut writer, "{}", self.total_weight())?;

        let names = self.edges.iter().map(|e| e.name).sorted().join(" ");
        writeln!(&mut writer, "{names}")?;

        Ok(())
    }
}
