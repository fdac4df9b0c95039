use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::Path,
};

use crate::graph::{Edge, Graph};

pub type Result<T> = std::io::Result<T>;

/// Reads a graph from the whitespace-separated edge-list format: one edge per
/// line as `<edge> <source> <target> <weight>`, where the first three tokens
/// carry a one-character non-numeric prefix in front of the integer identity.
/// Lines with fewer than four tokens are ignored.
pub trait GraphEdgeListReader: Sized {
    fn try_read_edges<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_edges_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl GraphEdgeListReader for Graph {
    fn try_read_edges<R: BufRead>(reader: R) -> Result<Self> {
        let mut edge_reader = EdgeListReader::new(reader);
        let mut graph = Graph::new();
        while let Some(edge) = edge_reader.try_next()? {
            graph.try_add_edge(edge);
        }
        Ok(graph)
    }

    fn try_read_edges_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_edges(buf_reader)
    }
}

pub struct EdgeListReader<R> {
    lines: Lines<R>,
}

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_token {
    ($iterator : expr, $name : expr, $strip_prefix : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        let token = next.unwrap();
        let digits = if $strip_prefix { token.get(1..) } else { Some(token) };

        let parsed = digits.and_then(|d| d.parse().ok());
        raise_error_unless!(
            parsed.is_some(),
            ErrorKind::InvalidData,
            format!("Invalid value found. Cannot parse {} from {:?}.", $name, token)
        );

        parsed.unwrap()
    }};
}

impl<R: BufRead> EdgeListReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Parses the next edge line, skipping lines with fewer than four tokens.
    /// Returns `Ok(None)` at end of input.
    pub fn try_next(&mut self) -> Result<Option<Edge>> {
        loop {
            let line = match self.lines.next() {
                None => return Ok(None),
                Some(line) => line?,
            };

            let mut tokens = line.split_whitespace();
            if tokens.clone().count() < 4 {
                continue;
            }

            let name = parse_next_token!(tokens, "Edge name", true);
            let source = parse_next_token!(tokens, "Source node", true);
            let target = parse_next_token!(tokens, "Target node", true);
            let weight = parse_next_token!(tokens, "Weight", false);

            return Ok(Some(Edge::new(name, source, target, weight)));
        }
    }
}

impl<R: BufRead> Iterator for EdgeListReader<R> {
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().unwrap()
    }
}
