use std::cmp::Ordering;

use super::*;

/// A directed, weighted, uniquely named edge.
///
/// The [`Ord`] instance orders by name, which is the display order of
/// solutions. Weight-ascending order is a separate sort key used by the
/// adjacency lists and the exhaustive search, see [`Edge::by_weight`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub name: EdgeName,
    pub source: Node,
    pub target: Node,
    pub weight: Weight,
}

impl Edge {
    pub fn new(name: EdgeName, source: Node, target: Node, weight: Weight) -> Self {
        Self {
            name,
            source,
            target,
            weight,
        }
    }

    /// Sort key for ascending-weight orderings
    pub fn by_weight(&self) -> Weight {
        self.weight
    }

    /// Sum of weights of an edge collection
    pub fn total_weight<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Weight {
        edges.into_iter().map(|e| e.weight).sum()
    }
}

// Edge names are unique within an instance, so ordering by name alone is
// consistent with the derived equality.
impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn order_by_name() {
        let heavy_first = Edge::new(1, 10, 11, 99);
        let light_last = Edge::new(7, 11, 10, 1);

        let mut edges = vec![light_last, heavy_first];
        edges.sort();
        assert_eq!(edges, vec![heavy_first, light_last]);

        let by_weight = edges.iter().sorted_by_key(|e| e.by_weight()).collect_vec();
        assert_eq!(by_weight, vec![&light_last, &heavy_first]);
    }

    #[test]
    fn total_weight() {
        let edges = [Edge::new(1, 0, 1, 3), Edge::new(2, 1, 0, 4)];
        assert_eq!(Edge::total_weight(&edges), 7);
        assert_eq!(Edge::total_weight(&[] as &[Edge]), 0);
    }
}
