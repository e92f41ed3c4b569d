use crate::compat::CompatibilityGraph;

/// Candidate and excluded node sets of one Bron–Kerbosch frame.
///
/// Both sets are kept ascending. Every candidate is adjacent to every node of
/// the current clique; excluded nodes are too, but have already been
/// explored from an ancestor frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Frontier {
    pub(crate) candidates: Vec<usize>,
    pub(crate) excluded: Vec<usize>,
}

impl Frontier {
    /// Frontier of the empty clique.
    pub(crate) fn root(graph: &CompatibilityGraph) -> Self {
        Self {
            candidates: (0..graph.len()).collect(),
            excluded: Vec::new(),
        }
    }

    /// Frontier after adding `node` to the clique.
    pub(crate) fn narrow(&self, graph: &CompatibilityGraph, node: usize) -> Self {
        Self {
            candidates: keep_adjacent(graph, &self.candidates, node),
            excluded: keep_adjacent(graph, &self.excluded, node),
        }
    }

    /// Move the lowest candidate to the excluded set, returning it.
    pub(crate) fn exclude_first(&mut self) -> Option<usize> {
        if self.candidates.is_empty() {
            return None;
        }
        let node = self.candidates.remove(0);
        let at = self.excluded.partition_point(|&x| x < node);
        self.excluded.insert(at, node);
        Some(node)
    }

    /// Whether the clique this frontier belongs to is maximal.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.candidates.is_empty() && self.excluded.is_empty()
    }

    /// Largest clique size still reachable from a clique of `depth` nodes.
    pub(crate) fn reach(&self, depth: usize) -> usize {
        depth + self.candidates.len()
    }
}

fn keep_adjacent(graph: &CompatibilityGraph, set: &[usize], node: usize) -> Vec<usize> {
    set.iter()
        .copied()
        .filter(|&other| graph.is_adjacent(node, other))
        .collect()
}
