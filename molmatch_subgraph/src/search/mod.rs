//! Clique enumeration over a compatibility graph.
//!
//! A depth-first Bron–Kerbosch extension without pivoting, branching on
//! candidates in ascending node order so that results come out in a fixed
//! order. Every reported clique is handed to an `accept` closure that turns
//! it into zero or more mappings. The size bound used for pruning is the
//! size of the largest mapping accepted so far, which can be smaller than
//! the clique it came from.

mod frontier;

use std::ops::ControlFlow;

use molmatch_common::{Config, OverlapScope, SearchMode};

use crate::compat::{CompatibilityGraph, Nodes};
use crate::error::MatchError;
use crate::mapping::Mapping;
use crate::profiling::{Phase, Timer};

use frontier::Frontier;

/// Counters collected over one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Frames entered.
    pub expanded: usize,
    /// Frames cut by the size bound.
    pub pruned: usize,
    /// Cliques handed to the accept closure.
    pub reported: usize,
    /// Cliques that produced at least one mapping.
    pub accepted: usize,
}

/// Bron–Kerbosch search over one compatibility graph.
#[derive(Clone, Copy, Debug)]
pub struct CliqueSearch<'g> {
    graph: &'g CompatibilityGraph,
    mode: SearchMode,
    scope: OverlapScope,
    limit: Option<usize>,
}

impl<'g> CliqueSearch<'g> {
    pub const fn new(graph: &'g CompatibilityGraph, config: &Config) -> Self {
        Self {
            graph,
            mode: config.mode,
            scope: config.overlap_scope,
            limit: config.limit,
        }
    }

    /// Enumerate cliques, collecting whatever `accept` makes of each.
    ///
    /// In exact mode only cliques covering the whole query are reported. In
    /// overlap mode every maximal clique is reported, unless the largest
    /// scope prunes it as too small to matter.
    pub fn run<F>(&self, accept: F) -> Result<(Vec<Mapping>, SearchStats), MatchError>
    where
        F: FnMut(&[usize]) -> Result<Vec<Mapping>, MatchError>,
    {
        let _timer = Timer::new(Phase::Search);

        let mut state = Run {
            search: *self,
            accept,
            results: Vec::new(),
            best: 0,
            stats: SearchStats::default(),
        };

        if self.limit != Some(0) && !self.graph.is_empty() {
            let mut clique = Vec::new();
            let _ = state.extend(&mut clique, Frontier::root(self.graph))?;
        }

        tracing::debug!(
            "clique search: {} frames, {} pruned, {} cliques reported, {} accepted",
            state.stats.expanded,
            state.stats.pruned,
            state.stats.reported,
            state.stats.accepted
        );
        Ok((state.results, state.stats))
    }

    /// Size of a mapping in units of graph nodes: bonds for bond graphs,
    /// atoms for atom graphs. A clique never yields more than its node count.
    fn size_of(&self, mapping: &Mapping) -> usize {
        match self.graph.nodes() {
            Nodes::Bonds(_) => mapping.bond_count(),
            Nodes::Atoms(_) => mapping.len(),
        }
    }

    /// Smallest clique size worth pursuing, given the best accepted so far.
    const fn required(&self, best: usize) -> usize {
        match (self.mode, self.scope) {
            (SearchMode::Exact, _) => self.graph.cover(),
            (SearchMode::Overlap, OverlapScope::Largest) => best,
            (SearchMode::Overlap, OverlapScope::AllMaximal) => 0,
        }
    }
}

struct Run<'g, F> {
    search: CliqueSearch<'g>,
    accept: F,
    results: Vec<Mapping>,
    best: usize,
    stats: SearchStats,
}

impl<F> Run<'_, F>
where
    F: FnMut(&[usize]) -> Result<Vec<Mapping>, MatchError>,
{
    fn extend(
        &mut self,
        clique: &mut Vec<usize>,
        mut frontier: Frontier,
    ) -> Result<ControlFlow<()>, MatchError> {
        self.stats.expanded += 1;

        let complete = match self.search.mode {
            SearchMode::Exact => clique.len() == self.search.graph.cover(),
            SearchMode::Overlap => !clique.is_empty() && frontier.is_exhausted(),
        };
        if complete {
            return self.report(clique);
        }

        while let Some(&node) = frontier.candidates.first() {
            if frontier.reach(clique.len()) < self.search.required(self.best) {
                self.stats.pruned += 1;
                tracing::trace!("pruned at depth {} below bound {}", clique.len(), self.best);
                break;
            }

            let next = frontier.narrow(self.search.graph, node);
            clique.push(node);
            let flow = self.extend(clique, next)?;
            clique.pop();
            if flow.is_break() {
                return Ok(flow);
            }

            frontier.exclude_first();
        }
        Ok(ControlFlow::Continue(()))
    }

    fn report(&mut self, clique: &[usize]) -> Result<ControlFlow<()>, MatchError> {
        self.stats.reported += 1;
        let mut mappings = (self.accept)(clique)?;
        if mappings.is_empty() {
            tracing::trace!("clique {:?} rejected", clique);
            return Ok(ControlFlow::Continue(()));
        }

        self.stats.accepted += 1;
        let size = mappings
            .iter()
            .map(|m| self.search.size_of(m))
            .max()
            .unwrap_or(0);
        if size < clique.len() {
            tracing::trace!("clique of {} nodes yielded mappings of size {size}", clique.len());
        }
        self.best = self.best.max(size);

        if let Some(limit) = self.search.limit {
            mappings.truncate(limit.saturating_sub(self.results.len()));
            self.results.extend(mappings);
            if self.results.len() >= limit {
                tracing::debug!("limit of {limit} mappings reached");
                return Ok(ControlFlow::Break(()));
            }
        } else {
            self.results.extend(mappings);
        }
        Ok(ControlFlow::Continue(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::InvariantTable;
    use crate::query::QueryGraph;
    use molmatch_common::{Dedupe, Molecule, BUTANE, CYCLOBUTANE, ETHANE, PROPANE};

    fn graph(query: &Molecule, target: &Molecule) -> CompatibilityGraph {
        let query = QueryGraph::from_molecule(query);
        CompatibilityGraph::build(&query, target, &InvariantTable::compute(target)).unwrap()
    }

    /// Accept every clique as a placeholder mapping keyed by its nodes.
    fn collect_cliques(
        graph: &CompatibilityGraph,
        config: &Config,
    ) -> (Vec<Vec<usize>>, SearchStats) {
        let mut cliques = Vec::new();
        let (_, stats) = CliqueSearch::new(graph, config)
            .run(|clique| {
                cliques.push(clique.to_vec());
                let mut m = Mapping::new();
                m.insert(cliques.len(), cliques.len());
                Ok(vec![m])
            })
            .unwrap();
        (cliques, stats)
    }

    #[test]
    fn exact_reports_covering_cliques_in_order() {
        let g = graph(&PROPANE, &CYCLOBUTANE);
        let (cliques, stats) = collect_cliques(&g, &Config::default());
        assert_eq!(cliques.len(), 8);
        assert!(cliques.iter().all(|c| c.len() == 2));
        assert_eq!(cliques[0], vec![0, 5]);
        assert!(cliques.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(stats.accepted, 8);
    }

    #[test]
    fn exact_prunes_when_cover_unreachable() {
        let g = graph(&BUTANE, &PROPANE);
        let (cliques, stats) = collect_cliques(&g, &Config::default());
        assert!(cliques.is_empty());
        assert!(stats.pruned > 0);
    }

    #[test]
    fn overlap_reports_maximal_cliques() {
        let g = graph(&BUTANE, &PROPANE);
        let (cliques, _) = collect_cliques(&g, &Config::overlap(Dedupe::Mapping));
        assert_eq!(cliques.len(), 4);
        assert!(cliques.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn limit_stops_early() {
        let g = graph(&ETHANE, &CYCLOBUTANE);
        let config = Config::builder().limit(Some(2)).build();
        let (mappings, stats) = CliqueSearch::new(&g, &config)
            .run(|clique| {
                let mut m = Mapping::new();
                m.insert(0, clique[0]);
                Ok(vec![m])
            })
            .unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(stats.reported, 2);
    }

    #[test]
    fn rejected_cliques_do_not_raise_the_bound() {
        let g = graph(&BUTANE, &PROPANE);
        let config = Config::overlap(Dedupe::Mapping);
        let mut seen = 0;
        let (mappings, stats) = CliqueSearch::new(&g, &config)
            .run(|_| {
                seen += 1;
                Ok(Vec::new())
            })
            .unwrap();
        assert!(mappings.is_empty());
        assert_eq!(stats.accepted, 0);
        assert_eq!(seen, 4);
    }

    #[test]
    fn errors_propagate() {
        let g = graph(&ETHANE, &CYCLOBUTANE);
        let result = CliqueSearch::new(&g, &Config::default())
            .run(|_| Err(MatchError::MissingInvariants { atom: 0 }));
        assert_eq!(result, Err(MatchError::MissingInvariants { atom: 0 }));
    }
}
