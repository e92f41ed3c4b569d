//! Turning cliques into atom mappings.
//!
//! A bond clique fixes which query bond lies on which target bond but not
//! which way round. Orientations are resolved by backtracking in
//! breadth-first order over shared query atoms, trying the forward
//! orientation first. Bond-less query atoms are then placed on free target
//! atoms, deferred chirality is checked, and duplicates are dropped.

use std::collections::{HashSet, VecDeque};

use molmatch_common::{Config, Molecule, SearchMode};

use crate::compat::{AtomPair, CandidatePair, CompatibilityGraph, Nodes, Orientation};
use crate::error::MatchError;
use crate::invariants::InvariantTable;
use crate::mapping::Mapping;
use crate::predicate::{ChiralityContext, permutation_parity};
use crate::profiling::{Phase, Timer};
use crate::query::QueryGraph;

/// Per-session clique-to-mapping conversion, remembering what it emitted.
pub(crate) struct Assembler<'a> {
    query: &'a QueryGraph,
    target: &'a Molecule,
    invariants: &'a InvariantTable,
    graph: &'a CompatibilityGraph,
    config: &'a Config,
    /// Query atoms with no bonds, placed after the bond clique.
    isolated: Vec<usize>,
    seen: HashSet<Vec<usize>>,
}

impl<'a> Assembler<'a> {
    pub(crate) fn new(
        query: &'a QueryGraph,
        target: &'a Molecule,
        invariants: &'a InvariantTable,
        graph: &'a CompatibilityGraph,
        config: &'a Config,
    ) -> Self {
        let isolated = match graph.nodes() {
            Nodes::Bonds(_) => query.isolated_atoms(),
            Nodes::Atoms(_) => Vec::new(),
        };
        Self {
            query,
            target,
            invariants,
            graph,
            config,
            isolated,
            seen: HashSet::new(),
        }
    }

    /// All new mappings induced by `clique`.
    pub(crate) fn assemble(&mut self, clique: &[usize]) -> Result<Vec<Mapping>, MatchError> {
        let _timer = Timer::new(Phase::Assembly);
        let base = match self.graph.nodes() {
            Nodes::Bonds(pairs) => {
                let members: Vec<&CandidatePair> =
                    clique.iter().filter_map(|&i| pairs.get(i)).collect();
                self.orient(&members)
            }
            Nodes::Atoms(pairs) => {
                let members: Vec<&AtomPair> = clique.iter().filter_map(|&i| pairs.get(i)).collect();
                Some(atom_clique_mapping(&members))
            }
        };
        let Some(base) = base else {
            tracing::trace!("clique {:?} has no consistent orientation", clique);
            return Ok(Vec::new());
        };

        let mut mappings = self.place_isolated(base, 0);

        if self.config.check_chirality {
            let mut kept = Vec::with_capacity(mappings.len());
            for mapping in mappings {
                if self.chirality_holds(&mapping)? {
                    kept.push(mapping);
                }
            }
            mappings = kept;
        }

        let dedupe = self.config.dedupe;
        mappings.retain(|m| self.seen.insert(m.signature(dedupe)));
        Ok(mappings)
    }

    /// Resolve one orientation per pair. In overlap mode pairs that cannot
    /// be oriented consistently are dropped instead of failing the clique.
    fn orient(&self, members: &[&CandidatePair]) -> Option<Mapping> {
        let order = self.breadth_first(members);
        if let Some(mapping) = resolve(&order, 0, Mapping::new()) {
            return Some(mapping);
        }
        if self.config.mode == SearchMode::Exact {
            return None;
        }

        let mut mapping = Mapping::new();
        for pair in &order {
            match pair.orientations().find(|&o| fits(&mapping, pair, o)) {
                Some(o) => mapping = with_pair(&mapping, pair, o),
                None => tracing::trace!(
                    "dropping query bond {} / target bond {}",
                    pair.query_bond,
                    pair.target_bond
                ),
            }
        }
        (!mapping.is_empty()).then_some(mapping)
    }

    /// Pairs reordered so each one after the first of its component shares
    /// a query atom with an earlier pair.
    fn breadth_first<'p>(&self, members: &[&'p CandidatePair]) -> Vec<&'p CandidatePair> {
        let mut visited = vec![false; members.len()];
        let mut order = Vec::with_capacity(members.len());
        for start in 0..members.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(i) = queue.pop_front() {
                order.push(members[i]);
                for (j, other) in members.iter().enumerate() {
                    if !visited[j]
                        && self
                            .query
                            .shared_atom(members[i].query_bond, other.query_bond)
                            .is_some()
                    {
                        visited[j] = true;
                        queue.push_back(j);
                    }
                }
            }
        }
        order
    }

    /// Place the remaining bond-less query atoms on unused target atoms,
    /// one mapping per injective placement.
    fn place_isolated(&self, base: Mapping, next: usize) -> Vec<Mapping> {
        let Some(&query_atom) = self.isolated.get(next) else {
            return vec![base];
        };

        let free: Vec<usize> = self
            .graph
            .atom_compatibility()
            .targets_for(query_atom)
            .filter(|&t| base.query_of(t).is_none())
            .collect();

        if free.is_empty() {
            return match self.config.mode {
                SearchMode::Exact => {
                    tracing::trace!("no free target atom for isolated query atom {query_atom}");
                    Vec::new()
                }
                SearchMode::Overlap => self.place_isolated(base, next + 1),
            };
        }

        free.into_iter()
            .flat_map(|t| {
                let mut extended = base.clone();
                extended.insert(query_atom, t);
                self.place_isolated(extended, next + 1)
            })
            .collect()
    }

    fn chirality_holds(&self, mapping: &Mapping) -> Result<bool, MatchError> {
        for (q, t) in mapping.pairs() {
            let Some(query_atom) = self.query.atoms().get(q) else {
                continue;
            };
            if !query_atom.predicate.has_deferred() {
                continue;
            }
            let Some(atom) = self.target.atom(t) else {
                return Ok(false);
            };

            let query_neighbors: Vec<usize> =
                self.query.neighbors(q).into_iter().map(|(n, _)| n).collect();
            let target_neighbors: Vec<usize> =
                self.target.neighbors(t).iter().map(|n| n.atom).collect();
            let permutation =
                permutation_parity(&query_neighbors, |n| mapping.target_of(n), &target_neighbors);
            if permutation.is_none() && self.config.mode == SearchMode::Overlap {
                tracing::trace!("query atom {q}: neighbourhood partly mapped, parity not checked");
                continue;
            }
            let context = ChiralityContext::new(atom.parity, permutation);

            if !query_atom
                .predicate
                .chirality_matches(t, atom, self.invariants, &context)?
            {
                tracing::trace!("chirality rejects query atom {q} on target atom {t}");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn atom_clique_mapping(members: &[&AtomPair]) -> Mapping {
    let mut mapping = Mapping::new();
    for pair in members {
        mapping.insert(pair.query_atom, pair.target_atom);
    }
    mapping
}

/// Whether orienting `pair` as `orientation` agrees with `mapping` in both
/// directions.
fn fits(mapping: &Mapping, pair: &CandidatePair, orientation: Orientation) -> bool {
    pair.atom_pairs(orientation)
        .into_iter()
        .all(|(q, t)| match mapping.target_of(q) {
            Some(existing) => existing == t,
            None => mapping.query_of(t).is_none(),
        })
}

fn with_pair(mapping: &Mapping, pair: &CandidatePair, orientation: Orientation) -> Mapping {
    let mut next = mapping.clone();
    for (q, t) in pair.atom_pairs(orientation) {
        if next.target_of(q).is_none() {
            next.insert(q, t);
        }
    }
    next.insert_bond(pair.query_bond, pair.target_bond);
    next
}

fn resolve(order: &[&CandidatePair], index: usize, mapping: Mapping) -> Option<Mapping> {
    let Some(pair) = order.get(index) else {
        return Some(mapping);
    };
    pair.orientations()
        .filter(|&o| fits(&mapping, pair, o))
        .find_map(|o| resolve(order, index + 1, with_pair(&mapping, pair, o)))
}
