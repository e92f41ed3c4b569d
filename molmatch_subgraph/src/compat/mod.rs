//! Compatibility graph construction.
//!
//! Nodes are query/target correspondences that pass every topological
//! predicate; edges join correspondences that can hold at the same time.
//! Cliques of this graph are the candidate common substructures.

mod atoms;
mod candidate;

pub use atoms::AtomCompatibility;
pub use candidate::{AtomPair, CandidatePair, Orientation};

use itertools::Itertools;
use molmatch_common::Molecule;

use crate::error::MatchError;
use crate::invariants::InvariantTable;
use crate::profiling::{Phase, Timer};
use crate::query::QueryGraph;

/// Node payloads of a compatibility graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nodes {
    /// Query bond / target bond pairs.
    Bonds(Vec<CandidatePair>),
    /// Query atom / target atom pairs, used when the query has no bonds.
    Atoms(Vec<AtomPair>),
}

impl Nodes {
    pub fn len(&self) -> usize {
        match self {
            Self::Bonds(pairs) => pairs.len(),
            Self::Atoms(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compatibility graph between one query and one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompatibilityGraph {
    nodes: Nodes,
    /// Row-major `len × len` adjacency matrix.
    adjacency: Vec<bool>,
    /// Clique size that covers the whole query.
    cover: usize,
    atoms: AtomCompatibility,
}

impl CompatibilityGraph {
    /// Build the graph for a validated query.
    pub fn build(
        query: &QueryGraph,
        target: &Molecule,
        invariants: &InvariantTable,
    ) -> Result<Self, MatchError> {
        let _timer = Timer::new(Phase::Compatibility);

        let atoms = AtomCompatibility::build(query, target, invariants)?;

        let graph = if query.bond_count() == 0 {
            Self::atom_graph(query, atoms)
        } else {
            Self::bond_graph(query, target, invariants, atoms)?
        };

        let edges = graph.adjacency.iter().filter(|&&e| e).count() / 2;
        tracing::debug!(
            "compatibility graph for '{}' in '{}': {} nodes, {} edges, cover {}",
            query.name(),
            target.name(),
            graph.len(),
            edges,
            graph.cover
        );
        Ok(graph)
    }

    /// Atom-pair graph regardless of the query's bonds. Overlap searches
    /// fall back to it when no bond pair is compatible, so atom-only
    /// correspondences are still found.
    pub fn build_atoms_only(
        query: &QueryGraph,
        target: &Molecule,
        invariants: &InvariantTable,
    ) -> Result<Self, MatchError> {
        let atoms = AtomCompatibility::build(query, target, invariants)?;
        Ok(Self::atom_graph(query, atoms))
    }

    fn atom_graph(query: &QueryGraph, atoms: AtomCompatibility) -> Self {
        let pairs: Vec<AtomPair> = (0..query.atom_count())
            .flat_map(|q| {
                atoms.targets_for(q).map(move |t| AtomPair {
                    query_atom: q,
                    target_atom: t,
                })
            })
            .collect();

        let mut adjacency = vec![false; pairs.len() * pairs.len()];
        for ((i, a), (j, b)) in pairs.iter().enumerate().tuple_combinations() {
            if a.query_atom != b.query_atom && a.target_atom != b.target_atom {
                adjacency[i * pairs.len() + j] = true;
                adjacency[j * pairs.len() + i] = true;
            }
        }

        Self {
            nodes: Nodes::Atoms(pairs),
            adjacency,
            cover: query.atom_count(),
            atoms,
        }
    }

    fn bond_graph(
        query: &QueryGraph,
        target: &Molecule,
        invariants: &InvariantTable,
        atoms: AtomCompatibility,
    ) -> Result<Self, MatchError> {
        let mut pairs = Vec::new();
        for (query_bond, q) in query.bonds().iter().enumerate() {
            let [q0, q1] = q.atoms;
            for (target_bond, t) in target.bonds().iter().enumerate() {
                if !q.predicate.accepts(target_bond, t, invariants)? {
                    continue;
                }
                let [t0, t1] = t.atoms();
                let forward = atoms.accepts(q0, t0) && atoms.accepts(q1, t1);
                let reverse = atoms.accepts(q0, t1) && atoms.accepts(q1, t0);
                if !forward && !reverse {
                    tracing::trace!(
                        "query bond {query_bond} / target bond {target_bond}: atoms rejected"
                    );
                    continue;
                }
                pairs.push(CandidatePair {
                    query_bond,
                    target_bond,
                    query_atoms: q.atoms,
                    target_atoms: t.atoms(),
                    forward,
                    reverse,
                });
            }
        }

        let n = pairs.len();
        let mut adjacency = vec![false; n * n];
        for ((i, a), (j, b)) in pairs.iter().enumerate().tuple_combinations() {
            if compatible(query, target, a, b) {
                adjacency[i * n + j] = true;
                adjacency[j * n + i] = true;
            }
        }

        Ok(Self {
            nodes: Nodes::Bonds(pairs),
            adjacency,
            cover: query.bond_count(),
            atoms,
        })
    }

    pub const fn nodes(&self) -> &Nodes {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clique size that covers every query bond (or atom, for a bond-less
    /// query).
    pub const fn cover(&self) -> usize {
        self.cover
    }

    pub const fn atom_compatibility(&self) -> &AtomCompatibility {
        &self.atoms
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        let n = self.len();
        a < n && b < n && self.adjacency[a * n + b]
    }

    /// Neighbours of node `a`, ascending.
    pub fn neighbors(&self, a: usize) -> Vec<usize> {
        (0..self.len()).filter(|&b| self.is_adjacent(a, b)).collect()
    }
}

/// Edge rule between two bond candidates.
fn compatible(query: &QueryGraph, target: &Molecule, a: &CandidatePair, b: &CandidatePair) -> bool {
    if a.query_bond == b.query_bond || a.target_bond == b.target_bond {
        return false;
    }
    let query_shared = query.shared_atom(a.query_bond, b.query_bond);
    let target_shared = match (target.bond(a.target_bond), target.bond(b.target_bond)) {
        (Some(x), Some(y)) => x.shared_atom(y),
        _ => return false,
    };
    match (query_shared, target_shared) {
        (None, None) => true,
        (Some(q), Some(t)) => a.can_map(q, t) && b.can_map(q, t),
        _ => false,
    }
}
