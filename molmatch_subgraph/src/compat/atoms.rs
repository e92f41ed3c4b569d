use molmatch_common::Molecule;

use crate::error::MatchError;
use crate::invariants::InvariantTable;
use crate::query::QueryGraph;

/// Topological acceptance of every target atom by every query atom.
///
/// Built once per session so that precondition errors surface before the
/// search starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtomCompatibility {
    target_atoms: usize,
    accepted: Vec<bool>,
}

impl AtomCompatibility {
    pub fn build(
        query: &QueryGraph,
        target: &Molecule,
        invariants: &InvariantTable,
    ) -> Result<Self, MatchError> {
        let target_atoms = target.atom_count();
        let mut accepted = Vec::with_capacity(query.atom_count() * target_atoms);
        for query_atom in query.atoms() {
            for (index, atom) in target.atoms().iter().enumerate() {
                accepted.push(query_atom.predicate.accepts(index, atom, invariants)?);
            }
        }
        Ok(Self {
            target_atoms,
            accepted,
        })
    }

    /// Whether query atom `query` accepts target atom `target`.
    pub fn accepts(&self, query: usize, target: usize) -> bool {
        target < self.target_atoms
            && self
                .accepted
                .get(query * self.target_atoms + target)
                .copied()
                .unwrap_or(false)
    }

    /// Target atoms accepted by query atom `query`, ascending.
    pub fn targets_for(&self, query: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.target_atoms).filter(move |&t| self.accepts(query, t))
    }
}
