use std::collections::BTreeMap;

use molmatch_common::Dedupe;
use serde::{Deserialize, Serialize};

/// An injective correspondence from query atoms to target atoms, with its
/// exact inverse and the induced bond correspondence.
///
/// Entries are kept ordered by index, so equal mappings compare equal
/// regardless of the order they were assembled in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IndexPairs", into = "IndexPairs")]
pub struct Mapping {
    /// Query atom to target atom.
    atoms: BTreeMap<usize, usize>,
    /// Target atom to query atom.
    inverse: BTreeMap<usize, usize>,
    /// Query bond to target bond.
    bonds: BTreeMap<usize, usize>,
}

impl Mapping {
    #[contracts::debug_ensures(ret.atoms.is_empty())]
    #[contracts::debug_ensures(ret.inverse.is_empty())]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `query → target`. Both atoms must be unmapped.
    #[contracts::debug_requires(!self.atoms.contains_key(&query))]
    #[contracts::debug_requires(!self.inverse.contains_key(&target))]
    #[contracts::debug_ensures(self.atoms.len() == self.inverse.len())]
    pub fn insert(&mut self, query: usize, target: usize) {
        self.atoms.insert(query, target);
        self.inverse.insert(target, query);
    }

    /// Record `query bond → target bond`.
    pub fn insert_bond(&mut self, query: usize, target: usize) {
        self.bonds.insert(query, target);
    }

    #[contracts::debug_ensures(self.debug_consistent(query, ret))]
    pub fn target_of(&self, query: usize) -> Option<usize> {
        self.atoms.get(&query).copied()
    }

    pub fn query_of(&self, target: usize) -> Option<usize> {
        self.inverse.get(&target).copied()
    }

    pub fn target_bond_of(&self, query_bond: usize) -> Option<usize> {
        self.bonds.get(&query_bond).copied()
    }

    fn debug_consistent(&self, query: usize, target: Option<usize>) -> bool {
        target.is_none_or(|t| self.inverse.get(&t) == Some(&query))
    }

    #[contracts::debug_requires(self.atoms.len() == self.inverse.len())]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// `(query atom, target atom)` pairs, ascending by query atom.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.atoms.iter().map(|(&q, &t)| (q, t))
    }

    /// `(query bond, target bond)` pairs, ascending by query bond.
    pub fn bond_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bonds.iter().map(|(&q, &t)| (q, t))
    }

    /// Mapped target atoms, ascending.
    pub fn target_atoms(&self) -> impl Iterator<Item = usize> + '_ {
        self.inverse.keys().copied()
    }

    /// The same correspondence read from the target side.
    pub fn inverse(&self) -> Self {
        Self {
            atoms: self.inverse.clone(),
            inverse: self.atoms.clone(),
            bonds: self.bonds.iter().map(|(&q, &t)| (t, q)).collect(),
        }
    }

    /// Key under which `dedupe` considers two mappings equal.
    pub fn signature(&self, dedupe: Dedupe) -> Vec<usize> {
        match dedupe {
            Dedupe::Mapping => self.atoms.iter().flat_map(|(&q, &t)| [q, t]).collect(),
            Dedupe::TargetAtoms => self.target_atoms().collect(),
        }
    }
}

/// Serialized shape of a mapping: plain index pairs.
#[derive(Serialize, Deserialize)]
struct IndexPairs {
    atoms: Vec<(usize, usize)>,
    #[serde(default)]
    bonds: Vec<(usize, usize)>,
}

impl From<Mapping> for IndexPairs {
    fn from(mapping: Mapping) -> Self {
        Self {
            atoms: mapping.pairs().collect(),
            bonds: mapping.bond_pairs().collect(),
        }
    }
}

impl From<IndexPairs> for Mapping {
    fn from(raw: IndexPairs) -> Self {
        let atoms: BTreeMap<usize, usize> = raw.atoms.into_iter().collect();
        let inverse = atoms.iter().map(|(&q, &t)| (t, q)).collect();
        Self {
            atoms,
            inverse,
            bonds: raw.bonds.into_iter().collect(),
        }
    }
}
