//! Query graphs: atoms and bonds carrying predicates.
//!
//! A [`QueryGraph`] is built without validation so that callers can assemble
//! one incrementally or deserialize one; [`QueryGraph::validate`] runs at the
//! start of every session.

use molmatch_common::{Atom, Molecule};
use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::predicate::{AtomPredicate, BondPredicate};

/// A query atom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAtom {
    pub predicate: AtomPredicate,
    /// Atom this query atom was synthesized from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Atom>,
}

impl QueryAtom {
    pub const fn new(predicate: AtomPredicate) -> Self {
        Self {
            predicate,
            origin: None,
        }
    }
}

/// A query bond between two query atoms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBond {
    pub atoms: [usize; 2],
    pub predicate: BondPredicate,
}

/// Graph of atom and bond predicates searched for in a target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGraph {
    #[serde(default)]
    name: String,
    atoms: Vec<QueryAtom>,
    #[serde(default)]
    bonds: Vec<QueryBond>,
}

impl QueryGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    /// Add an atom, returning its index.
    pub fn add_atom(&mut self, predicate: AtomPredicate) -> usize {
        self.atoms.push(QueryAtom::new(predicate));
        self.atoms.len() - 1
    }

    /// Add a bond, returning its index. Endpoints are checked by
    /// [`Self::validate`].
    pub fn add_bond(&mut self, a: usize, b: usize, predicate: BondPredicate) -> usize {
        self.bonds.push(QueryBond {
            atoms: [a, b],
            predicate,
        });
        self.bonds.len() - 1
    }

    /// Query matching `molecule` by element and exact bond order.
    pub fn from_molecule(molecule: &Molecule) -> Self {
        Self::synthesize(molecule, false)
    }

    /// As [`Self::from_molecule`], additionally requiring the recorded
    /// parity of every stereocentre.
    pub fn from_molecule_with_stereo(molecule: &Molecule) -> Self {
        Self::synthesize(molecule, true)
    }

    fn synthesize(molecule: &Molecule, stereo: bool) -> Self {
        let atoms = molecule
            .atoms()
            .iter()
            .map(|atom| {
                let mut predicate = AtomPredicate::Symbol(atom.symbol.clone());
                if let (true, Some(parity)) = (stereo, atom.parity) {
                    predicate = predicate.and(AtomPredicate::Chirality(parity));
                }
                QueryAtom {
                    predicate,
                    origin: Some(atom.clone()),
                }
            })
            .collect();
        let bonds = molecule
            .bonds()
            .iter()
            .map(|bond| QueryBond {
                atoms: bond.atoms(),
                predicate: BondPredicate::ExactOrder(bond.order),
            })
            .collect();
        Self {
            name: molecule.name().to_owned(),
            atoms,
            bonds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[QueryAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[QueryBond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Check bond endpoints, self loops and duplicate bonds.
    pub fn validate(&self) -> Result<(), MatchError> {
        let atom_count = self.atoms.len();
        for (index, bond) in self.bonds.iter().enumerate() {
            let [a, b] = bond.atoms;
            if let Some(&atom) = bond.atoms.iter().find(|&&x| x >= atom_count) {
                return Err(MatchError::DanglingBond {
                    bond: index,
                    atom,
                    atom_count,
                });
            }
            if a == b {
                return Err(MatchError::SelfLoop {
                    bond: index,
                    atom: a,
                });
            }
            if let Some(first) = self.bonds[..index]
                .iter()
                .position(|o| o.atoms == [a, b] || o.atoms == [b, a])
            {
                return Err(MatchError::DuplicateBond {
                    first,
                    second: index,
                });
            }
        }
        Ok(())
    }

    /// `(neighbour atom, bond)` pairs of `atom`, in bond order.
    pub fn neighbors(&self, atom: usize) -> Vec<(usize, usize)> {
        self.bonds
            .iter()
            .enumerate()
            .filter_map(|(index, bond)| match bond.atoms {
                [a, b] if a == atom => Some((b, index)),
                [a, b] if b == atom => Some((a, index)),
                _ => None,
            })
            .collect()
    }

    /// Atoms touched by no bond.
    pub fn isolated_atoms(&self) -> Vec<usize> {
        let mut bonded = vec![false; self.atoms.len()];
        for bond in &self.bonds {
            for &a in &bond.atoms {
                if let Some(flag) = bonded.get_mut(a) {
                    *flag = true;
                }
            }
        }
        (0..self.atoms.len()).filter(|&a| !bonded[a]).collect()
    }

    /// The atom shared by two query bonds, if any.
    pub(crate) fn shared_atom(&self, first: usize, second: usize) -> Option<usize> {
        let a = self.bonds.get(first)?.atoms;
        let b = self.bonds.get(second)?.atoms;
        a.into_iter().find(|x| b.contains(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molmatch_common::{BondOrder, Parity, PROPANE};

    #[test]
    fn synthesized_query_mirrors_molecule() {
        let query = QueryGraph::from_molecule(&PROPANE);
        assert_eq!(query.atom_count(), 3);
        assert_eq!(query.bond_count(), 2);
        assert_eq!(query.atoms()[1].predicate, AtomPredicate::Symbol("C".into()));
        assert_eq!(
            query.bonds()[0].predicate,
            BondPredicate::ExactOrder(BondOrder::Single)
        );
        assert_eq!(query.neighbors(1), vec![(0, 0), (2, 1)]);
        assert!(query.isolated_atoms().is_empty());
        assert_eq!(query.shared_atom(0, 1), Some(1));
    }

    #[test]
    fn stereo_query_adds_chirality() {
        let mol = Molecule::builder("chiral")
            .atom(Atom::new("C").with_parity(Parity::Odd))
            .build()
            .unwrap();
        let query = QueryGraph::from_molecule_with_stereo(&mol);
        assert!(query.atoms()[0].predicate.has_deferred());
        assert!(!QueryGraph::from_molecule(&mol).atoms()[0].predicate.has_deferred());
    }

    #[test]
    fn validation_catches_malformed_bonds() {
        let mut query = QueryGraph::new("bad");
        let a = query.add_atom(AtomPredicate::Any);
        let b = query.add_atom(AtomPredicate::Any);
        query.add_bond(a, b, BondPredicate::AnyOrder);
        assert_eq!(query.validate(), Ok(()));

        let mut dup = query.clone();
        dup.add_bond(b, a, BondPredicate::AnyOrder);
        assert_eq!(
            dup.validate(),
            Err(MatchError::DuplicateBond { first: 0, second: 1 })
        );

        let mut looped = query.clone();
        looped.add_bond(a, a, BondPredicate::AnyOrder);
        assert_eq!(looped.validate(), Err(MatchError::SelfLoop { bond: 1, atom: 0 }));

        let mut dangling = query;
        dangling.add_bond(a, 9, BondPredicate::AnyOrder);
        assert_eq!(
            dangling.validate(),
            Err(MatchError::DanglingBond {
                bond: 1,
                atom: 9,
                atom_count: 2
            })
        );
    }

    #[test]
    fn isolated_atoms_listed() {
        let mut query = QueryGraph::new("q");
        query.add_atom(AtomPredicate::Symbol("O".into()));
        let c1 = query.add_atom(AtomPredicate::Any);
        let c2 = query.add_atom(AtomPredicate::Any);
        query.add_bond(c1, c2, BondPredicate::AnyOrder);
        assert_eq!(query.isolated_atoms(), vec![0]);
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "name": "oh",
            "atoms": [
                {"predicate": {"kind": "symbol", "value": "O"}},
                {"predicate": {"kind": "any"}}
            ],
            "bonds": [
                {"atoms": [0, 1], "predicate": {"kind": "exact-order", "value": "single"}}
            ]
        }"#;
        let query: QueryGraph = serde_json::from_str(json).unwrap();
        assert_eq!(query.name(), "oh");
        assert_eq!(query.atoms()[1].predicate, AtomPredicate::Any);
        assert_eq!(query.validate(), Ok(()));
    }
}
