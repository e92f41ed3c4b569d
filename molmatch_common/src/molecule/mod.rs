//! Molecular graph representation.
//!
//! A [`Molecule`] is an ordered list of atoms and an ordered list of bonds,
//! with an adjacency list derived at construction time. Construction
//! validates the bond list, so a `Molecule` in hand is always well formed.
//! Aromaticity and stereo parity are precomputed inputs: this crate never
//! perceives them.

mod builder;

pub use builder::MoleculeBuilder;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A bond refers to an atom index that does not exist.
    #[error("bond {bond} references atom {atom}, but the molecule has {atom_count} atoms")]
    DanglingBond {
        bond: usize,
        atom: usize,
        atom_count: usize,
    },
    /// A bond joins an atom to itself.
    #[error("bond {bond} joins atom {atom} to itself")]
    SelfLoop { bond: usize, atom: usize },
    /// Two bonds join the same pair of atoms.
    #[error("bonds {first} and {second} join the same pair of atoms")]
    DuplicateBond { first: usize, second: usize },
}

/// Bond order classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Integral contribution to an atom's valence. Aromatic bonds count as
    /// single here; see the invariant table for the aromatic correction.
    pub const fn valence(self) -> u8 {
        match self {
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Whether the bond is flagged aromatic.
    pub const fn is_aromatic(self) -> bool {
        matches!(self, Self::Aromatic)
    }
}

/// Parity of a stereocentre or of a permutation.
///
/// Atom parities are relative to the atom's neighbour order (bond order in
/// the molecule). Composition follows sign multiplication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Parity of a permutation with `inversions` inversions.
    pub const fn from_inversions(inversions: usize) -> Self {
        if inversions % 2 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    /// The opposite parity.
    pub const fn flip(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }

    /// Apply a permutation parity on top of this one.
    pub const fn compose(self, other: Self) -> Self {
        match other {
            Self::Even => self,
            Self::Odd => self.flip(),
        }
    }
}

/// Role an atom plays in a reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionRole {
    Reactant,
    Product,
    Agent,
}

/// An atom in a molecular graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    /// Element symbol, e.g. `"C"`.
    pub symbol: String,
    /// Formal charge.
    #[serde(default)]
    pub charge: i8,
    /// Precomputed aromaticity flag.
    #[serde(default)]
    pub aromatic: bool,
    /// Hydrogens not present as explicit atoms.
    #[serde(default)]
    pub implicit_hydrogens: u8,
    /// Precomputed stereo parity, if the atom is a stereocentre.
    #[serde(default)]
    pub parity: Option<Parity>,
    /// Reaction role, if the molecule takes part in a reaction.
    #[serde(default)]
    pub role: Option<ReactionRole>,
}

impl Atom {
    /// A neutral, non-aromatic atom of the given element.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            charge: 0,
            aromatic: false,
            implicit_hydrogens: 0,
            parity: None,
            role: None,
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_aromatic(mut self, aromatic: bool) -> Self {
        self.aromatic = aromatic;
        self
    }

    pub fn with_hydrogens(mut self, hydrogens: u8) -> Self {
        self.implicit_hydrogens = hydrogens;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = Some(parity);
        self
    }

    pub fn with_role(mut self, role: ReactionRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// A bond between two atoms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    atoms: [usize; 2],
    /// Bond order, `Aromatic` doubling as the aromaticity tag.
    pub order: BondOrder,
}

impl Bond {
    pub const fn new(first: usize, second: usize, order: BondOrder) -> Self {
        Self {
            atoms: [first, second],
            order,
        }
    }

    /// Endpoint atom indices, in declaration order.
    pub const fn atoms(&self) -> [usize; 2] {
        self.atoms
    }

    pub const fn contains(&self, atom: usize) -> bool {
        self.atoms[0] == atom || self.atoms[1] == atom
    }

    /// The endpoint opposite `atom`, if `atom` is an endpoint.
    pub const fn other(&self, atom: usize) -> Option<usize> {
        if self.atoms[0] == atom {
            Some(self.atoms[1])
        } else if self.atoms[1] == atom {
            Some(self.atoms[0])
        } else {
            None
        }
    }

    /// The atom shared with `other`, if the two bonds are adjacent.
    pub const fn shared_atom(&self, other: &Self) -> Option<usize> {
        if other.contains(self.atoms[0]) {
            Some(self.atoms[0])
        } else if other.contains(self.atoms[1]) {
            Some(self.atoms[1])
        } else {
            None
        }
    }
}

/// One entry of an atom's adjacency list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighbor {
    pub atom: usize,
    pub bond: usize,
}

/// A molecular graph with atoms, bonds, and adjacency information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMolecule", into = "RawMolecule")]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// adjacency[atom] lists neighbours in bond order
    adjacency: Vec<Vec<Neighbor>>,
}

impl Molecule {
    /// Build a molecule, validating every bond.
    pub fn new(
        name: impl Into<String>,
        atoms: Vec<Atom>,
        bonds: Vec<Bond>,
    ) -> Result<Self, GraphError> {
        let adjacency = build_adjacency(atoms.len(), &bonds)?;
        Ok(Self {
            name: name.into(),
            atoms,
            bonds,
            adjacency,
        })
    }

    pub fn builder(name: impl Into<String>) -> MoleculeBuilder {
        MoleculeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn bond(&self, index: usize) -> Option<&Bond> {
        self.bonds.get(index)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Neighbours of `atom` in bond order. Empty for unknown indices.
    pub fn neighbors(&self, atom: usize) -> &[Neighbor] {
        self.adjacency.get(atom).map_or(&[], Vec::as_slice)
    }

    /// Number of explicit bonds on `atom`.
    pub fn degree(&self, atom: usize) -> usize {
        self.neighbors(atom).len()
    }

    /// Index of the bond joining `a` and `b`, if any.
    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.neighbors(a)
            .iter()
            .find(|n| n.atom == b)
            .map(|n| n.bond)
    }
}

fn build_adjacency(atom_count: usize, bonds: &[Bond]) -> Result<Vec<Vec<Neighbor>>, GraphError> {
    let mut adjacency: Vec<Vec<Neighbor>> = vec![Vec::new(); atom_count];

    for (index, bond) in bonds.iter().enumerate() {
        let [a, b] = bond.atoms();
        for atom in [a, b] {
            if atom >= atom_count {
                tracing::trace!("rejecting bond {index}: atom {atom} out of range");
                return Err(GraphError::DanglingBond {
                    bond: index,
                    atom,
                    atom_count,
                });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop {
                bond: index,
                atom: a,
            });
        }
        if let Some(existing) = adjacency[a].iter().find(|n| n.atom == b) {
            return Err(GraphError::DuplicateBond {
                first: existing.bond,
                second: index,
            });
        }
        adjacency[a].push(Neighbor { atom: b, bond: index });
        adjacency[b].push(Neighbor { atom: a, bond: index });
    }

    Ok(adjacency)
}

/// Serialized shape of a molecule; validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawMolecule {
    #[serde(default)]
    name: String,
    atoms: Vec<Atom>,
    #[serde(default)]
    bonds: Vec<Bond>,
}

impl TryFrom<RawMolecule> for Molecule {
    type Error = GraphError;

    fn try_from(raw: RawMolecule) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.atoms, raw.bonds)
    }
}

impl From<Molecule> for RawMolecule {
    fn from(mol: Molecule) -> Self {
        Self {
            name: mol.name,
            atoms: mol.atoms,
            bonds: mol.bonds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carbons(n: usize) -> Vec<Atom> {
        (0..n).map(|_| Atom::new("C")).collect()
    }

    #[test]
    fn adjacency_follows_bond_order() {
        let mol = Molecule::new(
            "propane",
            carbons(3),
            vec![
                Bond::new(1, 0, BondOrder::Single),
                Bond::new(1, 2, BondOrder::Single),
            ],
        )
        .unwrap();

        let n: Vec<usize> = mol.neighbors(1).iter().map(|n| n.atom).collect();
        assert_eq!(n, vec![0, 2]);
        assert_eq!(mol.degree(1), 2);
        assert_eq!(mol.bond_between(2, 1), Some(1));
        assert_eq!(mol.bond_between(0, 2), None);
        assert!(mol.neighbors(17).is_empty());
    }

    #[test]
    fn rejects_dangling_bond() {
        let err = Molecule::new("bad", carbons(2), vec![Bond::new(0, 5, BondOrder::Single)])
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingBond {
                bond: 0,
                atom: 5,
                atom_count: 2
            }
        );
    }

    #[test]
    fn rejects_self_loop_and_duplicates() {
        let looped = Molecule::new("loop", carbons(1), vec![Bond::new(0, 0, BondOrder::Single)]);
        assert!(matches!(looped, Err(GraphError::SelfLoop { bond: 0, atom: 0 })));

        let doubled = Molecule::new(
            "dup",
            carbons(2),
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(1, 0, BondOrder::Double),
            ],
        );
        assert!(matches!(
            doubled,
            Err(GraphError::DuplicateBond { first: 0, second: 1 })
        ));
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"name":"x","atoms":[{"symbol":"C"}],"bonds":[{"atoms":[0,3],"order":"single"}]}"#;
        let parsed: Result<Molecule, _> = serde_json::from_str(json);
        assert!(parsed.is_err());

        let json = r#"{"atoms":[{"symbol":"C"},{"symbol":"O","charge":-1}],"bonds":[{"atoms":[0,1],"order":"single"}]}"#;
        let mol: Molecule = serde_json::from_str(json).unwrap();
        assert_eq!(mol.atom(1).map(|a| a.charge), Some(-1));
        assert_eq!(mol.bond_count(), 1);
    }

    #[test]
    fn shared_atom_between_bonds() {
        let a = Bond::new(0, 1, BondOrder::Single);
        let b = Bond::new(2, 1, BondOrder::Single);
        let c = Bond::new(2, 3, BondOrder::Single);
        assert_eq!(a.shared_atom(&b), Some(1));
        assert_eq!(a.shared_atom(&c), None);
        assert_eq!(b.other(2), Some(1));
        assert_eq!(b.other(0), None);
    }

    #[test]
    fn parity_composition() {
        assert_eq!(Parity::from_inversions(0), Parity::Even);
        assert_eq!(Parity::from_inversions(3), Parity::Odd);
        assert_eq!(Parity::Odd.compose(Parity::Odd), Parity::Even);
        assert_eq!(Parity::Even.compose(Parity::Odd), Parity::Odd);
    }
}
