use super::{Atom, Bond, BondOrder, GraphError, Molecule};

/// Chainable construction of a [`Molecule`].
///
/// Validation is deferred to [`MoleculeBuilder::build`].
///
/// ```
/// use molmatch_common::{Atom, BondOrder, Molecule};
///
/// let ethanol = Molecule::builder("ethanol")
///     .chain("C", 2, BondOrder::Single)
///     .atom(Atom::new("O"))
///     .bond(1, 2, BondOrder::Single)
///     .build()
///     .unwrap();
/// assert_eq!(ethanol.atom_count(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MoleculeBuilder {
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl MoleculeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    /// Index the next added atom will receive.
    pub fn next_index(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom(mut self, atom: Atom) -> Self {
        self.atoms.push(atom);
        self
    }

    pub fn bond(mut self, a: usize, b: usize, order: BondOrder) -> Self {
        self.bonds.push(Bond::new(a, b, order));
        self
    }

    /// Append `len` atoms of `symbol` joined into a path.
    pub fn chain(mut self, symbol: &str, len: usize, order: BondOrder) -> Self {
        let start = self.atoms.len();
        for i in 0..len {
            self.atoms.push(Atom::new(symbol));
            if i > 0 {
                self.bonds.push(Bond::new(start + i - 1, start + i, order));
            }
        }
        self
    }

    /// Append `len` atoms of `symbol` closed into a ring. Aromatic rings get
    /// aromatic atoms as well as aromatic bonds.
    pub fn ring(mut self, symbol: &str, len: usize, order: BondOrder) -> Self {
        let start = self.atoms.len();
        self = self.chain(symbol, len, order);
        if order.is_aromatic() {
            for atom in &mut self.atoms[start..] {
                atom.aromatic = true;
            }
        }
        if len > 2 {
            self.bonds.push(Bond::new(start + len - 1, start, order));
        }
        self
    }

    /// Mutate the most recently added atom.
    pub fn last_atom(mut self, f: impl FnOnce(Atom) -> Atom) -> Self {
        if let Some(atom) = self.atoms.pop() {
            self.atoms.push(f(atom));
        }
        self
    }

    pub fn build(self) -> Result<Molecule, GraphError> {
        Molecule::new(self.name, self.atoms, self.bonds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_closes_and_marks_aromatic() {
        let benzene = MoleculeBuilder::new("benzene")
            .ring("C", 6, BondOrder::Aromatic)
            .build()
            .unwrap();
        assert_eq!(benzene.bond_count(), 6);
        assert!(benzene.atoms().iter().all(|a| a.aromatic));
        assert!(benzene.neighbors(0).iter().any(|n| n.atom == 5));
    }

    #[test]
    fn chain_offsets_after_existing_atoms() {
        let mol = MoleculeBuilder::new("x")
            .atom(Atom::new("O"))
            .chain("C", 3, BondOrder::Single)
            .bond(0, 1, BondOrder::Single)
            .build()
            .unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_between(1, 2), Some(0));
        assert_eq!(mol.bond_between(0, 1), Some(2));
    }

    #[test]
    fn last_atom_edits_in_place() {
        let mol = MoleculeBuilder::new("x")
            .atom(Atom::new("N"))
            .last_atom(|a| a.with_charge(1))
            .build()
            .unwrap();
        assert_eq!(mol.atom(0).map(|a| a.charge), Some(1));
    }
}
