/// Which way a query bond lies on a target bond.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Query atom 0 onto target atom 0.
    Forward,
    /// Query atom 0 onto target atom 1.
    Reverse,
}

/// A query bond that may correspond to a target bond.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    pub query_bond: usize,
    pub target_bond: usize,
    pub query_atoms: [usize; 2],
    pub target_atoms: [usize; 2],
    /// Atom predicates hold in the forward orientation.
    pub forward: bool,
    /// Atom predicates hold in the reverse orientation.
    pub reverse: bool,
}

impl CandidatePair {
    /// Valid orientations, forward first.
    pub fn orientations(&self) -> impl Iterator<Item = Orientation> {
        let forward = self.forward.then_some(Orientation::Forward);
        let reverse = self.reverse.then_some(Orientation::Reverse);
        forward.into_iter().chain(reverse)
    }

    /// The two `(query atom, target atom)` correspondences of `orientation`.
    pub const fn atom_pairs(&self, orientation: Orientation) -> [(usize, usize); 2] {
        let [q0, q1] = self.query_atoms;
        let [t0, t1] = self.target_atoms;
        match orientation {
            Orientation::Forward => [(q0, t0), (q1, t1)],
            Orientation::Reverse => [(q0, t1), (q1, t0)],
        }
    }

    /// Where `orientation` sends `query_atom`.
    pub fn target_of(&self, orientation: Orientation, query_atom: usize) -> Option<usize> {
        self.atom_pairs(orientation)
            .into_iter()
            .find(|&(q, _)| q == query_atom)
            .map(|(_, t)| t)
    }

    /// Whether some valid orientation sends `query_atom` onto `target_atom`.
    pub fn can_map(&self, query_atom: usize, target_atom: usize) -> bool {
        self.orientations()
            .any(|o| self.target_of(o, query_atom) == Some(target_atom))
    }
}

/// A query atom that may correspond to a target atom; nodes of the
/// compatibility graph of a bond-less query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtomPair {
    pub query_atom: usize,
    pub target_atom: usize,
}
