//! Per-target structural invariants.
//!
//! [`InvariantTable::compute`] derives everything predicates may ask about a
//! target atom or bond beyond its own fields: explicit degree, hydrogen
//! counts, valence, and ring information. The table is a pure function of
//! the molecule and never changes once built.

use std::collections::VecDeque;
use std::sync::OnceLock;

use molmatch_common::Molecule;

use crate::error::MatchError;
use crate::profiling::{Phase, Timer};

/// Structural facts about one target atom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AtomInvariants {
    /// Explicit bonds.
    pub degree: u8,
    /// Explicit bonds plus implicit hydrogens.
    pub total_connectivity: u8,
    /// Implicit hydrogens plus explicit hydrogen neighbours.
    pub hydrogens: u8,
    /// Bond valence sum, implicit hydrogens included.
    pub valence: u8,
    /// Number of incident ring bonds.
    pub ring_bonds: u8,
    /// Size of the smallest ring through this atom.
    pub smallest_ring: Option<u8>,
}

impl AtomInvariants {
    pub const fn in_ring(&self) -> bool {
        self.ring_bonds > 0
    }
}

/// Invariants for every atom and bond of one molecule, keyed by index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvariantTable {
    atoms: Vec<AtomInvariants>,
    bond_ring_sizes: Vec<Option<u8>>,
}

impl InvariantTable {
    /// Compute the table for `molecule`.
    pub fn compute(molecule: &Molecule) -> Self {
        let _timer = Timer::new(Phase::Invariants);
        let ring_bonds = ring_bond_flags(molecule);
        let bond_ring_sizes: Vec<Option<u8>> = ring_bonds
            .iter()
            .enumerate()
            .map(|(bond, &in_ring)| {
                if in_ring {
                    smallest_cycle_through(molecule, bond)
                } else {
                    None
                }
            })
            .collect();

        let atoms = (0..molecule.atom_count())
            .map(|index| atom_invariants(molecule, index, &bond_ring_sizes))
            .collect();

        tracing::trace!(
            "computed invariants for '{}': {} ring bonds",
            molecule.name(),
            ring_bonds.iter().filter(|&&r| r).count()
        );

        Self {
            atoms,
            bond_ring_sizes,
        }
    }

    /// Invariants of atom `index`.
    pub fn atom(&self, index: usize) -> Result<&AtomInvariants, MatchError> {
        self.atoms
            .get(index)
            .ok_or(MatchError::MissingInvariants { atom: index })
    }

    /// Whether bond `index` lies on a ring.
    pub fn bond_in_ring(&self, index: usize) -> Result<bool, MatchError> {
        self.bond_ring_size(index).map(|size| size.is_some())
    }

    /// Smallest ring through bond `index`, `None` for chain bonds.
    pub fn bond_ring_size(&self, index: usize) -> Result<Option<u8>, MatchError> {
        self.bond_ring_sizes
            .get(index)
            .copied()
            .ok_or(MatchError::MissingBondInvariants { bond: index })
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bond_ring_sizes.len()
    }
}

fn saturate(value: usize) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

fn atom_invariants(
    molecule: &Molecule,
    index: usize,
    bond_ring_sizes: &[Option<u8>],
) -> AtomInvariants {
    let Some(atom) = molecule.atom(index) else {
        return AtomInvariants::default();
    };
    let neighbors = molecule.neighbors(index);

    let explicit_h = neighbors
        .iter()
        .filter(|n| molecule.atom(n.atom).is_some_and(|a| a.symbol == "H"))
        .count();

    let mut bond_valence = 0usize;
    let mut aromatic_bonds = 0usize;
    let mut ring_bonds = 0usize;
    let mut smallest_ring: Option<u8> = None;
    for n in neighbors {
        if let Some(bond) = molecule.bond(n.bond) {
            bond_valence += usize::from(bond.order.valence());
            if bond.order.is_aromatic() {
                aromatic_bonds += 1;
            }
        }
        if let Some(size) = bond_ring_sizes.get(n.bond).copied().flatten() {
            ring_bonds += 1;
            smallest_ring = Some(smallest_ring.map_or(size, |s| s.min(size)));
        }
    }
    // two aromatic bonds carry one extra bond's worth of valence
    if aromatic_bonds >= 2 {
        bond_valence += 1;
    }

    let implicit = usize::from(atom.implicit_hydrogens);
    AtomInvariants {
        degree: saturate(neighbors.len()),
        total_connectivity: saturate(neighbors.len() + implicit),
        hydrogens: saturate(implicit + explicit_h),
        valence: saturate(bond_valence + implicit),
        ring_bonds: saturate(ring_bonds),
        smallest_ring,
    }
}

/// Marks every bond that is not a bridge.
fn ring_bond_flags(molecule: &Molecule) -> Vec<bool> {
    let n = molecule.atom_count();
    let mut discovery: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0usize; n];
    let mut is_bridge = vec![false; molecule.bond_count()];
    let mut clock = 0usize;

    for root in 0..n {
        if discovery[root].is_some() {
            continue;
        }
        discovery[root] = Some(clock);
        low[root] = clock;
        clock += 1;

        // (atom, bond used to enter it, next neighbour position)
        let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(root, None, 0)];
        while let Some(frame) = stack.last_mut() {
            let (atom, parent_bond, cursor) = *frame;
            let neighbors = molecule.neighbors(atom);
            if let Some(next) = neighbors.get(cursor) {
                frame.2 += 1;
                if Some(next.bond) == parent_bond {
                    continue;
                }
                match discovery[next.atom] {
                    Some(seen) => low[atom] = low[atom].min(seen),
                    None => {
                        discovery[next.atom] = Some(clock);
                        low[next.atom] = clock;
                        clock += 1;
                        stack.push((next.atom, Some(next.bond), 0));
                    }
                }
                continue;
            }

            stack.pop();
            if let (Some(bond), Some(&(parent, _, _))) = (parent_bond, stack.last()) {
                low[parent] = low[parent].min(low[atom]);
                let parent_disc = discovery[parent].unwrap_or(0);
                if low[atom] > parent_disc {
                    is_bridge[bond] = true;
                }
            }
        }
    }

    is_bridge.into_iter().map(|b| !b).collect()
}

/// Length of the shortest cycle containing `bond`: shortest path between
/// its endpoints avoiding the bond itself, plus one.
fn smallest_cycle_through(molecule: &Molecule, bond: usize) -> Option<u8> {
    let [from, to] = molecule.bond(bond)?.atoms();
    let mut dist: Vec<Option<usize>> = vec![None; molecule.atom_count()];
    dist[from] = Some(0);
    let mut queue = VecDeque::from([from]);

    while let Some(atom) = queue.pop_front() {
        let d = dist[atom]?;
        for n in molecule.neighbors(atom) {
            if n.bond == bond || dist[n.atom].is_some() {
                continue;
            }
            if n.atom == to {
                return Some(saturate(d + 2));
            }
            dist[n.atom] = Some(d + 1);
            queue.push_back(n.atom);
        }
    }
    None
}

/// A target molecule paired with its lazily computed invariant table.
///
/// The table is computed at most once, on first use, and may be read from
/// several threads.
#[derive(Debug)]
pub struct TargetContext<'t> {
    molecule: &'t Molecule,
    invariants: OnceLock<InvariantTable>,
}

impl<'t> TargetContext<'t> {
    pub const fn new(molecule: &'t Molecule) -> Self {
        Self {
            molecule,
            invariants: OnceLock::new(),
        }
    }

    /// Wrap a molecule together with a table computed elsewhere.
    pub fn with_invariants(
        molecule: &'t Molecule,
        table: InvariantTable,
    ) -> Result<Self, MatchError> {
        if table.atom_count() != molecule.atom_count() {
            return Err(MatchError::InvariantsMismatch {
                table: table.atom_count(),
                target: molecule.atom_count(),
            });
        }
        if table.bond_count() != molecule.bond_count() {
            return Err(MatchError::BondInvariantsMismatch {
                table: table.bond_count(),
                target: molecule.bond_count(),
            });
        }
        let invariants = OnceLock::new();
        let _ = invariants.set(table);
        Ok(Self {
            molecule,
            invariants,
        })
    }

    pub const fn molecule(&self) -> &'t Molecule {
        self.molecule
    }

    pub fn invariants(&self) -> &InvariantTable {
        self.invariants.get_or_init(|| {
            tracing::debug!("computing invariants for '{}'", self.molecule.name());
            InvariantTable::compute(self.molecule)
        })
    }
}
