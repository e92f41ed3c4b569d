#![allow(dead_code)]

use molmatch_common::{Atom, Bond, BondOrder, Molecule};
use molmatch_subgraph::{AtomPredicate, BondPredicate, QueryGraph};
use quickcheck::{Arbitrary, Gen};

pub use molmatch_subgraph::test_harness::setup_test_logging;

const SYMBOLS: [&str; 3] = ["C", "N", "O"];
const MAX_BONDS: usize = 9;

/// A small random molecule: 2 to 7 atoms of C, N or O, sparse single and
/// double bonds.
#[derive(Clone, Debug)]
pub struct ArbitraryMolecule(pub Molecule);

impl Arbitrary for ArbitraryMolecule {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(random_molecule(g, 2, 7))
    }
}

/// A random query-sized molecule: 1 to 4 atoms.
#[derive(Clone, Debug)]
pub struct ArbitraryQuery(pub Molecule);

impl Arbitrary for ArbitraryQuery {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(random_molecule(g, 1, 4))
    }
}

/// A random query graph whose atoms and bonds carry predicate trees over
/// the topological leaves, combinators included.
#[derive(Clone, Debug)]
pub struct ArbitraryPattern(pub QueryGraph);

impl Arbitrary for ArbitraryPattern {
    fn arbitrary(g: &mut Gen) -> Self {
        let shape = random_molecule(g, 1, 4);
        let mut query = QueryGraph::new("random pattern");
        for _ in shape.atoms() {
            query.add_atom(atom_predicate(g, 2));
        }
        for bond in shape.bonds() {
            let [a, b] = bond.atoms();
            query.add_bond(a, b, bond_predicate(g, 2));
        }
        Self(query)
    }
}

fn small(g: &mut Gen, bound: u8) -> u8 {
    u8::arbitrary(g) % bound
}

fn atom_predicate(g: &mut Gen, depth: u8) -> AtomPredicate {
    let pick = if depth == 0 { small(g, 11) } else { small(g, 14) };
    match pick {
        0 => AtomPredicate::Any,
        1 => AtomPredicate::Symbol((*g.choose(&SYMBOLS).unwrap_or(&"C")).to_owned()),
        2 => AtomPredicate::SymbolSet(vec!["C".into(), "N".into()]),
        3 => AtomPredicate::Aromatic(bool::arbitrary(g)),
        4 => AtomPredicate::Charge(0),
        5 => AtomPredicate::Degree(small(g, 4)),
        6 => AtomPredicate::TotalConnectivity(small(g, 4)),
        7 => AtomPredicate::TotalHydrogens(small(g, 2)),
        8 => AtomPredicate::RingMember(bool::arbitrary(g)),
        9 => AtomPredicate::RingSize(3 + small(g, 4)),
        10 => AtomPredicate::Valence(small(g, 5)),
        11 => AtomPredicate::And(vec![atom_predicate(g, depth - 1), atom_predicate(g, depth - 1)]),
        12 => AtomPredicate::Or(vec![atom_predicate(g, depth - 1), atom_predicate(g, depth - 1)]),
        _ => AtomPredicate::Not(Box::new(atom_predicate(g, depth - 1))),
    }
}

fn bond_predicate(g: &mut Gen, depth: u8) -> BondPredicate {
    let pick = if depth == 0 { small(g, 5) } else { small(g, 8) };
    match pick {
        0 => BondPredicate::AnyOrder,
        1 => BondPredicate::ExactOrder(BondOrder::Single),
        2 => BondPredicate::ExactOrder(BondOrder::Double),
        3 => BondPredicate::AromaticOrSingle,
        4 => BondPredicate::RingBond(bool::arbitrary(g)),
        5 => BondPredicate::And(vec![bond_predicate(g, depth - 1), bond_predicate(g, depth - 1)]),
        6 => BondPredicate::Or(vec![bond_predicate(g, depth - 1), bond_predicate(g, depth - 1)]),
        _ => BondPredicate::Not(Box::new(bond_predicate(g, depth - 1))),
    }
}

fn random_molecule(g: &mut Gen, min_atoms: usize, max_atoms: usize) -> Molecule {
    let span = (max_atoms - min_atoms + 1) as u8;
    let n = min_atoms + usize::from(u8::arbitrary(g) % span);

    let atoms: Vec<Atom> = (0..n)
        .map(|_| Atom::new(*g.choose(&SYMBOLS).unwrap_or(&"C")))
        .collect();

    let mut bonds = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            if bonds.len() < MAX_BONDS && u8::arbitrary(g) % 3 == 0 {
                let order = if u8::arbitrary(g) % 4 == 0 {
                    BondOrder::Double
                } else {
                    BondOrder::Single
                };
                bonds.push(Bond::new(a, b, order));
            }
        }
    }

    Molecule::new("random", atoms, bonds).expect("generated molecules are well formed")
}

/// The edge-induced subgraph on `bonds` (indices into `molecule`), with
/// atoms renumbered in ascending order. Returns the subgraph and, for each
/// of its atoms, the original atom index.
pub fn bond_subgraph(molecule: &Molecule, bonds: &[usize]) -> (Molecule, Vec<usize>) {
    let mut original: Vec<usize> = bonds
        .iter()
        .filter_map(|&b| molecule.bond(b))
        .flat_map(|b| b.atoms())
        .collect();
    original.sort_unstable();
    original.dedup();

    let renumber = |atom: usize| original.iter().position(|&x| x == atom).unwrap_or(0);
    let atoms = original
        .iter()
        .map(|&a| molecule.atoms()[a].clone())
        .collect();
    let sub_bonds = bonds
        .iter()
        .filter_map(|&b| molecule.bond(b))
        .map(|b| {
            let [x, y] = b.atoms();
            Bond::new(renumber(x), renumber(y), b.order)
        })
        .collect();

    let sub = Molecule::new("subgraph", atoms, sub_bonds).expect("subgraph is well formed");
    (sub, original)
}
