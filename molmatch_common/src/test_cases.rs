//! Common test cases and fixtures for molmatch.
//!
//! This module defines small hand-built molecules and a table of
//! query/target pairs with the number of mappings the matcher is expected
//! to report for each.

use crate::config::{Config, Dedupe};
use crate::molecule::{Atom, BondOrder, Molecule};

/// A complete test case definition.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// The name of the test case.
    pub name: &'static str,
    /// The configuration for the search.
    pub config: Config,
    /// The molecule whose structure is searched for.
    pub query: &'static Molecule,
    /// The molecule searched within.
    pub target: &'static Molecule,
    /// The expected number of mappings.
    pub expected_matches: usize,
}

// #####################
// MOLECULES
// #####################
lazy_static::lazy_static! {
    pub static ref ETHANE: Molecule = Molecule::builder("ethane")
        .chain("C", 2, BondOrder::Single)
        .build()
        .expect("Failed to build ethane");
    pub static ref ETHENE: Molecule = Molecule::builder("ethene")
        .chain("C", 2, BondOrder::Double)
        .build()
        .expect("Failed to build ethene");
    pub static ref PROPANE: Molecule = Molecule::builder("propane")
        .chain("C", 3, BondOrder::Single)
        .build()
        .expect("Failed to build propane");
    pub static ref BUTANE: Molecule = Molecule::builder("butane")
        .chain("C", 4, BondOrder::Single)
        .build()
        .expect("Failed to build butane");
    pub static ref ISOBUTANE: Molecule = Molecule::builder("isobutane")
        .chain("C", 2, BondOrder::Single)
        .atom(Atom::new("C"))
        .atom(Atom::new("C"))
        .bond(0, 2, BondOrder::Single)
        .bond(0, 3, BondOrder::Single)
        .build()
        .expect("Failed to build isobutane");
    pub static ref CYCLOPROPANE: Molecule = Molecule::builder("cyclopropane")
        .ring("C", 3, BondOrder::Single)
        .build()
        .expect("Failed to build cyclopropane");
    pub static ref CYCLOBUTANE: Molecule = Molecule::builder("cyclobutane")
        .ring("C", 4, BondOrder::Single)
        .build()
        .expect("Failed to build cyclobutane");
    pub static ref BENZENE: Molecule = Molecule::builder("benzene")
        .ring("C", 6, BondOrder::Aromatic)
        .build()
        .expect("Failed to build benzene");
    pub static ref TOLUENE: Molecule = Molecule::builder("toluene")
        .ring("C", 6, BondOrder::Aromatic)
        .atom(Atom::new("C").with_hydrogens(3))
        .bond(0, 6, BondOrder::Single)
        .build()
        .expect("Failed to build toluene");
    pub static ref AROMATIC_CC: Molecule = Molecule::builder("aromatic_cc")
        .chain("C", 2, BondOrder::Aromatic)
        .build()
        .expect("Failed to build aromatic C:C");
    pub static ref OXYGEN: Molecule = Molecule::builder("oxygen")
        .atom(Atom::new("O"))
        .build()
        .expect("Failed to build lone oxygen");
    /// Five heavy atoms, one of them oxygen: C-C(-C)-C-O.
    pub static ref BUTANOL: Molecule = Molecule::builder("2-methylpropan-1-ol")
        .chain("C", 3, BondOrder::Single)
        .atom(Atom::new("O"))
        .bond(2, 3, BondOrder::Single)
        .atom(Atom::new("C"))
        .bond(1, 4, BondOrder::Single)
        .build()
        .expect("Failed to build butanol");
}

// #####################
// TEST CASES
// #####################
lazy_static::lazy_static! {
    pub static ref BASIC_TEST_CASES: Vec<TestCase> = vec![
        TestCase {
            name: "ethane_in_cyclobutane",
            config: Config::exact(Dedupe::Mapping),
            query: &ETHANE,
            target: &CYCLOBUTANE,
            expected_matches: 4,
        },
        TestCase {
            name: "propane_in_cyclobutane",
            config: Config::exact(Dedupe::Mapping),
            query: &PROPANE,
            target: &CYCLOBUTANE,
            expected_matches: 8,
        },
        TestCase {
            name: "propane_in_cyclobutane_target_atoms",
            config: Config::exact(Dedupe::TargetAtoms),
            query: &PROPANE,
            target: &CYCLOBUTANE,
            expected_matches: 4,
        },
        TestCase {
            name: "butane_in_cyclobutane",
            config: Config::exact(Dedupe::Mapping),
            query: &BUTANE,
            target: &CYCLOBUTANE,
            expected_matches: 8,
        },
        TestCase {
            name: "butane_in_cyclobutane_target_atoms",
            config: Config::exact(Dedupe::TargetAtoms),
            query: &BUTANE,
            target: &CYCLOBUTANE,
            expected_matches: 1,
        },
        TestCase {
            name: "cyclobutane_self",
            config: Config::exact(Dedupe::Mapping),
            query: &CYCLOBUTANE,
            target: &CYCLOBUTANE,
            expected_matches: 8,
        },
        TestCase {
            name: "propane_in_isobutane",
            config: Config::exact(Dedupe::Mapping),
            query: &PROPANE,
            target: &ISOBUTANE,
            expected_matches: 6,
        },
        TestCase {
            name: "propane_in_isobutane_target_atoms",
            config: Config::exact(Dedupe::TargetAtoms),
            query: &PROPANE,
            target: &ISOBUTANE,
            expected_matches: 3,
        },
        TestCase {
            name: "cyclopropane_in_isobutane",
            config: Config::exact(Dedupe::Mapping),
            query: &CYCLOPROPANE,
            target: &ISOBUTANE,
            expected_matches: 0,
        },
        TestCase {
            name: "isobutane_in_cyclopropane",
            config: Config::exact(Dedupe::Mapping),
            query: &ISOBUTANE,
            target: &CYCLOPROPANE,
            expected_matches: 0,
        },
        TestCase {
            name: "ethane_in_ethene",
            config: Config::exact(Dedupe::Mapping),
            query: &ETHANE,
            target: &ETHENE,
            expected_matches: 0,
        },
        TestCase {
            name: "butane_in_propane",
            config: Config::exact(Dedupe::Mapping),
            query: &BUTANE,
            target: &PROPANE,
            expected_matches: 0,
        },
        TestCase {
            name: "oxygen_in_butanol",
            config: Config::exact(Dedupe::Mapping),
            query: &OXYGEN,
            target: &BUTANOL,
            expected_matches: 1,
        },
        TestCase {
            name: "aromatic_cc_in_toluene",
            config: Config::exact(Dedupe::Mapping),
            query: &AROMATIC_CC,
            target: &TOLUENE,
            expected_matches: 6,
        },
        TestCase {
            name: "butane_overlap_propane",
            config: Config::overlap(Dedupe::Mapping),
            query: &BUTANE,
            target: &PROPANE,
            expected_matches: 4,
        },
    ];
}
