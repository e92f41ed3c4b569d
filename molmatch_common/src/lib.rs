//! Common utilities and shared types for the molmatch workspace.
//!
//! This crate provides the molecular graph model consumed by the matcher,
//! search configuration handling, and common test cases used across the
//! molmatch project.

mod config;
pub mod molecule;
mod test_cases;

pub use crate::config::*;
pub use crate::molecule::{
    Atom, Bond, BondOrder, GraphError, Molecule, MoleculeBuilder, Neighbor, Parity, ReactionRole,
};
pub use crate::test_cases::*;
