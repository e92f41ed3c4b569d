//! Clique-based substructure and maximum-common-substructure matching for
//! molecular graphs.
//!
//! A query (a [`QueryGraph`] of atom and bond predicates, or a plain
//! [`Molecule`](molmatch_common::Molecule) turned into one) is compared with
//! a target molecule by building a compatibility graph of query/target bond
//! pairs and enumerating its cliques. Exact mode reports embeddings of the
//! whole query; overlap mode reports the largest common substructures.
//!
//! ```
//! use molmatch_common::{Config, CYCLOBUTANE, PROPANE};
//! use molmatch_subgraph::{QueryGraph, SubgraphMatcher, TargetContext};
//!
//! let query = QueryGraph::from_molecule(&PROPANE);
//! let target = TargetContext::new(&CYCLOBUTANE);
//! let found = SubgraphMatcher::enumerate(&query, &target, &Config::default()).unwrap();
//! assert_eq!(found.len(), 8);
//! ```

mod assembler;
pub mod compat;
mod error;
pub mod invariants;
mod mapping;
mod matcher;
pub mod predicate;
pub mod profiling;
mod query;
pub mod search;
mod solution;
pub mod test_harness;

pub use error::MatchError;
pub use invariants::{AtomInvariants, InvariantTable, TargetContext};
pub use mapping::Mapping;
pub use matcher::{
    Comparison, Roles, Session, Side, SubgraphMatcher, is_isomorphic, is_substructure,
    maximum_common_substructure,
};
pub use predicate::{AtomPredicate, BondPredicate, ChiralityContext};
pub use query::{QueryAtom, QueryBond, QueryGraph};
pub use solution::SolutionSet;
