//! Session orchestration.
//!
//! This module wires the pipeline together: validate the query, tabulate
//! atom compatibility, build the compatibility graph, enumerate cliques, and
//! assemble them into a [`SolutionSet`]. [`Session`] keeps the inputs
//! alongside the result so atom references can be resolved on demand;
//! [`Comparison`] does the same for two molecules, picking which one plays
//! the query.

use molmatch_common::{Atom, Config, Molecule, SearchMode};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::assembler::Assembler;
use crate::compat::CompatibilityGraph;
use crate::error::MatchError;
use crate::invariants::{InvariantTable, TargetContext};
use crate::mapping::Mapping;
use crate::query::{QueryAtom, QueryGraph};
use crate::search::CliqueSearch;
use crate::solution::SolutionSet;

/// Entry point for substructure and MCS searches.
pub struct SubgraphMatcher<'q, 't, 'cfg> {
    /// The query graph to search for.
    query: &'q QueryGraph,
    /// The molecule to search within.
    target: &'t Molecule,
    /// Invariants of `target`.
    invariants: &'t InvariantTable,
    /// Configuration settings for the matcher.
    config: &'cfg Config,
}

impl<'q, 't, 'cfg> SubgraphMatcher<'q, 't, 'cfg> {
    /// Search `query` in a target, computing its invariants if needed.
    pub fn enumerate(
        query: &'q QueryGraph,
        target: &'t TargetContext<'_>,
        config: &'cfg Config,
    ) -> Result<SolutionSet, MatchError> {
        let matcher = SubgraphMatcher {
            query,
            target: target.molecule(),
            invariants: target.invariants(),
            config,
        };
        matcher.enumerate_solutions()
    }

    /// Search `query` in `target` with a caller-supplied invariant table.
    ///
    /// The table must have been computed for `target`.
    pub fn enumerate_with_invariants(
        query: &'q QueryGraph,
        target: &'t Molecule,
        invariants: &'t InvariantTable,
        config: &'cfg Config,
    ) -> Result<SolutionSet, MatchError> {
        if invariants.atom_count() != target.atom_count() {
            return Err(MatchError::InvariantsMismatch {
                table: invariants.atom_count(),
                target: target.atom_count(),
            });
        }
        if invariants.bond_count() != target.bond_count() {
            return Err(MatchError::BondInvariantsMismatch {
                table: invariants.bond_count(),
                target: target.bond_count(),
            });
        }
        let matcher = SubgraphMatcher {
            query,
            target,
            invariants,
            config,
        };
        matcher.enumerate_solutions()
    }

    /// Independent sessions of one query against many targets, in target
    /// order.
    pub fn enumerate_many(
        query: &'q QueryGraph,
        targets: &[TargetContext<'_>],
        config: &'cfg Config,
    ) -> Vec<Result<SolutionSet, MatchError>> {
        #[cfg(feature = "rayon")]
        let iter = targets.par_iter();
        #[cfg(not(feature = "rayon"))]
        let iter = targets.iter();

        iter.map(|target| SubgraphMatcher::enumerate(query, target, config))
            .collect()
    }

    fn enumerate_solutions(&self) -> Result<SolutionSet, MatchError> {
        tracing::info!(
            "starting {:?} search: query '{}' ({} atoms, {} bonds), target '{}' ({} atoms, {} bonds)",
            self.config.mode,
            self.query.name(),
            self.query.atom_count(),
            self.query.bond_count(),
            self.target.name(),
            self.target.atom_count(),
            self.target.bond_count()
        );

        if self.query.is_empty() {
            tracing::info!("empty query, nothing to match");
            return Ok(SolutionSet::empty());
        }
        if let Err(err) = self.query.validate() {
            tracing::warn!("malformed query '{}': {}", self.query.name(), err);
            return Ok(SolutionSet::empty());
        }

        let mut graph = CompatibilityGraph::build(self.query, self.target, self.invariants)?;
        if graph.is_empty() && self.config.mode == SearchMode::Overlap && self.query.bond_count() > 0
        {
            tracing::debug!("no compatible bond pairs, overlapping on atoms alone");
            graph = CompatibilityGraph::build_atoms_only(self.query, self.target, self.invariants)?;
        }
        let mut assembler = Assembler::new(
            self.query,
            self.target,
            self.invariants,
            &graph,
            self.config,
        );
        let (mappings, _stats) =
            CliqueSearch::new(&graph, self.config).run(|clique| assembler.assemble(clique))?;

        let total_found = mappings.len();
        let solutions =
            SolutionSet::collect(mappings, self.config.mode, self.config.overlap_scope);

        tracing::info!(
            "search complete: found {} mappings, {} kept",
            total_found,
            solutions.len()
        );
        Ok(solutions)
    }
}

/// A query graph matched against one molecule.
#[derive(Clone, Debug)]
pub struct Session<'q, 't> {
    query: &'q QueryGraph,
    target: &'t Molecule,
    solutions: SolutionSet,
}

impl<'q, 't> Session<'q, 't> {
    pub fn new(
        query: &'q QueryGraph,
        target: &TargetContext<'t>,
        config: &Config,
    ) -> Result<Self, MatchError> {
        let solutions = SubgraphMatcher::enumerate(query, target, config)?;
        Ok(Self {
            query,
            target: target.molecule(),
            solutions,
        })
    }

    pub const fn query(&self) -> &'q QueryGraph {
        self.query
    }

    pub const fn target(&self) -> &'t Molecule {
        self.target
    }

    pub const fn solutions(&self) -> &SolutionSet {
        &self.solutions
    }

    pub fn first_mapping(&self) -> Option<&Mapping> {
        self.solutions.first_mapping()
    }

    pub fn all_mappings(&self) -> &[Mapping] {
        self.solutions.all_mappings()
    }

    /// The first mapping as query atom / target atom references.
    pub fn first_atom_mapping(&self) -> Option<Vec<(&'q QueryAtom, &'t Atom)>> {
        self.first_mapping().map(|m| self.resolve(m))
    }

    pub fn all_atom_mappings(&self) -> Vec<Vec<(&'q QueryAtom, &'t Atom)>> {
        self.all_mappings().iter().map(|m| self.resolve(m)).collect()
    }

    fn resolve(&self, mapping: &Mapping) -> Vec<(&'q QueryAtom, &'t Atom)> {
        let query = self.query;
        let target = self.target;
        mapping
            .pairs()
            .filter_map(|(q, t)| Some((query.atoms().get(q)?, target.atom(t)?)))
            .collect()
    }
}

/// One of the two molecules handed to a [`Comparison`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

/// Which molecule of a comparison is searched for in the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Roles {
    pub query: Side,
    pub target: Side,
}

impl Roles {
    /// The smaller molecule plays the query: fewer atoms, then fewer bonds,
    /// then the first argument.
    pub fn choose(first: &Molecule, second: &Molecule) -> Self {
        let first_size = (first.atom_count(), first.bond_count());
        let second_size = (second.atom_count(), second.bond_count());
        if second_size < first_size {
            Self {
                query: Side::Second,
                target: Side::First,
            }
        } else {
            Self {
                query: Side::First,
                target: Side::Second,
            }
        }
    }

    /// Whether both molecules have the same atom and bond counts, in which
    /// case either could play the query.
    pub fn same_size(first: &Molecule, second: &Molecule) -> bool {
        (first.atom_count(), first.bond_count()) == (second.atom_count(), second.bond_count())
    }

    /// Whether the second molecule was chosen as the query.
    pub fn is_swapped(&self) -> bool {
        self.query == Side::Second
    }
}

/// Two molecules compared with each other.
#[derive(Clone, Debug)]
pub struct Comparison<'a> {
    first: &'a Molecule,
    second: &'a Molecule,
    roles: Roles,
    query: QueryGraph,
    solutions: SolutionSet,
}

impl<'a> Comparison<'a> {
    pub fn new(
        first: &'a Molecule,
        second: &'a Molecule,
        config: &Config,
    ) -> Result<Self, MatchError> {
        let roles = Roles::choose(first, second);
        let (query_mol, target_mol) = if roles.is_swapped() {
            (second, first)
        } else {
            (first, second)
        };
        tracing::debug!(
            "comparing '{}' with '{}': '{}' plays the query",
            first.name(),
            second.name(),
            query_mol.name()
        );

        // equal-size molecules are always compared exactly
        let config = if Roles::same_size(first, second) && config.mode != SearchMode::Exact {
            tracing::debug!("equal-size molecules, comparing in exact mode");
            Config {
                mode: SearchMode::Exact,
                ..config.clone()
            }
        } else {
            config.clone()
        };

        let query = QueryGraph::from_molecule_with_stereo(query_mol);
        let target = TargetContext::new(target_mol);
        let solutions = SubgraphMatcher::enumerate(&query, &target, &config)?;
        Ok(Self {
            first,
            second,
            roles,
            query,
            solutions,
        })
    }

    pub const fn roles(&self) -> Roles {
        self.roles
    }

    pub const fn solutions(&self) -> &SolutionSet {
        &self.solutions
    }

    const fn molecule(&self, side: Side) -> &'a Molecule {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    /// Best mapping, query-role indices to target-role indices.
    pub fn first_mapping(&self) -> Option<&Mapping> {
        self.solutions.first_mapping()
    }

    pub fn all_mappings(&self) -> &[Mapping] {
        self.solutions.all_mappings()
    }

    /// The first mapping as (query-role atom, target-role atom) references.
    pub fn first_atom_mapping(&self) -> Option<Vec<(&'a Atom, &'a Atom)>> {
        self.first_mapping().map(|m| self.resolve(m))
    }

    pub fn all_atom_mappings(&self) -> Vec<Vec<(&'a Atom, &'a Atom)>> {
        self.all_mappings().iter().map(|m| self.resolve(m)).collect()
    }

    fn resolve(&self, mapping: &Mapping) -> Vec<(&'a Atom, &'a Atom)> {
        let query = self.molecule(self.roles.query);
        let target = self.molecule(self.roles.target);
        mapping
            .pairs()
            .filter_map(|(q, t)| Some((query.atom(q)?, target.atom(t)?)))
            .collect()
    }

    /// All mappings expressed from first-input indices to second-input
    /// indices, whichever molecule played the query.
    pub fn oriented_mappings(&self) -> Vec<Mapping> {
        self.all_mappings()
            .iter()
            .map(|m| if self.roles.is_swapped() { m.inverse() } else { m.clone() })
            .collect()
    }

    /// The synthesized query graph.
    pub const fn query(&self) -> &QueryGraph {
        &self.query
    }

    /// Squared shared size over the product of both sizes, counting atoms
    /// plus bonds of the best mapping. Zero when nothing matched.
    pub fn similarity(&self) -> f64 {
        let Some(best) = self.first_mapping() else {
            return 0.0;
        };
        let shared = (best.len() + best.bond_count()) as f64;
        let first = (self.first.atom_count() + self.first.bond_count()) as f64;
        let second = (self.second.atom_count() + self.second.bond_count()) as f64;
        if first == 0.0 || second == 0.0 {
            return 0.0;
        }
        shared * shared / (first * second)
    }
}

/// Whether `query` occurs in `target` as an exact substructure, stereo
/// included.
pub fn is_substructure(query: &Molecule, target: &Molecule) -> Result<bool, MatchError> {
    let pattern = QueryGraph::from_molecule_with_stereo(query);
    let context = TargetContext::new(target);
    let config = Config::default().first_only();
    Ok(!SubgraphMatcher::enumerate(&pattern, &context, &config)?.is_empty())
}

/// Whether the two molecules are the same graph, element and bond order
/// included.
pub fn is_isomorphic(first: &Molecule, second: &Molecule) -> Result<bool, MatchError> {
    if first.atom_count() != second.atom_count() || first.bond_count() != second.bond_count() {
        return Ok(false);
    }
    is_substructure(first, second)
}

/// Best common substructure of two molecules as a first-to-second mapping.
pub fn maximum_common_substructure(
    first: &Molecule,
    second: &Molecule,
) -> Result<Option<Mapping>, MatchError> {
    let config = Config::builder().mode(SearchMode::Overlap).build();
    let comparison = Comparison::new(first, second, &config)?;
    Ok(comparison.first_mapping().map(|best| {
        if comparison.roles().is_swapped() {
            best.inverse()
        } else {
            best.clone()
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{AtomPredicate, BondPredicate};
    use molmatch_common::{
        Dedupe, BUTANE, CYCLOBUTANE, ETHANE, ETHENE, ISOBUTANE, OXYGEN, PROPANE, TOLUENE,
    };

    #[test]
    fn empty_query_matches_nothing() {
        let query = QueryGraph::new("empty");
        let target = TargetContext::new(&PROPANE);
        let set = SubgraphMatcher::enumerate(&query, &target, &Config::default()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_query_yields_empty_set() {
        let mut query = QueryGraph::new("loop");
        let a = query.add_atom(AtomPredicate::Any);
        query.add_bond(a, a, BondPredicate::AnyOrder);
        let target = TargetContext::new(&PROPANE);
        let set = SubgraphMatcher::enumerate(&query, &target, &Config::default()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn foreign_invariants_are_rejected() {
        let query = QueryGraph::from_molecule(&ETHANE);
        let table = InvariantTable::compute(&TOLUENE);
        let err = SubgraphMatcher::enumerate_with_invariants(
            &query,
            &PROPANE,
            &table,
            &Config::default(),
        )
        .unwrap_err();
        assert_eq!(err, MatchError::InvariantsMismatch { table: 7, target: 3 });
    }

    #[test]
    fn foreign_bond_invariants_are_rejected() {
        let query = QueryGraph::from_molecule(&ETHANE);
        let table = InvariantTable::compute(&CYCLOBUTANE);
        let err = SubgraphMatcher::enumerate_with_invariants(
            &query,
            &BUTANE,
            &table,
            &Config::default(),
        )
        .unwrap_err();
        assert_eq!(err, MatchError::BondInvariantsMismatch { table: 4, target: 3 });
        assert!(err.is_precondition());
    }

    #[test]
    fn precondition_errors_reach_the_caller() {
        let mut query = QueryGraph::new("ring carbon");
        query.add_atom(AtomPredicate::RingMember(true));
        let own = SubgraphMatcher::enumerate_with_invariants(
            &query,
            &OXYGEN,
            &InvariantTable::compute(&OXYGEN),
            &Config::default(),
        );
        assert!(own.unwrap().is_empty());

        let foreign = InvariantTable::default();
        let err = SubgraphMatcher::enumerate_with_invariants(
            &query,
            &OXYGEN,
            &foreign,
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn session_resolves_atoms() {
        let query = QueryGraph::from_molecule(&ETHANE);
        let target = TargetContext::new(&TOLUENE);
        let session = Session::new(&query, &target, &Config::default()).unwrap();
        // only the methyl bond is single
        assert_eq!(session.all_mappings().len(), 1);
        let atoms = session.first_atom_mapping().unwrap();
        assert_eq!(atoms.len(), 2);
        assert!(atoms.iter().all(|(q, t)| t.symbol == "C" && q.origin.is_some()));
    }

    #[test]
    fn many_targets_in_order() {
        let query = QueryGraph::from_molecule(&PROPANE);
        let targets = [
            TargetContext::new(&ETHANE),
            TargetContext::new(&CYCLOBUTANE),
            TargetContext::new(&ISOBUTANE),
        ];
        let counts: Vec<usize> = SubgraphMatcher::enumerate_many(&query, &targets, &Config::default())
            .into_iter()
            .map(|r| r.unwrap().len())
            .collect();
        assert_eq!(counts, vec![0, 8, 6]);
    }

    #[test]
    fn roles_pick_the_smaller_molecule() {
        assert_eq!(Roles::choose(&PROPANE, &BUTANE).query, Side::First);
        assert_eq!(Roles::choose(&BUTANE, &PROPANE).query, Side::Second);
        // same atoms, fewer bonds wins
        assert_eq!(Roles::choose(&CYCLOBUTANE, &BUTANE).query, Side::Second);
        // full tie keeps the first
        assert_eq!(Roles::choose(&BUTANE, &ISOBUTANE).query, Side::First);
    }

    #[test]
    fn comparison_orients_mappings_first_to_second() {
        let comparison = Comparison::new(&CYCLOBUTANE, &BUTANE, &Config::default()).unwrap();
        assert!(comparison.roles().is_swapped());
        assert_eq!(comparison.all_mappings().len(), 8);
        for m in comparison.oriented_mappings() {
            // first-input indices are cyclobutane atoms
            assert!(m.pairs().all(|(a, b)| a < 4 && b < 4));
            assert_eq!(m.len(), 4);
        }
        let identity = comparison
            .oriented_mappings()
            .into_iter()
            .any(|m| m.pairs().all(|(a, b)| a == b));
        assert!(identity);
    }

    #[test]
    fn similarity_of_identical_molecules_is_one() {
        let comparison = Comparison::new(&PROPANE, &PROPANE, &Config::default()).unwrap();
        assert!((comparison.similarity() - 1.0).abs() < 1e-9);

        let unrelated = Comparison::new(&OXYGEN, &PROPANE, &Config::default()).unwrap();
        assert_eq!(unrelated.similarity(), 0.0);
    }

    #[test]
    fn convenience_functions() {
        assert!(is_substructure(&PROPANE, &CYCLOBUTANE).unwrap());
        assert!(!is_substructure(&CYCLOBUTANE, &PROPANE).unwrap());
        assert!(is_isomorphic(&CYCLOBUTANE, &CYCLOBUTANE).unwrap());
        assert!(!is_isomorphic(&BUTANE, &ISOBUTANE).unwrap());

        let mcs = maximum_common_substructure(&BUTANE, &PROPANE).unwrap().unwrap();
        assert_eq!(mcs.bond_count(), 2);
        // butane is the first input but propane played the query
        assert!(mcs.pairs().all(|(a, b)| a < 4 && b < 3));
    }

    #[test]
    fn equal_size_comparison_runs_exact() {
        let overlap = Config::overlap(Dedupe::Mapping);
        let comparison = Comparison::new(&BUTANE, &ISOBUTANE, &overlap).unwrap();
        assert!(comparison.solutions().is_empty());
        assert_eq!(comparison.similarity(), 0.0);

        let same = Comparison::new(&CYCLOBUTANE, &CYCLOBUTANE, &overlap).unwrap();
        assert_eq!(same.all_mappings().len(), 8);
        assert!((same.similarity() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn overlap_without_bond_pairs_matches_atoms() {
        let mcs = maximum_common_substructure(&ETHENE, &PROPANE).unwrap().unwrap();
        assert_eq!(mcs.bond_count(), 0);
        assert_eq!(mcs.len(), 2);

        let query = QueryGraph::from_molecule(&ETHENE);
        let target = TargetContext::new(&PROPANE);
        let exact = SubgraphMatcher::enumerate(&query, &target, &Config::default()).unwrap();
        assert!(exact.is_empty());
        let overlap =
            SubgraphMatcher::enumerate(&query, &target, &Config::overlap(Dedupe::Mapping)).unwrap();
        assert_eq!(overlap.len(), 6);
    }

    #[test]
    fn target_atom_dedupe_collapses_symmetry() {
        let query = QueryGraph::from_molecule(&BUTANE);
        let target = TargetContext::new(&CYCLOBUTANE);
        let set =
            SubgraphMatcher::enumerate(&query, &target, &Config::exact(Dedupe::TargetAtoms))
                .unwrap();
        assert_eq!(set.len(), 1);
    }
}
