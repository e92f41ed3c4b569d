//! Error types for matching sessions.
//!
//! Precondition violations surface before any search starts (the atom
//! compatibility table is built up front). Malformed queries are reported
//! here too, but the orchestration layer turns them into empty results.

use thiserror::Error;

/// Errors that can occur while preparing or running a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    // === Precondition violations ===
    /// A predicate needed per-atom invariants the table does not hold.
    #[error("no invariants recorded for target atom {atom}")]
    MissingInvariants { atom: usize },

    /// A predicate needed per-bond invariants the table does not hold.
    #[error("no invariants recorded for target bond {bond}")]
    MissingBondInvariants { bond: usize },

    /// A caller-supplied invariant table was computed for another molecule.
    #[error("invariant table covers {table} atoms but the target has {target}")]
    InvariantsMismatch { table: usize, target: usize },

    /// As [`Self::InvariantsMismatch`], for the per-bond part of the table.
    #[error("invariant table covers {table} bonds but the target has {target}")]
    BondInvariantsMismatch { table: usize, target: usize },

    // === Malformed query ===
    /// A query bond refers to a query atom that does not exist.
    #[error("query bond {bond} references atom {atom}, but the query has {atom_count} atoms")]
    DanglingBond {
        bond: usize,
        atom: usize,
        atom_count: usize,
    },

    /// A query bond joins an atom to itself.
    #[error("query bond {bond} joins atom {atom} to itself")]
    SelfLoop { bond: usize, atom: usize },

    /// Two query bonds join the same pair of atoms.
    #[error("query bonds {first} and {second} join the same pair of atoms")]
    DuplicateBond { first: usize, second: usize },
}

impl MatchError {
    /// Whether this error is a precondition violation that must reach the
    /// caller, as opposed to a malformed query that yields no results.
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingInvariants { .. }
                | Self::MissingBondInvariants { .. }
                | Self::InvariantsMismatch { .. }
                | Self::BondInvariantsMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_classification() {
        assert!(MatchError::MissingInvariants { atom: 3 }.is_precondition());
        assert!(MatchError::InvariantsMismatch { table: 2, target: 4 }.is_precondition());
        assert!(MatchError::BondInvariantsMismatch { table: 5, target: 4 }.is_precondition());
        assert!(!MatchError::SelfLoop { bond: 0, atom: 1 }.is_precondition());
        assert!(!MatchError::DuplicateBond { first: 0, second: 2 }.is_precondition());
    }

    #[test]
    fn messages_name_the_indices() {
        let err = MatchError::DanglingBond {
            bond: 1,
            atom: 7,
            atom_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "query bond 1 references atom 7, but the query has 3 atoms"
        );
    }
}
