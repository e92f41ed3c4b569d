use molmatch_common::{Atom, Parity, ReactionRole};
use serde::{Deserialize, Serialize};

use super::{ChiralityContext, Stage};
use crate::error::MatchError;
use crate::invariants::InvariantTable;

/// A test applied to a target atom.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum AtomPredicate {
    /// Accepts every atom.
    Any,
    /// Element symbol equals.
    Symbol(String),
    /// Element symbol is one of.
    SymbolSet(Vec<String>),
    /// Aromatic flag equals.
    Aromatic(bool),
    /// Formal charge equals.
    Charge(i8),
    /// Explicit degree equals.
    Degree(u8),
    /// Explicit degree plus implicit hydrogens equals.
    TotalConnectivity(u8),
    /// Total hydrogen count equals.
    TotalHydrogens(u8),
    /// Atom is (or is not) on a ring.
    RingMember(bool),
    /// Smallest ring through the atom has this size.
    RingSize(u8),
    /// Total valence equals.
    Valence(u8),
    /// Reaction role is one of.
    ReactionRole(Vec<ReactionRole>),
    /// Stereo parity relative to the query atom's neighbour order. Deferred.
    Chirality(Parity),
    And(Vec<AtomPredicate>),
    Or(Vec<AtomPredicate>),
    Not(Box<AtomPredicate>),
}

impl AtomPredicate {
    /// Topological acceptance of target atom `index`.
    ///
    /// Chirality always passes here; see [`Self::chirality_matches`].
    pub fn accepts(
        &self,
        index: usize,
        atom: &Atom,
        invariants: &InvariantTable,
    ) -> Result<bool, MatchError> {
        self.evaluate(index, atom, invariants, Stage::Topological)
    }

    /// Full evaluation, deferred predicates included.
    pub fn chirality_matches(
        &self,
        index: usize,
        atom: &Atom,
        invariants: &InvariantTable,
        context: &ChiralityContext,
    ) -> Result<bool, MatchError> {
        self.evaluate(index, atom, invariants, Stage::Deferred(context))
    }

    /// Whether any leaf reads the invariant table.
    pub fn requires_invariants(&self) -> bool {
        match self {
            Self::Degree(_)
            | Self::TotalConnectivity(_)
            | Self::TotalHydrogens(_)
            | Self::RingMember(_)
            | Self::RingSize(_)
            | Self::Valence(_) => true,
            Self::And(ps) | Self::Or(ps) => ps.iter().any(Self::requires_invariants),
            Self::Not(p) => p.requires_invariants(),
            _ => false,
        }
    }

    /// Whether any leaf is deferred until the mapping is complete.
    pub fn has_deferred(&self) -> bool {
        match self {
            Self::Chirality(_) => true,
            Self::And(ps) | Self::Or(ps) => ps.iter().any(Self::has_deferred),
            Self::Not(p) => p.has_deferred(),
            _ => false,
        }
    }

    /// Conjunction of `self` and `other`, flattening nested conjunctions.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Any, p) | (p, Self::Any) => p,
            (Self::And(mut ps), Self::And(qs)) => {
                ps.extend(qs);
                Self::And(ps)
            }
            (Self::And(mut ps), q) => {
                ps.push(q);
                Self::And(ps)
            }
            (p, q) => Self::And(vec![p, q]),
        }
    }

    pub(crate) fn evaluate(
        &self,
        index: usize,
        atom: &Atom,
        invariants: &InvariantTable,
        stage: Stage<'_>,
    ) -> Result<bool, MatchError> {
        let ok = match self {
            Self::Any => true,
            Self::Symbol(symbol) => atom.symbol == *symbol,
            Self::SymbolSet(symbols) => symbols.iter().any(|s| *s == atom.symbol),
            Self::Aromatic(aromatic) => atom.aromatic == *aromatic,
            Self::Charge(charge) => atom.charge == *charge,
            Self::Degree(d) => invariants.atom(index)?.degree == *d,
            Self::TotalConnectivity(x) => invariants.atom(index)?.total_connectivity == *x,
            Self::TotalHydrogens(h) => invariants.atom(index)?.hydrogens == *h,
            Self::RingMember(member) => invariants.atom(index)?.in_ring() == *member,
            Self::RingSize(size) => invariants.atom(index)?.smallest_ring == Some(*size),
            Self::Valence(v) => invariants.atom(index)?.valence == *v,
            Self::ReactionRole(roles) => atom.role.is_some_and(|r| roles.contains(&r)),
            Self::Chirality(parity) => match stage {
                Stage::Topological => true,
                Stage::Deferred(context) => context.matches(*parity),
            },
            Self::And(ps) => {
                for p in ps {
                    if !p.evaluate(index, atom, invariants, stage)? {
                        return Ok(false);
                    }
                }
                true
            }
            Self::Or(ps) => {
                for p in ps {
                    if p.evaluate(index, atom, invariants, stage)? {
                        return Ok(true);
                    }
                }
                false
            }
            Self::Not(p) => {
                if matches!(stage, Stage::Topological) && p.has_deferred() {
                    true
                } else {
                    !p.evaluate(index, atom, invariants, stage)?
                }
            }
        };
        Ok(ok)
    }
}
