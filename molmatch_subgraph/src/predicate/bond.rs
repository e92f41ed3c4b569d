use molmatch_common::{Bond, BondOrder};
use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::invariants::InvariantTable;

/// A test applied to a target bond.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum BondPredicate {
    /// Accepts every bond.
    AnyOrder,
    /// Bond order equals.
    ExactOrder(BondOrder),
    /// Single or aromatic, the implicit SMARTS bond.
    AromaticOrSingle,
    /// Bond is (or is not) on a ring.
    RingBond(bool),
    And(Vec<BondPredicate>),
    Or(Vec<BondPredicate>),
    Not(Box<BondPredicate>),
}

impl BondPredicate {
    /// Whether target bond `index` satisfies the predicate.
    pub fn accepts(
        &self,
        index: usize,
        bond: &Bond,
        invariants: &InvariantTable,
    ) -> Result<bool, MatchError> {
        let ok = match self {
            Self::AnyOrder => true,
            Self::ExactOrder(order) => bond.order == *order,
            Self::AromaticOrSingle => matches!(bond.order, BondOrder::Single | BondOrder::Aromatic),
            Self::RingBond(ring) => invariants.bond_in_ring(index)? == *ring,
            Self::And(ps) => {
                for p in ps {
                    if !p.accepts(index, bond, invariants)? {
                        return Ok(false);
                    }
                }
                true
            }
            Self::Or(ps) => {
                for p in ps {
                    if p.accepts(index, bond, invariants)? {
                        return Ok(true);
                    }
                }
                false
            }
            Self::Not(p) => !p.accepts(index, bond, invariants)?,
        };
        Ok(ok)
    }

    pub fn requires_invariants(&self) -> bool {
        match self {
            Self::RingBond(_) => true,
            Self::And(ps) | Self::Or(ps) => ps.iter().any(Self::requires_invariants),
            Self::Not(p) => p.requires_invariants(),
            _ => false,
        }
    }
}
