//! Query-side predicates.
//!
//! Predicates are closed enums with `And`/`Or`/`Not` combinators. Every
//! predicate except chirality is decided topologically, while the
//! compatibility graph is built. Chirality is deferred until a mapping is
//! otherwise complete and the mapped neighbourhoods are known.

mod atom;
mod bond;
mod chirality;

pub use atom::AtomPredicate;
pub use bond::BondPredicate;
pub use chirality::{ChiralityContext, permutation_parity};

/// Evaluation stage for atom predicates.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Stage<'c> {
    /// Deferred predicates are assumed to hold.
    Topological,
    /// Everything is decided, chirality against the given context.
    Deferred(&'c ChiralityContext),
}
