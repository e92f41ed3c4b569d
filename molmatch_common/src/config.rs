//! Configuration for the substructure / MCS search.
//!
//! This module exposes a small, stable surface for consumers (for example,
//! the `molmatch_subgraph` crate and the CLI) to parameterize how matching
//! should behave.
//!
//! The main concepts are:
//! - mode: exact subgraph isomorphism, or largest common overlap.
//! - dedupe: how to collapse mappings after search (by the full canonical
//!   mapping, or by the set of target atoms covered).
//! - overlap scope: in overlap mode, keep only the largest common
//!   substructures or every maximal one.
//!
//! Quick examples
//!
//! Exact mode, full dedupe (default behavior):
//! ```
//! use molmatch_common::{Config, SearchMode};
//! let cfg = Config::default();
//! assert_eq!(cfg.mode, SearchMode::Exact);
//! ```
//!
//! Overlap mode listing every maximal common substructure:
//! ```
//! use molmatch_common::{Config, OverlapScope, SearchMode};
//! let cfg = Config::builder()
//!     .mode(SearchMode::Overlap)
//!     .overlap_scope(OverlapScope::AllMaximal)
//!     .build();
//! assert_eq!(cfg.overlap_scope, OverlapScope::AllMaximal);
//! ```

use serde::{Deserialize, Serialize};

/// Which kind of correspondence the search looks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Every query bond (or atom, for bond-less queries) must be matched.
    #[default]
    Exact,
    /// Maximum common substructure: the query may be matched partially.
    Overlap,
}

/// Control how mappings are deduplicated.
///
/// - Mapping:
///     Two mappings are distinct if any query atom maps to a different
///     target atom. Automorphic embeddings of a symmetric query are kept.
/// - TargetAtoms:
///     Two mappings are the same if they cover the same SET of target atoms,
///     regardless of which query atom lands where (collapses automorphisms).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dedupe {
    /// Compare full canonical mappings.
    #[default]
    Mapping,
    /// Collapse mappings that cover the same target atoms.
    TargetAtoms,
}

/// Which overlap-mode solutions are retained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapScope {
    /// Keep only the largest common substructures and prune anything that
    /// cannot reach them.
    #[default]
    Largest,
    /// Keep every maximal common substructure, no pruning.
    AllMaximal,
}

/// Global search configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// Exact or overlap search.
    pub mode: SearchMode,
    /// How to deduplicate mappings.
    pub dedupe: Dedupe,
    /// Which overlap solutions are kept. Ignored in exact mode.
    pub overlap_scope: OverlapScope,
    /// Whether deferred chirality predicates are evaluated.
    pub check_chirality: bool,
    /// Stop after this many accepted mappings.
    pub limit: Option<usize>,
}

impl Config {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Convenience: exact mode with the provided dedupe mode.
    pub fn exact(dedupe: Dedupe) -> Self {
        Self::builder().mode(SearchMode::Exact).dedupe(dedupe).build()
    }

    /// Convenience: overlap mode with the provided dedupe mode.
    pub fn overlap(dedupe: Dedupe) -> Self {
        Self::builder().mode(SearchMode::Overlap).dedupe(dedupe).build()
    }

    /// Same configuration but stopping after the first accepted mapping.
    pub fn first_only(&self) -> Self {
        Self {
            limit: Some(1),
            ..self.clone()
        }
    }
}

impl Default for Config {
    /// Exact mode, full-mapping dedupe, largest overlaps, chirality checked,
    /// no limit.
    fn default() -> Self {
        Self {
            mode: SearchMode::Exact,
            dedupe: Dedupe::Mapping,
            overlap_scope: OverlapScope::Largest,
            check_chirality: true,
            limit: None,
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the search mode.
    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the dedupe mode.
    pub fn dedupe(mut self, dedupe: Dedupe) -> Self {
        self.config.dedupe = dedupe;
        self
    }

    /// Set which overlap solutions are kept.
    pub fn overlap_scope(mut self, scope: OverlapScope) -> Self {
        self.config.overlap_scope = scope;
        self
    }

    /// Enable or disable the deferred chirality check.
    pub fn check_chirality(mut self, check: bool) -> Self {
        self.config.check_chirality = check;
        self
    }

    /// Stop after `limit` accepted mappings. `None` enumerates everything.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.config.limit = limit;
        self
    }

    /// Finish building.
    pub fn build(self) -> Config {
        self.config
    }
}
