use std::path::PathBuf;

use clap::Parser;
use molmatch_common::*;

/// molmatch - substructure and maximum common substructure search
#[derive(Parser, Debug)]
#[command(name = "molmatch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Molecule (JSON) used as the query
    #[arg(short = 'q', long, conflicts_with = "pattern", required_unless_present = "pattern")]
    pub query: Option<PathBuf>,

    /// Query graph with explicit predicates (JSON)
    #[arg(short = 'p', long)]
    pub pattern: Option<PathBuf>,

    /// Target molecules (JSON), searched independently
    #[arg(short = 't', long = "target", required = true, num_args = 1..)]
    pub targets: Vec<PathBuf>,

    /// Compare the query molecule with each target, letting the smaller one
    /// play the query, and report similarity
    #[arg(long, default_value_t = false, conflicts_with = "pattern")]
    pub compare: bool,

    /// Search mode
    #[arg(long, value_enum, default_value = "exact")]
    pub mode: ModeArg,

    /// How mappings are de-duplicated
    #[arg(long, value_enum, default_value = "mapping")]
    pub dedupe: DedupeArg,

    /// Which overlap solutions are kept
    #[arg(long, value_enum, default_value = "largest")]
    pub scope: ScopeArg,

    /// Stop after this many mappings per target
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Skip the stereo parity check
    #[arg(long, default_value_t = false)]
    pub no_chirality: bool,
}

impl Args {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .mode(self.mode.clone().into())
            .dedupe(self.dedupe.clone().into())
            .overlap_scope(self.scope.clone().into())
            .check_chirality(!self.no_chirality)
            .limit(self.limit)
            .build()
    }
}

/// Command-line argument wrapper for SearchMode
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ModeArg {
    /// Whole query must embed
    #[value(name = "exact")]
    Exact,
    /// Largest common substructure
    #[value(name = "overlap")]
    Overlap,
}

impl From<ModeArg> for SearchMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Exact => Self::Exact,
            ModeArg::Overlap => Self::Overlap,
        }
    }
}

/// Command-line argument wrapper for Dedupe
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum DedupeArg {
    /// Distinct atom-to-atom mappings
    #[value(name = "mapping")]
    Mapping,
    /// Distinct sets of target atoms
    #[value(name = "target-atoms")]
    TargetAtoms,
}

impl From<DedupeArg> for Dedupe {
    fn from(arg: DedupeArg) -> Self {
        match arg {
            DedupeArg::Mapping => Self::Mapping,
            DedupeArg::TargetAtoms => Self::TargetAtoms,
        }
    }
}

/// Command-line argument wrapper for OverlapScope
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ScopeArg {
    /// Only the largest overlaps
    #[value(name = "largest")]
    Largest,
    /// Every maximal overlap
    #[value(name = "all-maximal")]
    AllMaximal,
}

impl From<ScopeArg> for OverlapScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Largest => Self::Largest,
            ScopeArg::AllMaximal => Self::AllMaximal,
        }
    }
}
