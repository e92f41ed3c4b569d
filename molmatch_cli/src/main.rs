//! molmatch CLI
//!
//! Loads JSON-encoded molecules or query graphs, runs one matching session
//! per target, and prints the mappings found as JSON index pairs.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use std::fs;
use std::path::Path;

use clap::Parser;
use molmatch_common::Molecule;
use molmatch_subgraph::{Comparison, Mapping, QueryGraph, SubgraphMatcher, TargetContext};
use serde::Serialize;
use tracing::info;

use args::Args;

/// Result of searching one target.
#[derive(Serialize)]
struct TargetReport {
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_is_target: Option<bool>,
    mappings: Vec<Mapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TargetReport {
    fn new(target: &Molecule) -> Self {
        Self {
            target: target.name().to_owned(),
            similarity: None,
            query_is_target: None,
            mappings: Vec::new(),
            error: None,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value =
        serde_json::from_str(&text).map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    Ok(value)
}

/// Executes the molmatch search.
///
/// This function:
/// 1. Initializes logging
/// 2. Parses command-line arguments
/// 3. Loads the query and every target
/// 4. Runs one session per target
/// 5. Prints the reports as JSON
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = args.to_config();

    let targets: Vec<Molecule> = args
        .targets
        .iter()
        .map(|path| read_json(path))
        .collect::<Result<_, _>>()?;
    info!("loaded {} targets", targets.len());

    let reports: Vec<TargetReport> = if args.compare {
        let path = args.query.as_deref().ok_or("--compare needs --query")?;
        let first: Molecule = read_json(path)?;
        targets
            .iter()
            .map(|target| {
                let mut report = TargetReport::new(target);
                match Comparison::new(&first, target, &config) {
                    Ok(comparison) => {
                        report.similarity = Some(comparison.similarity());
                        report.query_is_target = Some(comparison.roles().is_swapped());
                        report.mappings = comparison.oriented_mappings();
                    }
                    Err(err) => report.error = Some(err.to_string()),
                }
                report
            })
            .collect()
    } else {
        let query: QueryGraph = match (&args.pattern, &args.query) {
            (Some(path), _) => read_json(path)?,
            (None, Some(path)) => QueryGraph::from_molecule_with_stereo(&read_json(path)?),
            (None, None) => return Err("either --query or --pattern is required".into()),
        };
        info!("query '{}': {} atoms", query.name(), query.atom_count());

        let contexts: Vec<TargetContext<'_>> = targets.iter().map(TargetContext::new).collect();
        SubgraphMatcher::enumerate_many(&query, &contexts, &config)
            .into_iter()
            .zip(&targets)
            .map(|(result, target)| {
                let mut report = TargetReport::new(target);
                match result {
                    Ok(solutions) => report.mappings = solutions.into_mappings(),
                    Err(err) => report.error = Some(err.to_string()),
                }
                report
            })
            .collect()
    };

    println!("{}", serde_json::to_string_pretty(&reports)?);
    molmatch_subgraph::profiling::report();

    Ok(())
}
