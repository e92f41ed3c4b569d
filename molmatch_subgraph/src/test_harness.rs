//! Helpers shared by unit and integration tests.

use std::sync::Once;

use molmatch_common::{Config, ConfigBuilder, Molecule};

use crate::invariants::TargetContext;
use crate::matcher::SubgraphMatcher;
use crate::query::QueryGraph;

static INIT: Once = Once::new();

/// Configures logging for the test runner.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One query/target pair with its expected mapping count.
pub struct TestSpec<'a> {
    /// Molecule turned into the query.
    pub query: &'a Molecule,
    /// Molecule searched within.
    pub target: &'a Molecule,
    /// Number of distinct mappings expected.
    pub expected_count: usize,
    /// Optional configuration builder to override defaults.
    pub config_fn: Option<fn(ConfigBuilder) -> ConfigBuilder>,
}

/// Run one query against one target and compare the mapping count.
#[track_caller]
pub fn run_match_test(spec: TestSpec) -> Result<(), Box<dyn std::error::Error>> {
    setup_test_logging();

    let mut builder = Config::builder();
    if let Some(f) = spec.config_fn {
        builder = f(builder);
    }
    let config = builder.build();

    let query = QueryGraph::from_molecule_with_stereo(spec.query);
    let target = TargetContext::new(spec.target);
    let solutions = SubgraphMatcher::enumerate(&query, &target, &config)?;

    if solutions.len() != spec.expected_count {
        tracing::error!(
            "expected {} mappings, found {} for query '{}' in target '{}'",
            spec.expected_count,
            solutions.len(),
            spec.query.name(),
            spec.target.name()
        );
        return Err(format!(
            "expected {} mappings, found {}",
            spec.expected_count,
            solutions.len()
        )
        .into());
    }

    Ok(())
}

/// Defines a test matching one molecule in another.
#[macro_export]
macro_rules! match_test {
    (
        name: $test_name:ident,
        query: $query:expr,
        target: $target:expr,
        expect: $count:expr
    ) => {
        #[test]
        fn $test_name() -> Result<(), Box<dyn std::error::Error>> {
            $crate::test_harness::run_match_test($crate::test_harness::TestSpec {
                query: &$query,
                target: &$target,
                expected_count: $count,
                config_fn: None,
            })
        }
    };

    (
        name: $test_name:ident,
        query: $query:expr,
        target: $target:expr,
        expect: $count:expr,
        config: $cfg_closure:expr
    ) => {
        #[test]
        fn $test_name() -> Result<(), Box<dyn std::error::Error>> {
            $crate::test_harness::run_match_test($crate::test_harness::TestSpec {
                query: &$query,
                target: &$target,
                expected_count: $count,
                config_fn: Some($cfg_closure),
            })
        }
    };
}
