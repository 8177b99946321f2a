//! Implementation of the `stache spec` command.
//!
//! Runs conformance suites in the standard Mustache fixture format:
//! `{"tests": [{"name", "desc", "template", "data", "partials", "expected"}]}`.

use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use miette::{miette, Result};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use stache::{render_with_partials, Value};
use tracing::debug;

use crate::output::table::{format_suite_table, Outcome, SuiteSummary};

/// Arguments for the spec command.
#[derive(Debug, clap::Args)]
pub struct SpecArgs {
    /// Fixture suite files (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Deserialize)]
struct Suite {
    tests: Vec<Fixture>,
}

/// One conformance fixture.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub template: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub partials: HashMap<String, String>,
    pub expected: String,
}

/// Result of running one fixture.
#[derive(Debug, Serialize)]
pub struct FixtureResult {
    pub suite: String,
    pub name: String,
    pub passed: bool,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl FixtureResult {
    fn outcome(&self) -> Outcome {
        match (self.skipped, self.passed) {
            (true, _) => Outcome::Skipped,
            (false, true) => Outcome::Passed,
            (false, false) => Outcome::Failed,
        }
    }
}

/// Whether the data embeds host-language lambda source (`{"__tag__": "code"}`).
fn has_code(value: &Value) -> bool {
    match value {
        Value::Map(map) => {
            map.get("__tag__").and_then(Value::as_str) == Some("code")
                || map.values().any(has_code)
        }
        Value::List(items) => items.iter().any(has_code),
        _ => false,
    }
}

/// Run a single fixture.
pub fn run_fixture(suite: &str, fixture: &Fixture) -> FixtureResult {
    if has_code(&fixture.data) {
        debug!(suite, name = %fixture.name, "skipping fixture with code data");
        return FixtureResult {
            suite: suite.to_string(),
            name: fixture.name.clone(),
            passed: false,
            skipped: true,
            actual: None,
        };
    }

    debug!(suite, name = %fixture.name, desc = %fixture.desc, "running fixture");
    let actual = match render_with_partials(&fixture.template, &fixture.data, &fixture.partials) {
        Ok(output) => output,
        Err(e) => e.to_string(),
    };
    let passed = actual == fixture.expected;
    FixtureResult {
        suite: suite.to_string(),
        name: fixture.name.clone(),
        passed,
        skipped: false,
        actual: (!passed).then_some(actual),
    }
}

/// Load and run every fixture in a suite file.
pub fn run_suite(path: &Path) -> Result<Vec<FixtureResult>> {
    let content = read_to_string(path)
        .map_err(|e| miette!("Cannot read suite file {}: {}", path.display(), e))?;
    let suite: Suite = serde_json::from_str(&content)
        .map_err(|e| miette!("Failed to parse suite file {}: {}", path.display(), e))?;
    let name = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());

    Ok(suite
        .tests
        .iter()
        .map(|fixture| run_fixture(&name, fixture))
        .collect())
}

/// Run the spec command.
pub fn run_spec(args: SpecArgs) -> Result<i32> {
    let mut results = Vec::new();
    let mut summaries = Vec::new();

    for path in &args.files {
        let suite_results = run_suite(path)?;
        let count = |outcome: Outcome| {
            suite_results
                .iter()
                .filter(|r| r.outcome() == outcome)
                .count()
        };
        summaries.push(SuiteSummary {
            suite: suite_results
                .first()
                .map_or_else(|| path.display().to_string(), |r| r.suite.clone()),
            passed: count(Outcome::Passed),
            failed: count(Outcome::Failed),
            skipped: count(Outcome::Skipped),
        });
        results.extend(suite_results);
    }

    let any_failed = summaries.iter().any(|s| s.failed > 0);

    if args.json {
        let json_output = serde_json::to_string_pretty(&results)
            .map_err(|e| miette!("Failed to serialize output: {}", e))?;
        println!("{}", json_output);
    } else {
        for result in results.iter().filter(|r| r.outcome() == Outcome::Failed) {
            println!("{} {}: {}", "fail".red(), result.suite, result.name);
        }
        println!("{}", format_suite_table(&summaries));
    }

    if any_failed {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
