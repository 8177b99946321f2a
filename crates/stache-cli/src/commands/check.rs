//! Implementation of the `stache check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use miette::{miette, Report, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use stache::parse_template;

use crate::output::TemplateDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct CheckJson {
    file: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorJson>,
}

#[derive(Debug, Serialize)]
struct ErrorJson {
    line: usize,
    column: usize,
    message: String,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let mut results = Vec::with_capacity(args.files.len());
    let mut failed = 0;

    for path in &args.files {
        let content = read_to_string(path)
            .map_err(|e| miette!("Cannot read template file {}: {}", path.display(), e))?;

        match parse_template(&content) {
            Ok(_) => {
                if !args.json {
                    println!("{} {}", "ok".green(), path.display());
                }
                results.push(CheckJson {
                    file: path.display().to_string(),
                    ok: true,
                    error: None,
                });
            }
            Err(e) => {
                failed += 1;
                if !args.json {
                    let diagnostic = TemplateDiagnostic::from_parse_error(path, &content, &e);
                    eprintln!("{:?}", Report::new(diagnostic));
                }
                results.push(CheckJson {
                    file: path.display().to_string(),
                    ok: false,
                    error: Some(ErrorJson {
                        line: e.line,
                        column: e.column,
                        message: e.message(),
                    }),
                });
            }
        }
    }

    if args.json {
        let json_output = serde_json::to_string_pretty(&results)
            .map_err(|e| miette!("Failed to serialize output: {}", e))?;
        println!("{}", json_output);
    } else if failed > 0 {
        eprintln!("{} of {} template(s) failed to parse", failed, results.len());
    }

    if failed > 0 {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
