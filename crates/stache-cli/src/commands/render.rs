//! Implementation of the `stache render` command.

use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use miette::{miette, Result};
use serde::Serialize;
use stache::{Delimiters, RenderError, Renderer, Value};
use tracing::debug;

use crate::output::TemplateDiagnostic;

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Template file to render
    pub template: PathBuf,

    /// JSON file with the data to render against
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Partials in name=path format (repeatable)
    #[arg(short = 'p', long = "partial", value_parser = parse_key_val)]
    pub partials: Vec<(String, PathBuf)>,

    /// Starting delimiters as "OPEN CLOSE", e.g. "<% %>"
    #[arg(long, value_parser = parse_delimiters)]
    pub delimiters: Option<Delimiters>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for render results.
#[derive(Serialize)]
pub struct RenderOutput {
    pub result: String,
}

/// Parse a name=path partial argument.
fn parse_key_val(s: &str) -> Result<(String, PathBuf), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid partial format '{}': expected name=path", s))?;
    Ok((s[..pos].to_string(), PathBuf::from(&s[pos + 1..])))
}

/// Parse an "OPEN CLOSE" delimiter pair.
fn parse_delimiters(s: &str) -> Result<Delimiters, String> {
    match s.split_whitespace().collect::<Vec<_>>()[..] {
        [open, close] => Ok(Delimiters::new(open, close)),
        _ => Err(format!(
            "invalid delimiters '{}': expected two markers separated by whitespace",
            s
        )),
    }
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    read_to_string(path).map_err(|e| miette!("Cannot read {} file {}: {}", what, path.display(), e))
}

/// Load render data from a JSON file; no file means an empty map.
pub fn load_data(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Map(HashMap::new()));
    };
    let content = read_file(path, "data")?;
    serde_json::from_str(&content)
        .map_err(|e| miette!("Failed to parse data file {}: {}", path.display(), e))
}

/// Read every partial named on the command line into a map.
pub fn load_partials(partials: &[(String, PathBuf)]) -> Result<HashMap<String, String>> {
    partials
        .iter()
        .map(|(name, path)| Ok((name.clone(), read_file(path, "partial")?)))
        .collect()
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> Result<i32> {
    let content = read_file(&args.template, "template")?;
    let data = load_data(args.data.as_deref())?;
    let partials = load_partials(&args.partials)?;
    debug!(partials = partials.len(), "loaded render inputs");

    let renderer = Renderer::builder()
        .partials(partials)
        .delimiters(args.delimiters.unwrap_or_default())
        .build();

    // Parse up front so template errors point into the template file.
    let template = renderer
        .parse(&content)
        .map_err(|e| TemplateDiagnostic::from_parse_error(&args.template, &content, &e))?;

    match renderer.render_template(&template, &data) {
        Ok(result) => {
            if args.json {
                let output = RenderOutput { result };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output)
                        .map_err(|e| miette!("Failed to serialize output: {}", e))?
                );
            } else {
                print!("{}", result);
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            report_render_error(&e, args.json);
            Ok(exitcode::DATAERR)
        }
    }
}

fn report_render_error(e: &RenderError, json: bool) {
    if json {
        let output = serde_json::json!({ "error": e.to_string() });
        eprintln!("{}", output);
    } else {
        eprintln!("Render error: {}", e);
    }
}
