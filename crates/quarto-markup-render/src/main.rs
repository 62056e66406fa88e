/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Command-line front end for rendering markup templates
 */

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use quarto_markup::{ComponentMap, Value, parse_markup_text, render_ir_to_text, render_ir_to_tree};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "quarto-markup-render")]
#[command(about = "Render an interpolated markup template")]
struct Args {
    /// Markup template file; `[[[N]]]` marks substitution slot N
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// JSON file containing an array of substitution values
    #[arg(long, value_name = "JSON_FILE")]
    values: Option<PathBuf>,

    /// Backend used to render the template
    #[arg(long, value_enum, default_value_t = OutputMode::Text)]
    output: OutputMode,

    /// Verbose output (can be used multiple times: -v, -vv)
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Verbose output (-v for debug logging, -vv for trace logging)"
    )]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// Markup string
    Text,
    /// Live node tree, serialized after rendering
    Tree,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = run(&args)?;
    println!("{}", output);

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "quarto_markup=info",
        1 => "quarto_markup=debug",
        _ => "quarto_markup=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<String> {
    let markup = fs::read_to_string(&args.template)
        .context(format!("Failed to read template: {:?}", args.template))?;

    let values = match &args.values {
        Some(path) => read_values(path)?,
        None => Vec::new(),
    };

    render_markup(&markup, &args.template.display().to_string(), &values, args.output)
}

fn read_values(path: &Path) -> Result<Vec<Value>> {
    let json = fs::read_to_string(path)
        .context(format!("Failed to read substitution values: {:?}", path))?;
    load_values(&json).context(format!("Invalid substitution values in {:?}", path))
}

/// Parse a JSON array into substitution values.
fn load_values(json: &str) -> Result<Vec<Value>> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).context("Substitution values are not valid JSON")?;

    match parsed {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(Value::from).collect()),
        other => anyhow::bail!(
            "Substitution values must be a JSON array, found {}",
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn render_markup(markup: &str, name: &str, values: &[Value], mode: OutputMode) -> Result<String> {
    let ir = parse_markup_text(markup, &ComponentMap::new())
        .map_err(|err| anyhow::anyhow!("{}", err.to_report(markup, name)))?;

    tracing::debug!(
        template = name,
        nodes = ir.count_nodes(),
        values = values.len(),
        "Parsed template"
    );

    let output = match mode {
        OutputMode::Text => pollster::block_on(render_ir_to_text(&ir, values)?.resolve())?,
        OutputMode::Tree => {
            let tree = pollster::block_on(render_ir_to_tree(&ir, values)?.resolve())?;
            tree.to_markup()
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_values() {
        let values = load_values(r#"["a", 1, true, null, ["x", "y"]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::from("a"),
                Value::from(1),
                Value::from(true),
                Value::Null,
                Value::from(vec!["x", "y"]),
            ]
        );
    }

    #[test]
    fn test_load_values_requires_array() {
        let err = load_values(r#"{"a": 1}"#).unwrap_err();
        assert!(err.to_string().contains("an object"));

        assert!(load_values("not json").is_err());
    }

    #[test]
    fn test_render_markup_text_and_tree() {
        let markup = "<ul>\n  <li>[[[0]]]</li>\n  <li>[[[1]]]</li>\n</ul>";
        let values = load_values(r#"["one", 2]"#).unwrap();

        let text = render_markup(markup, "list.xml", &values, OutputMode::Text).unwrap();
        let tree = render_markup(markup, "list.xml", &values, OutputMode::Tree).unwrap();

        assert_eq!(text, "<ul> <li>one</li> <li>2</li> </ul>");
        assert_eq!(tree, text);
    }

    #[test]
    fn test_syntax_error_includes_report() {
        let err = render_markup("<p>", "broken.xml", &[], OutputMode::Text).unwrap_err();
        assert!(err.to_string().contains("broken.xml"));
    }

    #[test]
    fn test_missing_value_is_reported() {
        let err = render_markup("<p>[[[3]]]</p>", "t.xml", &[], OutputMode::Tree).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_run_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("greeting.xml");
        let values = dir.path().join("values.json");

        fs::File::create(&template)
            .unwrap()
            .write_all(b"<div>Hello [[[0]]]!</div>")
            .unwrap();
        fs::write(&values, r#"["world"]"#).unwrap();

        let args = Args {
            template,
            values: Some(values),
            output: OutputMode::Tree,
            verbose: 0,
        };
        assert_eq!(run(&args).unwrap(), "<div>Hello world!</div>");
    }
}
