//! Minimal CLI: load schema → validate (files | globs | ndjson | jq) → report
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, Args};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use crate::document::load_schema_file;
use crate::validate::{Validator, ValidatorOptions, DEFAULT_MAX_DEPTH};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against a schema document
#[derive(Parser, Debug)]
#[command(name = "json-vet", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document and report the first mismatch of each
    Check(CheckOut),
    /// print a schema document in combinator notation
    Explain(ExplainOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    /// schema document (.json)
    #[arg(long, short)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    /// schema levels to descend before failing with "too deep"
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// only report rejected documents
    #[arg(long, short)]
    quiet: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ExplainOut {
    /// schema document (.json)
    #[arg(long, short)]
    schema: PathBuf,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One value to validate, with where it came from.
#[derive(Debug)]
pub struct Document {
    pub origin: String,
    pub value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let mut out = Vec::new();
        for (origin, source) in self.read_sources()? {
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let origin = format!("{origin}:{}", line_no + 1);
                    let value = serde_json::from_str::<Value>(line)
                        .with_context(|| format!("failed to parse NDJSON line ({origin})"))?;
                    self.push_selected(&mut out, origin, value)?;
                }
            } else {
                let value = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({origin})"))?;
                self.push_selected(&mut out, origin, value)?;
            }
        }
        Ok(out)
    }

    fn read_sources(&self) -> Result<Vec<(String, String)>> {
        let mut sources = Vec::new();
        for raw in &self.input {
            if raw == "-" {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .context("failed to read stdin")?;
                sources.push(("<stdin>".to_string(), source));
                continue;
            }
            for source_path in resolve_file_path_patterns([raw])? {
                let origin = source_path.to_string_lossy().to_string();
                let source = std::fs::read_to_string(&source_path)
                    .with_context(|| format!("failed to read source file ({origin})"))?;
                sources.push((origin, source));
            }
        }
        Ok(sources)
    }

    /// pointer first, then jq
    fn push_selected(&self, out: &mut Vec<Document>, origin: String, value: Value) -> Result<()> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(ptr) => match value.pointer(ptr) {
                Some(selected) => selected.clone(),
                None => bail!("JSON pointer {ptr} selects nothing in {origin}"),
            },
        };
        match self.jq_expr.as_deref() {
            None => out.push(Document { origin, value }),
            Some(jq_expr) => {
                let results = crate::jq_exec::run_filter(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression ({origin})"))?;
                for (i, value) in results.into_iter().enumerate() {
                    out.push(Document { origin: format!("{origin}#{i}"), value });
                }
            }
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS)
                }

                // 1) schema
                let schema = load_schema_file(&target.schema)?;
                let validator = Validator::new(ValidatorOptions { max_depth: target.max_depth });
                tracing::info!(schema = %target.schema.display(), depth = schema.depth(), "schema loaded");

                // 2) documents
                let documents = target.input_settings.load_documents()?;
                tracing::info!(count = documents.len(), "documents loaded");

                // 3) validate in parallel, report in input order
                let verdicts = documents
                    .par_iter()
                    .map(|doc| validator.validate(&schema, &doc.value).err())
                    .collect::<Vec<_>>();

                let mut rejected = 0usize;
                for (doc, verdict) in documents.iter().zip(&verdicts) {
                    match verdict {
                        None => {
                            if !target.quiet {
                                println!("{} {}", "✔".green(), doc.origin);
                            }
                        }
                        Some(error) => {
                            rejected += 1;
                            let at = match error.path() {
                                p if p.is_empty() => String::new(),
                                p => format!(" (at {p})"),
                            };
                            println!("{} {}{}", "✘".red(), doc.origin.bold(), at.dimmed());
                            println!("  {error}");
                        }
                    }
                }

                let summary = format!("{} documents, {} rejected", documents.len(), rejected);
                if rejected == 0 {
                    eprintln!("{}", summary.green());
                    Ok(ExitCode::SUCCESS)
                } else {
                    eprintln!("{}", summary.red());
                    Ok(ExitCode::FAILURE)
                }
            }
            Command::Explain(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS)
                }

                let schema = load_schema_file(&target.schema)?;
                println!("{schema}");
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
            out.push(entry?);
        }
        if out.len() == before {
            // explicit glob that matched nothing is an error, not an empty run
            bail!("glob pattern matched no files: {pattern}");
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(input: &str) -> InputSettings {
        InputSettings { ndjson: false, json_pointer: None, jq_expr: None, input: vec![input.into()] }
    }

    fn scratch(name: &str, contents: &str) -> PathBuf {
        scratch_file(name, "input.json", contents)
    }

    fn scratch_file(name: &str, file_name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("json-vet-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const ID_SCHEMA: &str = r#"{ "type": "object", "properties": [
        { "type": "property", "key": "id", "schema": { "type": "number" } }
    ] }"#;

    fn run(args: &[&str]) -> ExitCode {
        let cli = CommandLineInterface::try_parse_from(args).unwrap();
        cli.run().unwrap()
    }

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a/b.json"]).unwrap();
        assert_eq!(out, vec![PathBuf::from("a/b.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }

    #[test]
    fn ndjson_lines_become_documents() {
        let path = scratch("ndjson", "{\"a\": 1}\n\n[2]\n");
        let mut s = settings(path.to_str().unwrap());
        s.ndjson = true;
        let docs = s.load_documents().unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[1].origin.ends_with(":3"));
        assert_eq!(docs[1].value, serde_json::json!([2]));
    }

    #[test]
    fn pointer_then_jq() {
        let path = scratch("pointer", r#"{"data": {"items": [1, 2, 3]}}"#);
        let mut s = settings(path.to_str().unwrap());
        s.json_pointer = Some("/data/items".into());
        s.jq_expr = Some(".[] | select(. > 1)".into());
        let docs = s.load_documents().unwrap();
        let values = docs.iter().map(|d| d.value.clone()).collect::<Vec<_>>();
        assert_eq!(values, vec![serde_json::json!(2), serde_json::json!(3)]);
        assert!(docs[0].origin.ends_with("#0"));
    }

    #[test]
    fn check_exit_code_follows_verdicts() {
        let schema = scratch_file("exit", "schema.json", ID_SCHEMA);
        let good = scratch_file("exit", "good.json", r#"{"id": 1}"#);
        let bad = scratch_file("exit", "bad.json", r#"{"id": "1"}"#);
        let schema = schema.to_str().unwrap();
        let good = good.to_str().unwrap();
        let bad = bad.to_str().unwrap();

        assert_eq!(run(&["json-vet", "check", "-s", schema, "-i", good]), ExitCode::SUCCESS);
        assert_eq!(run(&["json-vet", "check", "-s", schema, "-i", bad]), ExitCode::FAILURE);
        assert_eq!(run(&["json-vet", "check", "-q", "-s", schema, "-i", good, bad]), ExitCode::FAILURE);
    }

    #[test]
    fn check_with_ndjson_counts_every_line() {
        let schema = scratch_file("ndjson-exit", "schema.json", ID_SCHEMA);
        let lines = scratch_file("ndjson-exit", "docs.ndjson", "{\"id\": 1}\n{\"id\": 2}\n");
        let args = ["json-vet", "check", "--ndjson", "-s", schema.to_str().unwrap(), "-i", lines.to_str().unwrap()];
        assert_eq!(run(&args), ExitCode::SUCCESS);
    }

    #[test]
    fn check_with_bad_schema_is_an_error() {
        let schema = scratch_file("bad-schema", "schema.json", r#"{ "type": "integer" }"#);
        let doc = scratch_file("bad-schema", "doc.json", "1");
        let cli = CommandLineInterface::try_parse_from([
            "json-vet", "check", "-s", schema.to_str().unwrap(), "-i", doc.to_str().unwrap(),
        ])
        .unwrap();
        assert!(cli.run().is_err());
    }

    #[test]
    fn explain_loads_and_prints() {
        let schema = scratch_file("explain", "schema.json", ID_SCHEMA);
        let schema = schema.to_str().unwrap();
        assert_eq!(run(&["json-vet", "explain", "-s", schema]), ExitCode::SUCCESS);
        assert_eq!(run(&["json-vet", "explain", "--no-op", "-s", schema]), ExitCode::SUCCESS);

        let missing = CommandLineInterface::try_parse_from(["json-vet", "explain", "-s", "/definitely/not/here.json"])
            .unwrap();
        assert!(missing.run().is_err());
    }

    #[test]
    fn check_requires_schema_and_input() {
        assert!(CommandLineInterface::try_parse_from(["json-vet", "check", "-i", "x.json"]).is_err());
        assert!(CommandLineInterface::try_parse_from(["json-vet", "check", "-s", "s.json"]).is_err());
    }

    #[test]
    fn pointer_to_nothing_is_an_error() {
        let path = scratch("missing", r#"{"a": 1}"#);
        let mut s = settings(path.to_str().unwrap());
        s.json_pointer = Some("/b".into());
        assert!(s.load_documents().is_err());
    }
}
