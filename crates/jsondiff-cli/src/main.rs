//! Command-line interface for `jsondiff-core`.
//!
//! Diff mode compares two documents and prints one of the diff artifacts.
//! Patch mode applies a JSON Patch or JSON Merge Patch to a document.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use jsondiff_core::{Diff, DiffOptions, Node, Patch};
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");
const VERSION_BANNER: &str = concat!("jsondiff version ", env!("CARGO_PKG_VERSION"));
const LOG_ENV: &str = "JSONDIFF_LOG";

const HELP_TEMPLATE: &str = r#"Usage: jsondiff [OPTION]... FILE1 [FILE2]
Diff and patch JSON and YAML documents.

Prints the diff of FILE1 and FILE2 to STDOUT.
When FILE2 is omitted the second input is read from STDIN.
When patching (-p) FILE1 is a JSON Patch (or a merge patch with --merge).

Options:
  -f, --format=FORMAT   Output of diff mode: "patch" (RFC 6902, default),
                        "merge" (RFC 7386), "removed", "added", "modified",
                        "rearranged", "paths" or "summary".
  --rearrange-arrays    Reorder arrays of objects by a unique key before comparing.
  --stop-on-diff        Stop at the first difference.
  --uri-fragment        Render paths as URI fragment identifiers (#/a%20b).
  --opts='[...]'        JSON array of option names, e.g. '["REARRANGE_ARRAYS"]'.
  -p                    Apply patch FILE1 to FILE2 or STDIN.
  --merge               With -p, FILE1 is a JSON Merge Patch.
  --yaml                Read inputs as YAML.
  --pretty              Pretty-print output.
  -o, --output=FILE3    Write to FILE3 instead of STDOUT.

Exit status is 0 when the inputs are equal, 1 when they differ and 2 on error.
Set JSONDIFF_LOG (e.g. JSONDIFF_LOG=debug) to enable diagnostics on STDERR.

Examples:
  jsondiff a.json b.json
  cat b.json | jsondiff a.json
  jsondiff -f merge a.json b.json
  jsondiff -o patch.json a.json b.json; jsondiff -p patch.json a.json

Version: {version}
"#;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    #[default]
    Patch,
    Merge,
    Removed,
    Added,
    Modified,
    Rearranged,
    Paths,
    Summary,
}

#[derive(Debug, Parser)]
#[command(
    name = "jsondiff",
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    override_usage = "jsondiff [OPTION]... FILE1 [FILE2]"
)]
struct Cli {
    #[arg(long = "help", short = 'h', action = ArgAction::SetTrue, hide = true)]
    help: bool,

    #[arg(long = "version", action = ArgAction::SetTrue, hide = true)]
    version: bool,

    /// Select the diff artifact to print.
    #[arg(short = 'f', long = "format", value_enum, default_value = "patch")]
    format: OutputFormat,

    /// Write output to FILE instead of STDOUT.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// JSON array of diff option names.
    #[arg(long = "opts", default_value = "[]")]
    opts: String,

    /// Reorder arrays of objects by a unique key.
    #[arg(long = "rearrange-arrays", action = ArgAction::SetTrue)]
    rearrange_arrays: bool,

    /// Stop at the first difference.
    #[arg(long = "stop-on-diff", action = ArgAction::SetTrue)]
    stop_on_diff: bool,

    /// Render paths as URI fragment identifiers.
    #[arg(long = "uri-fragment", action = ArgAction::SetTrue)]
    uri_fragment: bool,

    /// Enable patch mode (apply FILE1 patch to FILE2/STDIN).
    #[arg(short = 'p', action = ArgAction::SetTrue)]
    patch: bool,

    /// Treat the patch as a JSON Merge Patch.
    #[arg(long = "merge", action = ArgAction::SetTrue)]
    merge: bool,

    /// Read inputs as YAML.
    #[arg(long = "yaml", action = ArgAction::SetTrue)]
    yaml: bool,

    /// Pretty-print JSON output.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,

    /// Positional inputs (FILE1 \[FILE2]).
    #[arg()]
    inputs: Vec<OsString>,
}

fn main() {
    init_tracing();
    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err:#}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

fn try_main() -> Result<i32> {
    let args = canonicalize_args(std::env::args_os());
    let cli = Cli::parse_from(args);

    if cli.help {
        print!("{}", help_text());
        return Ok(0);
    }

    if cli.version {
        println!("{VERSION_BANNER}");
        return Ok(0);
    }

    if cli.merge && !cli.patch {
        bail!("--merge is only valid together with -p");
    }

    if cli.patch {
        run_patch(&cli)
    } else {
        run_diff(&cli)
    }
}

fn run_diff(cli: &Cli) -> Result<i32> {
    let (first, second) = input_sources(cli)?;
    let lhs_text = read_input(&first)?;
    let rhs_text = read_input(&second)?;
    let lhs = parse_node(&lhs_text, cli.yaml).context("failed to parse first input")?;
    let rhs = parse_node(&rhs_text, cli.yaml).context("failed to parse second input")?;

    let options = build_options(cli)?;
    debug!(%options, format = ?cli.format, "running diff");
    let diff = lhs.diff(&rhs, &options);

    let rendered = render_value(&diff_output(&diff, cli.format)?, cli.pretty)?;
    write_output(cli, &rendered)?;

    Ok(if diff.is_empty() { 0 } else { 1 })
}

fn run_patch(cli: &Cli) -> Result<i32> {
    let (first, second) = input_sources(cli)?;
    let patch_text = read_input(&first)?;
    let doc_text = read_input(&second)?;
    let patch_node = parse_node(&patch_text, cli.yaml).context("failed to parse patch")?;
    let doc = parse_node(&doc_text, cli.yaml).context("failed to parse document")?;

    let patched = if cli.merge {
        doc.apply_merge_patch(&patch_node)
    } else {
        let patch = Patch::import(&patch_node).context("invalid JSON Patch")?;
        doc.apply_patch(&patch).context("failed to apply JSON Patch")?
    };

    let rendered = render_value(&patched.to_json_value(), cli.pretty)?;
    write_output(cli, &rendered)?;
    Ok(0)
}

fn diff_output(diff: &Diff, format: OutputFormat) -> Result<Value> {
    let or_null = |node: Option<&Node>| node.map_or(Value::Null, Node::to_json_value);
    Ok(match format {
        OutputFormat::Patch => diff
            .patch()
            .ok_or_else(|| anyhow!("JSON Patch output is disabled by SKIP_JSON_PATCH"))?
            .export()
            .to_json_value(),
        OutputFormat::Merge => diff
            .merge_patch()
            .ok_or_else(|| anyhow!("merge patch output is disabled by SKIP_JSON_MERGE_PATCH"))?
            .to_json_value(),
        OutputFormat::Removed => or_null(diff.removed()),
        OutputFormat::Added => or_null(diff.added()),
        OutputFormat::Modified => json!({
            "original": or_null(diff.modified_original()),
            "new": or_null(diff.modified_new()),
        }),
        OutputFormat::Rearranged => diff.rearranged().to_json_value(),
        OutputFormat::Paths => json!({
            "removed": diff.removed_paths(),
            "added": diff.added_paths(),
            "modified": diff.modified_paths(),
        }),
        OutputFormat::Summary => json!({
            "removed": diff.removed_count(),
            "added": diff.added_count(),
            "modified": diff.modified_count(),
            "diff": diff.diff_count(),
            "stopped_early": diff.stopped_early(),
        }),
    })
}

fn render_value(value: &Value, pretty: bool) -> Result<String> {
    let mut rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;
    rendered.push('\n');
    Ok(rendered)
}

fn write_output(cli: &Cli, rendered: &str) -> Result<()> {
    if let Some(path) = &cli.output {
        fs::write(path, rendered.as_bytes())
            .with_context(|| format!("failed to write output to {}", path.display()))?;
    } else {
        print!("{rendered}");
        io::stdout().flush().ok();
    }
    Ok(())
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn input_sources(cli: &Cli) -> Result<(InputSource, InputSource)> {
    match cli.inputs.as_slice() {
        [first] => Ok((InputSource::File(path_from(first)?), InputSource::Stdin)),
        [first, second] => {
            Ok((InputSource::File(path_from(first)?), InputSource::File(path_from(second)?)))
        }
        _ => Err(anyhow!("{}", help_text())),
    }
}

fn path_from(input: &OsString) -> Result<PathBuf> {
    let path = PathBuf::from(input);
    if path.as_os_str().is_empty() {
        bail!("expected file path; got empty string");
    }
    Ok(path)
}

fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::File(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read STDIN")?;
            Ok(buffer)
        }
    }
}

fn parse_node(input: &str, yaml: bool) -> Result<Node> {
    if yaml {
        Node::from_yaml_str(input).map_err(|err| anyhow!(err))
    } else {
        Node::from_json_str(input).map_err(|err| anyhow!(err))
    }
}

fn build_options(cli: &Cli) -> Result<DiffOptions> {
    let mut options = DiffOptions::from_names(parse_opts_json(&cli.opts)?)?;
    if cli.rearrange_arrays {
        options = options.with_rearrange_arrays(true);
    }
    if cli.stop_on_diff {
        options = options.with_stop_on_diff(true);
    }
    if cli.uri_fragment {
        options = options.with_uri_fragment_id(true);
    }
    Ok(options)
}

fn parse_opts_json(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("--opts requires a JSON array");
    }

    let value: Value = serde_json::from_str(trimmed)
        .with_context(|| format!("failed to parse --opts JSON: {trimmed}"))?;
    let items = match value {
        Value::Array(items) => items,
        other => bail!("--opts expects a JSON array, but received {other}"),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(name),
            other => Err(anyhow!("unsupported --opts entry: {other}")),
        })
        .collect()
}

fn canonicalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut canonicalized = Vec::new();
    for (idx, arg) in args.into_iter().enumerate() {
        if idx == 0 {
            canonicalized.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("-help") => canonicalized.push(OsString::from("--help")),
            Some("-version") => canonicalized.push(OsString::from("--version")),
            Some("-yaml") => canonicalized.push(OsString::from("--yaml")),
            Some("-merge") => canonicalized.push(OsString::from("--merge")),
            Some("-pretty") => canonicalized.push(OsString::from("--pretty")),
            Some("-opts") => canonicalized.push(OsString::from("--opts")),
            Some(other) if other.starts_with("-f=") => {
                canonicalized.push(OsString::from("-f"));
                canonicalized.push(OsString::from(other.trim_start_matches("-f=")));
            }
            Some(other) if other.starts_with("-o=") => {
                canonicalized.push(OsString::from("-o"));
                canonicalized.push(OsString::from(other.trim_start_matches("-o=")));
            }
            Some(other) if other.starts_with("-opts=") => {
                canonicalized.push(OsString::from("--opts"));
                canonicalized.push(OsString::from(other.trim_start_matches("-opts=")));
            }
            _ => canonicalized.push(arg),
        }
    }
    canonicalized
}

fn help_text() -> String {
    HELP_TEMPLATE.replace("{version}", VERSION_NUMBER)
}

#[cfg(test)]
mod tests {
    use super::{canonicalize_args, parse_opts_json, OutputFormat};
    use std::ffi::OsString;

    #[test]
    fn canonicalizes_single_dash_variants() {
        let input = vec![
            OsString::from("jsondiff"),
            OsString::from("-help"),
            OsString::from("-version"),
            OsString::from("-yaml"),
            OsString::from("--other"),
        ];
        let canonicalized = canonicalize_args(input);
        assert_eq!(canonicalized, vec!["jsondiff", "--help", "--version", "--yaml", "--other"]);
    }

    #[test]
    fn canonicalizes_inline_value_flags() {
        let input = vec![
            OsString::from("jsondiff"),
            OsString::from("-f=merge"),
            OsString::from("-o=out.json"),
            OsString::from("-opts=[\"STOP_ON_DIFF\"]"),
        ];
        let canonicalized = canonicalize_args(input);
        assert_eq!(
            canonicalized,
            vec!["jsondiff", "-f", "merge", "-o", "out.json", "--opts", "[\"STOP_ON_DIFF\"]"]
        );
    }

    #[test]
    fn opts_accepts_array_of_names() {
        let names = parse_opts_json(r#"["REARRANGE_ARRAYS", "SKIP_JSON_PATCH"]"#).unwrap();
        assert_eq!(names, vec!["REARRANGE_ARRAYS", "SKIP_JSON_PATCH"]);
        assert!(parse_opts_json("{}").is_err());
        assert!(parse_opts_json("[1]").is_err());
    }

    #[test]
    fn output_format_default_is_patch() {
        assert_eq!(OutputFormat::default(), OutputFormat::Patch);
    }
}
