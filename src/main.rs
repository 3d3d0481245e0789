use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use logsift_engine::{
    process_file, timestamped_output_path, ProcessOptions, DEFAULT_OUTPUT_PREFIX,
};
use logsift_navigate::SourceMapRegistry;
use logsift_types::{FilterGroup, FilterItem, FilterKind, FilterStore, CONTEXT_LEVELS};

mod config;

/// Logsift - filter large log files with keyword/regex rule groups
#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the log file to filter
    #[arg(value_name = "LOG_FILE")]
    input: PathBuf,

    /// TOML file with filter group definitions
    #[arg(long, value_name = "FILE")]
    filters: Option<PathBuf>,

    /// Ad-hoc include pattern (repeatable)
    #[arg(short = 'i', long = "include", value_name = "PATTERN")]
    includes: Vec<String>,

    /// Ad-hoc exclude pattern (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    excludes: Vec<String>,

    /// Treat ad-hoc patterns as regular expressions
    #[arg(long)]
    regex: bool,

    /// Match ad-hoc patterns case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Context radius for ad-hoc include patterns
    #[arg(long, default_value = "0", value_parser = parse_context_radius)]
    context: u32,

    /// Prefix each output line with its source line number
    #[arg(long)]
    line_numbers: bool,

    /// Total line count hint, used only to size the line-number padding
    #[arg(long, value_name = "COUNT")]
    total_lines: Option<u64>,

    /// Destination path (defaults to a timestamped file in the temp dir)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// After filtering, resolve this 0-based output line back to its source
    #[arg(long, value_name = "LINE")]
    resolve: Option<usize>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_context_radius(value: &str) -> Result<u32, String> {
    let radius: u32 = value
        .parse()
        .map_err(|_| format!("invalid context radius: {value}"))?;
    if CONTEXT_LEVELS.contains(&radius) {
        Ok(radius)
    } else {
        Err(format!(
            "context radius must be one of 0, 3, 5, 9 (got {radius})"
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    let mut store = FilterStore::with_presets();

    if let Some(path) = &args.filters {
        store.adopt_groups(config::load_filters(path)?);
    }
    if !args.includes.is_empty() || !args.excludes.is_empty() {
        store.adopt_groups(vec![adhoc_group(&args)]);
    }

    let groups = store.enabled_groups();
    if groups.is_empty() {
        tracing::warn!("no enabled filter groups, the filtered output will be empty");
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| timestamped_output_path(DEFAULT_OUTPUT_PREFIX));
    let options = ProcessOptions {
        prepend_line_numbers: args.line_numbers,
        total_line_count: args.total_lines,
    };

    let summary = process_file(&args.input, &output, &groups, options)
        .await
        .with_context(|| format!("filtering {} failed", args.input.display()))?;

    store.update_result_counts(&summary.rule_hits);

    let registry = SourceMapRegistry::new();
    registry.register(
        &summary.output_path,
        &args.input,
        Arc::new(summary.line_map.clone()),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Filtered {} -> {}",
            args.input.display(),
            summary.output_path.display()
        );
        println!(
            "{} lines processed, {} matched, {} written",
            summary.processed,
            summary.matched,
            summary.line_map.len()
        );
    }

    if let Some(output_line) = args.resolve {
        let Some(location) = registry.resolve(&summary.output_path, output_line) else {
            anyhow::bail!("output line {output_line} does not exist in the filtered file");
        };
        registry.mark_pending(&location.path, location.line);
        println!(
            "output line {} -> {}:{}",
            output_line,
            location.path.display(),
            location.line + 1
        );
    }

    Ok(())
}

/// Collect the command-line patterns into one enabled group
fn adhoc_group(args: &Args) -> FilterGroup {
    let mut group = FilterGroup::new(0, "Command line", args.regex);
    group.enabled = true;

    for keyword in &args.includes {
        let mut item = FilterItem::new(0, keyword.clone(), FilterKind::Include);
        item.is_regex = args.regex;
        item.case_sensitive = args.case_sensitive;
        item.context_radius = args.context;
        group.filters.push(item);
    }
    for keyword in &args.excludes {
        let mut item = FilterItem::new(0, keyword.clone(), FilterKind::Exclude);
        item.is_regex = args.regex;
        item.case_sensitive = args.case_sensitive;
        group.filters.push(item);
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_radius_accepts_levels() {
        for level in CONTEXT_LEVELS {
            assert_eq!(parse_context_radius(&level.to_string()), Ok(level));
        }
        assert!(parse_context_radius("4").is_err());
        assert!(parse_context_radius("abc").is_err());
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("app.log");
        let output = dir.path().join("filtered.log");
        std::fs::write(&input, "INFO boot\nERROR disk full\nINFO done\n").unwrap();

        let args = Args::parse_from([
            "logsift",
            input.to_str().unwrap(),
            "-i",
            "ERROR",
            "--output",
            output.to_str().unwrap(),
            "--resolve",
            "0",
        ]);
        run(args).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "ERROR disk full\n"
        );
    }

    #[tokio::test]
    async fn test_run_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("app.log");
        let output = dir.path().join("filtered.log");
        let filters = dir.path().join("filters.toml");
        std::fs::write(&input, "one\ntwo noise\nthree\n").unwrap();
        std::fs::write(
            &filters,
            "[[group]]\nname = \"Quiet\"\n\n[[group.filter]]\nkeyword = \"noise\"\nkind = \"exclude\"\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "logsift",
            input.to_str().unwrap(),
            "--filters",
            filters.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        run(args).await.unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "one\nthree\n");
    }

    #[test]
    fn test_adhoc_group_carries_flags() {
        let args = Args::parse_from([
            "logsift",
            "app.log",
            "-i",
            "ERROR",
            "-e",
            "noise",
            "--regex",
            "--case-sensitive",
            "--context",
            "5",
        ]);
        let group = adhoc_group(&args);

        assert!(group.enabled);
        assert_eq!(group.filters.len(), 2);
        let inc = &group.filters[0];
        assert_eq!(inc.kind, FilterKind::Include);
        assert!(inc.is_regex && inc.case_sensitive);
        assert_eq!(inc.context_radius, 5);
        let exc = &group.filters[1];
        assert_eq!(exc.kind, FilterKind::Exclude);
        assert_eq!(exc.context_radius, 0);
    }
}
