//! CLI entry point for the tabular data explorer.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::Path;
use tablescope::{
    AnalysisConfig, EmptySelectionPolicy, ExplorerSession, FixMethod, InsightSeverity, io,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    author = "Tablescope Team",
    version,
    about = "Tabular data explorer",
    long_about = "Infer column types, diagnose data quality, apply fixes and ask questions \
                  about a CSV file.\n\n\
                  EXAMPLES:\n  \
                  # Overview with insights\n  \
                  tablescope -i sales.csv\n\n  \
                  # Fill missing revenue with the mean, then ask a question\n  \
                  tablescope -i sales.csv --fix revenue:mean --ask \"average revenue\"\n\n  \
                  # Restrict to one region and export the filtered rows\n  \
                  tablescope -i sales.csv --filter region=North --export-dir out/\n\n  \
                  # Machine-readable insights document\n  \
                  tablescope -i sales.csv --json | jq .insights"
)]
struct Args {
    /// Path to the CSV file to explore
    #[arg(short, long)]
    input: String,

    /// Question to answer over the filtered view (repeatable)
    #[arg(short, long)]
    ask: Vec<String>,

    /// Allowed value for a column, as COLUMN=VALUE (repeatable)
    ///
    /// Several values for the same column are OR-ed; different columns are AND-ed.
    #[arg(short, long)]
    filter: Vec<String>,

    /// Fix to apply before analysis, as COLUMN:METHOD (repeatable, applied in order)
    ///
    /// Methods: delete, mean, mode, forward, remove, cap, keep, remove_duplicates.
    /// `remove_duplicates` takes no column.
    #[arg(long)]
    fix: Vec<String>,

    /// Treat an empty filter selection as "allow every value"
    #[arg(long)]
    allow_empty_selection: bool,

    /// Directory to write filtered_data.csv, data_summary.txt and insights.json to
    #[arg(long)]
    export_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the JSON insights document to stdout instead of a human-readable summary
    ///
    /// Disables all progress logs.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let policy = if args.allow_empty_selection {
        EmptySelectionPolicy::AllowAll
    } else {
        EmptySelectionPolicy::ExcludeAll
    };
    let config = AnalysisConfig::builder()
        .empty_selection_policy(policy)
        .build()?;

    let dataset = io::load_csv(&args.input)?;
    let mut session = ExplorerSession::new(config);
    session.load(extract_file_name(&args.input), dataset);

    for spec in &args.fix {
        let (column, method) = parse_fix(spec)?;
        let action = session
            .apply_fix(&column, method)
            .with_context(|| format!("Applying fix '{}'", spec))?;
        info!("{} {}", action.action_type.icon(), action.description);
    }

    for spec in &args.filter {
        let (column, value) = spec
            .split_once('=')
            .ok_or_else(|| anyhow!("Filter must be COLUMN=VALUE, got '{}'", spec))?;
        session.allow_value(column.trim(), value.trim())?;
    }

    if let Some(ref dir) = args.export_dir {
        write_exports(&session, dir)?;
    }

    if args.json {
        let doc = session.export_insights()?;
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    print_human_readable_summary(&session, &args);
    Ok(())
}

/// Parse `COLUMN:METHOD`. A bare `remove_duplicates` is accepted without a column.
fn parse_fix(spec: &str) -> Result<(String, FixMethod)> {
    match spec.rsplit_once(':') {
        Some((column, method)) => Ok((column.trim().to_string(), method.trim().parse()?)),
        None => {
            let method: FixMethod = spec.trim().parse()?;
            if method != FixMethod::RemoveDuplicates {
                return Err(anyhow!("Fix must be COLUMN:METHOD, got '{}'", spec));
            }
            Ok((String::new(), method))
        }
    }
}

fn extract_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn write_exports(session: &ExplorerSession, dir: &str) -> Result<()> {
    let dir = Path::new(dir);
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("Created output directory: {}", dir.display());
    }

    let csv_path = dir.join("filtered_data.csv");
    std::fs::write(&csv_path, session.export_csv()?)
        .with_context(|| format!("Writing {}", csv_path.display()))?;

    let summary_path = dir.join("data_summary.txt");
    std::fs::write(&summary_path, session.export_summary()?)
        .with_context(|| format!("Writing {}", summary_path.display()))?;

    let insights_path = dir.join("insights.json");
    let doc = serde_json::to_string_pretty(&session.export_insights()?)?;
    std::fs::write(&insights_path, doc)
        .with_context(|| format!("Writing {}", insights_path.display()))?;

    info!("Exports written to {}", dir.display());
    Ok(())
}

/// Print a human-readable summary of the explored dataset.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(session: &ExplorerSession, args: &Args) {
    let dataset = session.dataset();
    let report = session.quality_report();

    println!();
    println!("{}", "=".repeat(80));
    println!("DATASET OVERVIEW");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input: {} ({} rows x {} columns)",
        args.input,
        dataset.len(),
        dataset.column_count()
    );
    if !session.filters().is_empty() {
        println!("Filtered view: {} rows", session.filtered().len());
    }
    println!();

    println!("Columns:");
    for column in dataset.columns() {
        let column_type = session
            .column_types()
            .get(column)
            .map(|t| t.as_str())
            .unwrap_or("unknown");
        println!("  {:<30} {}", truncate_str(column, 30), column_type);
    }
    println!();

    println!("Data Quality:");
    match report.completeness() {
        Some(completeness) => println!("  Completeness: {:.1}%", completeness),
        None => println!("  Completeness: n/a"),
    }
    println!(
        "  Duplicate rows: {} ({:.1}%)",
        report.duplicate_count,
        report.duplicate_percentage()
    );
    for outlier in &report.outliers {
        println!(
            "  Outliers in {}: {} outside [{:.2}, {:.2}]",
            outlier.column, outlier.count, outlier.lower_bound, outlier.upper_bound
        );
    }
    println!();

    if !session.history().is_empty() {
        println!("Fixes Applied:");
        for action in session.history() {
            println!("  {} {}", action.action_type.icon(), action.description);
        }
        println!();
    }

    println!("Insights:");
    for insight in session.insights() {
        println!("  {} {}: {}", insight.icon, insight.title, insight.description);
        if insight.severity == InsightSeverity::Error {
            warn!("{}", insight.description);
        }
    }
    println!();

    for question in &args.ask {
        println!("Q: {}", question);
        println!("A: {}", session.ask(question));
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --export-dir to save CSV, summary and insights files");
    println!("{}", "=".repeat(80));
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
