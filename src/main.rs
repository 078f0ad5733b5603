//! @ai:module:intent CLI for the brain analytics system
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use brain_analytics::{
    config::{AnalyticsConfig, ComparisonKind},
    metrics::{AnalysisReport, ComparisonMode, ProcessingMethod},
    processor::{BrainProcessor, DataSource},
    report::{ReportGenerator, TableRenderer},
    store::{ScriptOutcome, SqliteStore},
    summary::ExecutiveSummary,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "brain-analytics")]
#[command(about = "Comparative performance analytics for RAG and context-dump query processing")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to ./brain.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file, overriding the configuration
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options selecting what to analyze.
#[derive(clap::Args, Clone)]
struct AnalysisArgs {
    /// Data source: metrics (per query) or analytics (pre-aggregated)
    #[arg(long, default_value = "metrics")]
    source: DataSource,

    /// Comparison mode: pairwise or ranked (defaults to the configured mode)
    #[arg(long)]
    mode: Option<ComparisonKind>,

    /// Baseline method for pairwise mode
    #[arg(long)]
    baseline: Option<ProcessingMethod>,

    /// Candidate method for pairwise mode
    #[arg(long)]
    candidate: Option<ProcessingMethod>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: DDL, DML, table previews, analysis and reports
    Run {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output directory for reports (defaults to the configured results dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Execute DDL scripts
    Ddl {
        /// Single script, relative to the scripts directory
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Execute DML scripts
    Dml {
        /// Single script, relative to the scripts directory
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show the newest rows of a table
    View {
        /// Table name
        #[arg(short, long)]
        table: String,

        /// Number of rows to fetch
        #[arg(short, long)]
        limit: Option<u32>,

        /// Column to order by, descending
        #[arg(long)]
        order_by: Option<String>,
    },

    /// Analyze metrics and print the derived factors
    Analyze {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the executive summary
    Summary {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Also write JSON, Markdown and chart reports to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Regenerate reports from an existing analysis.json
    Report {
        /// Path to analysis JSON file
        #[arg(short, long)]
        results: PathBuf,

        /// Output directory for reports
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "brain.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("brain_analytics=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let (config_path, database) = (cli.config, cli.database);
    let processor = || open_processor(config_path.as_deref(), database.clone());

    match cli.command {
        Commands::Init { output } => init_config(output),
        Commands::Report { results, output } => generate_reports(results, output),
        Commands::Run { analysis, output } => run_pipeline(&processor()?, analysis, output).await,
        Commands::Ddl { file } => {
            let outcome = processor()?.run_ddl(file.as_deref()).await?;
            print_script_outcome("DDL", &outcome);
            Ok(())
        }
        Commands::Dml { file } => {
            let outcome = processor()?.run_dml(file.as_deref()).await?;
            print_script_outcome("DML", &outcome);
            Ok(())
        }
        Commands::View {
            table,
            limit,
            order_by,
        } => view_table(&processor()?, &table, limit, order_by.as_deref()).await,
        Commands::Analyze { analysis, json } => analyze(&processor()?, analysis, json).await,
        Commands::Summary { analysis, output } => summarize(&processor()?, analysis, output).await,
    }
}

/// @ai:intent Resolve configuration and open the configured database
/// @ai:effects fs:read, fs:write, env
fn open_processor(
    config_path: Option<&Path>,
    database: Option<PathBuf>,
) -> Result<BrainProcessor<SqliteStore>> {
    let config = load_config(config_path, database)?;
    let store = Arc::new(SqliteStore::open(&config.database)?);
    Ok(BrainProcessor::new(store, config))
}

/// @ai:intent Load configuration and apply the --database override
/// @ai:effects fs:read, env
fn load_config(path: Option<&Path>, database: Option<PathBuf>) -> Result<AnalyticsConfig> {
    let mut config = AnalyticsConfig::resolve(path)?;

    if let Some(database) = database {
        config.database.path = database;
    }

    Ok(config)
}

/// @ai:intent Merge CLI analysis options over the configured defaults
/// @ai:effects pure
fn comparison_mode(config: &AnalyticsConfig, args: &AnalysisArgs) -> ComparisonMode {
    let mut analysis = config.analysis.clone();

    if let Some(mode) = args.mode {
        analysis.mode = mode;
    }
    if let Some(baseline) = args.baseline {
        analysis.baseline_method = baseline;
    }
    if let Some(candidate) = args.candidate {
        analysis.candidate_method = candidate;
    }

    analysis.comparison_mode()
}

/// @ai:intent Run the full pipeline step by step
/// @ai:effects db:write, fs:read, fs:write, io
async fn run_pipeline(
    processor: &BrainProcessor<SqliteStore>,
    args: AnalysisArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = processor.config();

    tracing::info!("Step 1: executing DDL scripts");
    let ddl = processor.run_ddl(None).await?;
    print_script_outcome("DDL", &ddl);

    tracing::info!("Step 2: executing DML scripts");
    let dml = processor.run_dml(None).await?;
    print_script_outcome("DML", &dml);

    tracing::info!("Step 3: viewing tables");
    for table in &config.view.tables {
        // A missing preview table should not stop the analysis.
        if let Err(e) = view_table(processor, table, None, config.view.order_by.as_deref()).await {
            tracing::warn!("Could not view {}: {:#}", table, e);
        }
    }

    tracing::info!("Step 4: analyzing {} data", args.source);
    let mode = comparison_mode(config, &args);
    let summary = processor.executive_summary(args.source, mode).await?;

    print_report(&summary.raw_analysis);
    print_summary(&summary);

    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let output_dir = output
        .unwrap_or_else(|| config.paths.results_dir.clone())
        .join(timestamp.to_string());

    tracing::info!("Step 5: writing reports to {}", output_dir.display());
    ReportGenerator::new().generate_all(&summary, &output_dir)?;

    println!("Reports written to {}", output_dir.display());
    Ok(())
}

/// @ai:intent Print a capped preview of a table
/// @ai:effects db:read, io
async fn view_table(
    processor: &BrainProcessor<SqliteStore>,
    table: &str,
    limit: Option<u32>,
    order_by: Option<&str>,
) -> Result<()> {
    let view = &processor.config().view;
    let limit = limit.unwrap_or(view.limit);

    let result = processor.view_table(table, limit, order_by).await?;

    println!();
    println!("{} (latest {})", table, limit);
    println!("{}", "=".repeat(table.len() + 10));
    print!("{}", TableRenderer::from(view).render(&result));
    Ok(())
}

/// @ai:intent Analyze and print the derived factors
/// @ai:effects db:read, io
async fn analyze(
    processor: &BrainProcessor<SqliteStore>,
    args: AnalysisArgs,
    json: bool,
) -> Result<()> {
    let mode = comparison_mode(processor.config(), &args);
    let report = processor.analyze(args.source, mode).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// @ai:intent Build, print and optionally save the executive summary
/// @ai:effects db:read, fs:write, io
async fn summarize(
    processor: &BrainProcessor<SqliteStore>,
    args: AnalysisArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let mode = comparison_mode(processor.config(), &args);
    let summary = processor.executive_summary(args.source, mode).await?;

    print_summary(&summary);

    if let Some(output_dir) = output {
        ReportGenerator::new().generate_all(&summary, &output_dir)?;
        println!("Reports written to {}", output_dir.display());
    }

    Ok(())
}

/// @ai:intent Generate reports from an analysis file
/// @ai:effects fs:read, fs:write
fn generate_reports(results_path: PathBuf, output_dir: PathBuf) -> Result<()> {
    let reporter = ReportGenerator::new();
    let summary = reporter
        .load_summary(&results_path)
        .with_context(|| format!("Failed to load {}", results_path.display()))?;

    reporter.generate_all(&summary, &output_dir)?;

    println!("Reports generated in {}", output_dir.display());
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = AnalyticsConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Print which scripts ran
/// @ai:effects io
fn print_script_outcome(kind: &str, outcome: &ScriptOutcome) {
    println!(
        "{}: {} executed, {} skipped",
        kind,
        outcome.executed.len(),
        outcome.skipped.len()
    );

    for path in &outcome.skipped {
        println!("  skipped (not found): {}", path.display());
    }
}

/// @ai:intent Format an optional value for the console
/// @ai:effects pure
fn format_optional(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{}{}", v, suffix))
        .unwrap_or_else(|| "n/a".to_string())
}

/// @ai:intent Print per-method means and derived factors
/// @ai:effects io
fn print_report(report: &AnalysisReport) {
    println!();
    println!(
        "Performance Analysis ({} records, {} observations)",
        report.record_count, report.observation_count
    );
    println!("=================================");
    println!();

    if !report.rankings.is_empty() {
        println!(
            "{:<6} {:<14} {:>14} {:>14} {:>10}",
            "Rank", "Method", "Avg ms", "Avg USD", "Quality"
        );
        println!("{}", "-".repeat(62));

        for r in &report.rankings {
            println!(
                "{:<6} {:<14} {:>14.2} {:>14.6} {:>10.3}",
                r.rank, r.method, r.mean_response_time_ms, r.mean_cost_usd, r.mean_quality_score
            );
        }

        println!();
    }

    println!(
        "{:<28} {}",
        "Performance improvement:",
        format_optional(report.performance_improvement_factor, "x")
    );
    println!(
        "{:<28} {}",
        "Cost reduction:",
        format_optional(report.cost_reduction_factor, "x")
    );
    println!(
        "{:<28} {}",
        "Quality improvement:",
        format_optional(report.quality_improvement_percent, "%")
    );

    if !report.issues.is_empty() {
        println!();
        println!("Issues:");

        for issue in &report.issues {
            println!("  - {}", issue);
        }
    }

    println!();
}

/// @ai:intent Print the executive summary
/// @ai:effects io
fn print_summary(summary: &ExecutiveSummary) {
    println!();
    println!("Executive Summary");
    println!("=================");
    println!();

    if let Some(error) = &summary.error {
        println!("{}", error);
        println!();
        return;
    }

    println!("Key achievements:");
    for a in &summary.key_achievements {
        println!("  {:<26} {}", format!("{}:", a.label), a.value);
    }
    println!();

    println!("Business impact:");
    for a in &summary.business_impact {
        println!("  {:<26} {}", format!("{}:", a.label), a.value);
    }
    println!();

    println!("Strategic recommendations:");
    for (i, rec) in summary.strategic_recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }
    println!();
}
