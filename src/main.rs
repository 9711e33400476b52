use anyhow::Context;
use clap::Parser;
use gitstat::{ContributorReport, StatsAnalyzer, StatsConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    version,
    about = "Computes per-contributor Git statistics weighted by content type",
    long_about = None
)]
struct Cli {
    /// Path to Git repository
    #[arg(short, long)]
    repo: PathBuf,

    /// Path to the TOML file describing contributors and windows
    #[arg(short, long)]
    config: PathBuf,

    /// Output format (json or csv)
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Branch to walk instead of HEAD
    #[arg(short, long)]
    branch: Option<String>,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// CSV出力の一行（貢献者×集計期間）
#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    labels: String,
    window: usize,
    since: String,
    until: String,
    lines_inserted: u64,
    lines_deleted: u64,
    words_inserted: u64,
    words_deleted: u64,
    deliverable: bool,
}

fn csv_rows(report: &ContributorReport) -> impl Iterator<Item = CsvRow<'_>> {
    report
        .windows
        .iter()
        .zip(&report.by_window)
        .map(move |(window, m)| CsvRow {
            name: &report.name,
            labels: report.labels.join(";"),
            window: window.index,
            since: window.since.to_rfc3339(),
            until: window.until.to_rfc3339(),
            lines_inserted: m.lines_inserted,
            lines_deleted: m.lines_deleted,
            words_inserted: m.words_inserted,
            words_deleted: m.words_deleted,
            deliverable: report.deliverables.get(window.index).copied().unwrap_or(false),
        })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    let config = StatsConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let analyzer = StatsAnalyzer::new(&cli.repo, config)
        .context("Failed to initialize analyzer")?;

    let reports = analyzer
        .analyze(cli.branch.as_deref())
        .context("Failed to analyze repository")?;

    match cli.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&reports)
                .context("Failed to serialize to JSON")?);
        }
        "csv" => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in reports.iter().flat_map(csv_rows) {
                wtr.serialize(row)
                    .context("Failed to write CSV record")?;
            }
            wtr.flush().context("Failed to flush CSV writer")?;
        }
        _ => anyhow::bail!("Unsupported output format: {}", cli.format),
    }

    Ok(())
}
