//! Run command - reconcile every batch in the inbox.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use payroll_core::{BatchKind, ReconciliationReport, Reconciler, create_service};

use super::{BackendArg, IdentityArg, load_config};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Inbox directory (overrides config)
    #[arg(long)]
    inbox: Option<PathBuf>,

    /// Outbox directory (overrides config)
    #[arg(long)]
    outbox: Option<PathBuf>,

    /// Scratch directory (overrides config)
    #[arg(long)]
    scratch: Option<PathBuf>,

    /// Identity field used for matching (overrides config)
    #[arg(long, value_enum)]
    identity: Option<IdentityArg>,

    /// Document backend (overrides config)
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Plain text summary
    Text,
    /// JSON output
    Json,
    /// CSV output, one row per record
    Csv,
}

pub fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(inbox) = args.inbox {
        config.folders.inbox = inbox;
    }
    if let Some(outbox) = args.outbox {
        config.folders.outbox = outbox;
    }
    if let Some(scratch) = args.scratch {
        config.folders.scratch = scratch;
    }
    if let Some(identity) = args.identity {
        config.matching.identity_source = identity.into();
    }
    if let Some(backend) = args.backend {
        config.documents.backend = backend.into();
    }

    if !config.folders.inbox.is_dir() {
        anyhow::bail!("Inbox not found: {}", config.folders.inbox.display());
    }

    info!("Reconciling {}", config.folders.inbox.display());
    let documents = create_service(&config.documents);
    let mut reconciler = Reconciler::new(config, documents);
    reconciler.prepare_folders()?;

    let entries = reconciler.scan_inbox()?;
    println!(
        "{} Found {} batches to process",
        style("ℹ").blue(),
        entries.len()
    );

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    for entry in &entries {
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());

        let summary = pb.suspend(|| reconciler.process(entry))?;
        let kind = match summary.kind {
            BatchKind::TimeCards { revised: true } => "revised time cards",
            BatchKind::TimeCards { revised: false } => "time cards",
            _ => "check copies",
        };
        debug!("{}: {} {}", name, summary.records, kind);
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    let report = reconciler.finish()?;

    let content = match args.format {
        ReportFormat::Text => format_report_text(&report),
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
        ReportFormat::Csv => format_report_csv(&report)?,
    };

    if let Some(path) = &args.report {
        fs::write(path, &content)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", content);
    }

    print_summary(&report);
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_summary(report: &ReconciliationReport) {
    println!();
    println!(
        "{} Merged {} pairs",
        style("✓").green(),
        style(report.matched.len()).green()
    );

    let unmatched = report.unmatched_time_cards.len()
        + report.unmatched_check_copies.len()
        + report.missing_check_copy_pages.len();
    if report.is_fully_reconciled() {
        println!("   everything reconciled");
    } else {
        println!(
            "   {} records need review",
            style(unmatched).yellow()
        );
    }
}

fn format_report_text(report: &ReconciliationReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Reconciliation report ({})\n",
        report
            .generated_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    ));
    output.push_str(&format!("Identity: {:?}\n", report.identity_source));

    output.push_str(&format!("\nMatched ({}):\n", report.matched.len()));
    for entry in &report.matched {
        output.push_str(&format!(
            "  {} <matched> {}\n    -> {}\n",
            entry.time_card, entry.check_copy, entry.merged
        ));
    }

    let sections = [
        ("Unmatched time cards", &report.unmatched_time_cards),
        ("Unmatched check copies", &report.unmatched_check_copies),
        ("Check copies with missing pages", &report.missing_check_copy_pages),
    ];
    for (title, names) in sections {
        if names.is_empty() {
            continue;
        }
        output.push_str(&format!("\n{} ({}):\n", title, names.len()));
        for name in names {
            output.push_str(&format!("  - {}\n", name));
        }
    }

    output
}

fn format_report_csv(report: &ReconciliationReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["status", "time_card", "check_copy", "merged"])?;

    for entry in &report.matched {
        wtr.write_record([
            "matched",
            entry.time_card.as_str(),
            entry.check_copy.as_str(),
            entry.merged.as_str(),
        ])?;
    }
    for name in &report.unmatched_time_cards {
        wtr.write_record(["unmatched_time_card", name.as_str(), "", ""])?;
    }
    for name in &report.unmatched_check_copies {
        wtr.write_record(["unmatched_check_copy", "", name.as_str(), ""])?;
    }
    for name in &report.missing_check_copy_pages {
        wtr.write_record(["missing_page", "", name.as_str(), ""])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
