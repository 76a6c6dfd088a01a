//! Manifest command - show the check copy records a manifest describes.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;

use payroll_core::parse_manifest;

use super::{IdentityArg, load_config};

/// Arguments for the manifest command.
#[derive(Args)]
pub struct ManifestArgs {
    /// Manifest (.txt) file
    #[arg(required = true)]
    input: PathBuf,

    /// Identity field (overrides config)
    #[arg(long, value_enum)]
    identity: Option<IdentityArg>,
}

pub fn run(args: ManifestArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let content = fs::read_to_string(&args.input).map_err(|e| {
        anyhow::anyhow!("Failed to read manifest {}: {}", args.input.display(), e)
    })?;

    let identity_source = args
        .identity
        .map(Into::into)
        .unwrap_or(config.matching.identity_source);
    let records = parse_manifest(&content, identity_source);

    if records.is_empty() {
        eprintln!("{} No check copy records found", style("!").yellow());
    }

    let output: Vec<_> = records
        .iter()
        .map(|record| {
            json!({
                "output_file_name": record.output_file_name(),
                "check_copy": record,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
