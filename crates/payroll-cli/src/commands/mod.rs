//! CLI subcommands.

pub mod config;
pub mod manifest;
pub mod parse;
pub mod run;

use std::path::{Path, PathBuf};

use payroll_core::{DocumentBackend, IdentitySource, PayrollConfig};
use tracing::debug;

/// Identity field, as accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum IdentityArg {
    /// Invoice number from the batch file name
    Invoice,
    /// Grand total printed on the time card
    GrandTotal,
}

impl From<IdentityArg> for IdentitySource {
    fn from(arg: IdentityArg) -> Self {
        match arg {
            IdentityArg::Invoice => IdentitySource::InvoiceNumber,
            IdentityArg::GrandTotal => IdentitySource::GrandTotal,
        }
    }
}

/// Document backend, as accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum BackendArg {
    /// In-process lopdf / pdf-extract
    Native,
    /// Apache PDFBox via java
    Pdfbox,
}

impl From<BackendArg> for DocumentBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Native => DocumentBackend::Native,
            BackendArg::Pdfbox => DocumentBackend::Pdfbox,
        }
    }
}

/// Per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("payroll")
        .join("config.json")
}

/// Load the `--config` file, else the per-user file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PayrollConfig> {
    if let Some(path) = config_path {
        return Ok(PayrollConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(PayrollConfig::from_file(&default_path)?)
    } else {
        Ok(PayrollConfig::default())
    }
}
