//! Configuration structures for the reconciliation pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a reconciliation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Inbox, outbox and scratch locations.
    pub folders: FolderConfig,

    /// Matching configuration.
    pub matching: MatchingConfig,

    /// Document service configuration.
    pub documents: DocumentConfig,
}

/// Filesystem layout used by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Directory scanned for time card and check copy batches.
    pub inbox: PathBuf,

    /// Directory receiving all outputs.
    pub outbox: PathBuf,

    /// Directory for transient per-run files.
    pub scratch: PathBuf,

    /// Outbox subfolder for split time card pages.
    pub time_cards: String,

    /// Outbox subfolder for split check copy pages.
    pub check_copies: String,

    /// Outbox subfolder for merged time card + check copy files.
    pub merged: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            inbox: PathBuf::from("/home/pdfs/inbox"),
            outbox: PathBuf::from("/home/pdfs/outbox"),
            scratch: PathBuf::from("/tmp"),
            time_cards: "time_cards".to_string(),
            check_copies: "check_copies".to_string(),
            merged: "final".to_string(),
        }
    }
}

impl FolderConfig {
    pub fn time_card_dir(&self) -> PathBuf {
        self.outbox.join(&self.time_cards)
    }

    pub fn check_copy_dir(&self) -> PathBuf {
        self.outbox.join(&self.check_copies)
    }

    pub fn merged_dir(&self) -> PathBuf {
        self.outbox.join(&self.merged)
    }
}

/// Which field identifies a time card for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Invoice number embedded in the time card batch file name,
    /// matched against the manifest's invoice column.
    InvoiceNumber,
    /// Grand total printed on the time card, matched against the
    /// manifest's amount column.
    #[default]
    GrandTotal,
}

/// Matching configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Identity field used to pair time cards with check copies.
    pub identity_source: IdentitySource,
}

/// Which document service implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentBackend {
    /// In-process lopdf / pdf-extract.
    #[default]
    Native,
    /// Apache PDFBox command line tools.
    Pdfbox,
}

/// Document service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Backend used for split, text extraction and merge.
    pub backend: DocumentBackend,

    /// Java executable for the PDFBox backend.
    pub java: PathBuf,

    /// PDFBox application jar.
    pub pdfbox_jar: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            backend: DocumentBackend::Native,
            java: PathBuf::from("java"),
            pdfbox_jar: PathBuf::from("/root/pdfbox-app-2.0.23.jar"),
        }
    }
}

impl PayrollConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PayrollConfig =
            serde_json::from_str(r#"{"matching": {"identity_source": "invoice_number"}}"#).unwrap();

        assert_eq!(config.matching.identity_source, IdentitySource::InvoiceNumber);
        assert_eq!(config.folders.scratch, PathBuf::from("/tmp"));
        assert_eq!(config.documents.backend, DocumentBackend::Native);
    }

    #[test]
    fn test_outbox_subfolders() {
        let folders = FolderConfig {
            outbox: PathBuf::from("/out"),
            ..FolderConfig::default()
        };

        assert_eq!(folders.time_card_dir(), PathBuf::from("/out/time_cards"));
        assert_eq!(folders.check_copy_dir(), PathBuf::from("/out/check_copies"));
        assert_eq!(folders.merged_dir(), PathBuf::from("/out/final"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PayrollConfig::default();
        config.documents.backend = DocumentBackend::Pdfbox;
        config.save(&path).unwrap();

        let loaded = PayrollConfig::from_file(&path).unwrap();
        assert_eq!(loaded.documents.backend, DocumentBackend::Pdfbox);
    }
}
