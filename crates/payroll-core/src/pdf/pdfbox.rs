//! Document service that shells out to the PDFBox command-line jar.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use super::{DocumentService, Result, SplitPage, find_split_pages};
use crate::error::DocumentError;

/// Runs `java -jar <pdfbox_jar> <tool> ...` for each operation.
#[derive(Debug, Clone)]
pub struct PdfBoxService {
    java: PathBuf,
    jar: PathBuf,
}

impl PdfBoxService {
    pub fn new(java: impl Into<PathBuf>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
        }
    }

    fn run(&self, args: &[&Path]) -> Result<Output> {
        let mut command = Command::new(&self.java);
        command.arg("-jar").arg(&self.jar).args(args);
        let rendered = format!("{command:?}");
        debug!("Running {}", rendered);

        let output = command.output().map_err(|source| DocumentError::Io {
            path: self.java.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(DocumentError::Command {
                command: rendered,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl DocumentService for PdfBoxService {
    fn split_pages(&self, path: &Path) -> Result<Vec<SplitPage>> {
        self.run(&[Path::new("PDFSplit"), path])?;
        let pages = find_split_pages(path)?;
        if pages.is_empty() {
            return Err(DocumentError::Split {
                path: path.to_path_buf(),
                reason: "PDFSplit produced no pages".to_string(),
            });
        }
        Ok(pages)
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        let output = self.run(&[
            Path::new("ExtractText"),
            path,
            Path::new("-console"),
            Path::new("true"),
        ])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn merge_pages(&self, first: &Path, second: &Path, target: &Path) -> Result<()> {
        self.run(&[Path::new("PDFMerger"), first, second, target])?;
        Ok(())
    }
}
