//! Document service: page splitting, text extraction and merging.

mod native;
mod pdfbox;

pub use native::NativeDocumentService;
pub use pdfbox::PdfBoxService;

use std::path::{Path, PathBuf};

use crate::error::DocumentError;
use crate::models::config::{DocumentBackend, DocumentConfig};

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// One page written by [`DocumentService::split_pages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Single-page PDF path.
    pub path: PathBuf,
}

/// Blocking PDF operations the reconciliation pipeline depends on.
pub trait DocumentService {
    /// Split `path` into single-page PDFs named `{stem}-{n}.pdf` in the same
    /// directory, returned in page order.
    fn split_pages(&self, path: &Path) -> Result<Vec<SplitPage>>;

    /// Extract the embedded text of a PDF.
    fn extract_text(&self, path: &Path) -> Result<String>;

    /// Write `target` with the pages of `first` followed by those of `second`.
    fn merge_pages(&self, first: &Path, second: &Path, target: &Path) -> Result<()>;
}

impl<S: DocumentService + ?Sized> DocumentService for Box<S> {
    fn split_pages(&self, path: &Path) -> Result<Vec<SplitPage>> {
        (**self).split_pages(path)
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        (**self).extract_text(path)
    }

    fn merge_pages(&self, first: &Path, second: &Path, target: &Path) -> Result<()> {
        (**self).merge_pages(first, second, target)
    }
}

/// Build the document service selected in the configuration.
pub fn create_service(config: &DocumentConfig) -> Box<dyn DocumentService> {
    match config.backend {
        DocumentBackend::Native => Box::new(NativeDocumentService::new()),
        DocumentBackend::Pdfbox => Box::new(PdfBoxService::new(&config.java, &config.pdfbox_jar)),
    }
}

/// Path of page `number` split from `path`: `{dir}/{stem}-{number}.pdf`.
pub fn split_page_path(path: &Path, number: u32) -> PathBuf {
    let stem = file_stem(path);
    path.with_file_name(format!("{stem}-{number}.pdf"))
}

/// Find the `{stem}-{n}.pdf` files split from `path`, in page order.
pub fn find_split_pages(path: &Path) -> Result<Vec<SplitPage>> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let prefix = format!("{}-", file_stem(path));

    let entries = std::fs::read_dir(dir).map_err(|source| DocumentError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut pages = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DocumentError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let number = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".pdf"))
            .and_then(|n| n.parse::<u32>().ok());
        if let Some(number) = number {
            pages.push(SplitPage {
                number,
                path: entry.path(),
            });
        }
    }

    pages.sort_by_key(|page| page.number);
    Ok(pages)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
