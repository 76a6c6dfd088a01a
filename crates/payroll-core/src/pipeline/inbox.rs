//! Inbox scanning and file-name based dispatch.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// What an inbox file holds, judged by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// `WE_*.pdf`; revised when the name contains `REVISED`.
    TimeCards { revised: bool },
    /// Any other `.pdf`.
    CheckCopies,
    /// `.txt` companion of a check copy batch.
    Manifest,
    Unrecognized,
}

/// A batch scheduled for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    pub path: PathBuf,
    pub kind: BatchKind,
}

pub fn classify(path: &Path) -> BatchKind {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return BatchKind::Unrecognized;
    };

    if name.ends_with(".pdf") {
        if name.starts_with("WE_") {
            BatchKind::TimeCards {
                revised: name.contains("REVISED"),
            }
        } else {
            BatchKind::CheckCopies
        }
    } else if name.ends_with(".txt") {
        BatchKind::Manifest
    } else {
        BatchKind::Unrecognized
    }
}

/// List the batches in `inbox`: regular batches in file-name order, then
/// revised time card batches in file-name order. Manifests are left for
/// their check copy batch; anything else is skipped.
pub fn scan(inbox: &Path) -> Result<Vec<InboxEntry>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(inbox)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut regular = Vec::new();
    let mut revised = Vec::new();
    for path in paths {
        let kind = classify(&path);
        match kind {
            BatchKind::TimeCards { revised: true } => revised.push(InboxEntry { path, kind }),
            BatchKind::TimeCards { .. } | BatchKind::CheckCopies => {
                regular.push(InboxEntry { path, kind })
            }
            BatchKind::Manifest => debug!("Manifest {} left for its batch", path.display()),
            BatchKind::Unrecognized => {
                warn!("SKIPPING: file found but not identified: {}", path.display())
            }
        }
    }

    regular.extend(revised);
    Ok(regular)
}
