//! Hash-named scratch copies and prefix cleanup.

use std::fs;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use tracing::debug;

use crate::error::Result;

/// A file copied into the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged {
    /// MD5 hex of the original path; prefix of every derived scratch file.
    pub hash: String,
    /// `{scratch}/{hash}.pdf`
    pub path: PathBuf,
}

impl Staged {
    /// Merge output sitting next to the staged copy, under the same prefix.
    pub fn merged_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push("-merged");
        PathBuf::from(name)
    }
}

/// Directory of transient per-unit-of-work files.
#[derive(Debug, Clone)]
pub struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Copy `original` to `{scratch}/{md5(original)}.pdf`.
    pub fn stage(&self, original: &Path) -> Result<Staged> {
        let hash = path_hash(original);
        let path = self.dir.join(format!("{hash}.pdf"));
        fs::copy(original, &path)?;
        debug!("Staged {} as {}", original.display(), path.display());
        Ok(Staged { hash, path })
    }

    /// Remove every scratch file whose name starts with `hash`.
    pub fn cleanup(&self, hash: &str) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with(hash) {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        debug!("Removed {} scratch files for {}", removed, hash);
        Ok(removed)
    }

    /// Stage `original`, run `work` on the copy, then clean up the prefix.
    ///
    /// Cleanup runs whether or not `work` succeeds; an error from `work`
    /// wins over a cleanup error.
    pub fn with_staged<T>(
        &self,
        original: &Path,
        work: impl FnOnce(&Staged) -> Result<T>,
    ) -> Result<T> {
        let staged = self.stage(original)?;
        let result = work(&staged);
        let cleanup = self.cleanup(&staged.hash);
        let value = result?;
        cleanup?;
        Ok(value)
    }
}

/// Lowercase MD5 hex digest of the path's string form.
pub fn path_hash(path: &Path) -> String {
    hex::encode(Md5::digest(path.to_string_lossy().as_bytes()))
}
