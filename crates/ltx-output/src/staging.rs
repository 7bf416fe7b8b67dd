//! Staged replacement of output files.
//!
//! Every file is first written next to its target under a hidden temporary
//! name. Targets are only replaced once all files are staged; dropping an
//! uncommitted [`Staging`] removes whatever was staged.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{OutputError, Result};

#[derive(Debug)]
struct StagedFile {
    temp_path: PathBuf,
    target_path: PathBuf,
}

#[derive(Debug, Default)]
pub(crate) struct Staging {
    files: Vec<StagedFile>,
}

impl Staging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `bytes` to a temporary sibling of `target_path`.
    pub fn stage(&mut self, target_path: &Path, bytes: &[u8]) -> Result<()> {
        let temp_path = temp_path_for(target_path);
        let io_error = |operation: &'static str| {
            let path = temp_path.clone();
            move |source: std::io::Error| OutputError::Io {
                operation,
                path,
                source,
            }
        };

        let mut file = File::create(&temp_path).map_err(io_error("create"))?;
        // Tracked before writing so a failed write is still cleaned up.
        self.files.push(StagedFile {
            temp_path: temp_path.clone(),
            target_path: target_path.to_path_buf(),
        });
        file.write_all(bytes).map_err(io_error("write"))?;
        file.sync_all().map_err(io_error("sync"))?;
        debug!(path = %target_path.display(), bytes = bytes.len(), "staged output");
        Ok(())
    }

    /// Moves every staged file over its target, in staging order.
    ///
    /// Each rename is atomic on its own, the sequence is not. If a rename
    /// fails, targets already moved hold the new content, the failed target
    /// and every later one keep their previous content, and the remaining
    /// staged files are removed.
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());
        self.files.reverse();
        while let Some(file) = self.files.pop() {
            if let Err(source) = fs::rename(&file.temp_path, &file.target_path) {
                // Files not yet moved stay tracked and are removed on drop.
                let _ = fs::remove_file(&file.temp_path);
                return Err(OutputError::AtomicWriteFailed {
                    temp_path: file.temp_path,
                    target_path: file.target_path,
                    source,
                });
            }
            written.push(file.target_path);
        }
        Ok(written)
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        for file in self.files.drain(..) {
            if let Err(error) = fs::remove_file(&file.temp_path) {
                warn!(path = %file.temp_path.display(), %error, "failed to remove staged file");
            }
        }
    }
}

fn temp_path_for(target_path: &Path) -> PathBuf {
    let name = target_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{name}.tmp"))
}
