use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Outcome of writing one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

impl std::fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteStatus::Written => write!(f, "written"),
            WriteStatus::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Write `contents` unless the file already holds exactly these bytes, so
/// build systems keyed on mtime do not rebuild.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<WriteStatus> {
    if let Ok(existing) = fs::read(path) {
        if existing == contents.as_bytes() {
            debug!("Unchanged: {}", path.display());
            return Ok(WriteStatus::Unchanged);
        }
    }

    fs::write(path, contents).map_err(|source| Error::WriteError {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote: {}", path.display());
    Ok(WriteStatus::Written)
}

/// Remove `<prefix>*.{c,h,go}` files left behind by older generator layouts.
/// Names in `preserve` are hand-maintained and kept. A missing directory has
/// nothing to clean.
pub fn remove_stale_files(dir: &Path, prefix: &str, preserve: &[String]) -> Vec<PathBuf> {
    if prefix.is_empty() || !dir.is_dir() {
        return Vec::new();
    }

    let mut removed = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_name = entry.file_name().to_string_lossy();
        let generated_extension = matches!(
            entry.path().extension().and_then(|ext| ext.to_str()),
            Some("c" | "h" | "go")
        );
        if !file_name.starts_with(prefix) || !generated_extension {
            continue;
        }
        if preserve.iter().any(|keep| *keep == file_name) {
            debug!("Preserving: {}", entry.path().display());
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                info!("Removed stale file: {}", entry.path().display());
                removed.push(entry.path().to_path_buf());
            }
            Err(e) => warn!("Failed to remove {}: {}", entry.path().display(), e),
        }
    }

    removed.sort();
    removed
}

pub fn digest(contents: &str) -> String {
    format!("{:x}", md5::compute(contents.as_bytes()))
}
