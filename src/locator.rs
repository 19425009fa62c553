use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Recursively list every non-directory file under `root`, sorted
/// lexicographically so runs are reproducible. A nonexistent root yields an
/// empty list rather than an error.
pub fn list_genome_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();
    if root.exists() {
        walk(root, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Cannot read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Cannot read directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
