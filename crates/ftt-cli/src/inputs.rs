use std::path::{Path, PathBuf};

use ftt_core::errors::{ErrorInfo, FttError};
use walkdir::WalkDir;

/// Splits the comma-separated input argument into container paths.
///
/// Blank entries are dropped. A directory expands to the regular files
/// beneath it in file-name order, skipping hidden ones. The result must not
/// be empty.
pub fn parse_file_list(list: &str) -> Result<Vec<PathBuf>, FttError> {
    let mut files = Vec::new();
    for entry in list.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let path = Path::new(entry);
        if path.is_dir() {
            expand_directory(path, &mut files)?;
        } else {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(FttError::Config(
            ErrorInfo::new("empty-input-list", "no input files")
                .with_context("argument", list)
                .with_hint("pass a comma-separated list of truth container files"),
        ));
    }
    Ok(files)
}

fn expand_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), FttError> {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));
    for entry in walker {
        let entry = entry.map_err(|err| {
            FttError::Io(
                ErrorInfo::new("input-scan", err.to_string())
                    .with_context("path", dir.display().to_string()),
            )
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map_or(false, |name| name.starts_with('.'))
}
