//! Discovery of proto files below a root directory

use proto_service_generator_common::{GeneratorError, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Collect every regular file below `dir` whose name ends with `extension`.
///
/// The walk is sorted by file name so results are stable across platforms.
pub fn scan_proto_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(GeneratorError::DirectoryNotFound(dir.to_path_buf()));
    }

    if !dir.is_dir() {
        return Err(GeneratorError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();

        let matches_extension = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(extension));

        if matches_extension && path.is_file() {
            files.push(path.to_path_buf());
        }
    }

    if files.is_empty() {
        return Err(GeneratorError::NoProtoFiles(dir.to_path_buf()));
    }

    info!("{} proto files were found in directory {}", files.len(), dir.display());

    Ok(files)
}
