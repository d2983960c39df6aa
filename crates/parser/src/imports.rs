//! Locating imported proto files
//!
//! Imports are resolved against a search path of root directories, never
//! against the directory being scanned.

use std::path::{Path, PathBuf};

/// Maps an import string (e.g. "acme/common/ack.proto") to a readable file
#[cfg_attr(test, mockall::automock)]
pub trait ImportLocator {
    fn locate(&self, import: &str) -> Option<PathBuf>;
}

/// Ordered list of roots; the first root containing the import wins
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ImportLocator for SearchPath {
    fn locate(&self, import: &str) -> Option<PathBuf> {
        let relative = Path::new(import);
        if relative.is_absolute() {
            return relative.is_file().then(|| relative.to_path_buf());
        }

        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
    }
}
