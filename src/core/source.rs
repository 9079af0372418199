use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Where FASTA text comes from.
///
/// A `Temp` source owns its file: the file is deleted when the source is dropped.
#[derive(Debug)]
pub enum FastaSource {
    /// A file on disk, possibly gzip/bgzip compressed
    Path(PathBuf),
    /// FASTA text already held in memory
    Text(String),
    /// A temporary file created by this crate
    Temp(NamedTempFile),
}

impl FastaSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Filesystem location, if this source lives on disk
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Temp(file) => Some(file.path()),
            Self::Text(_) => None,
        }
    }

    /// True if this source lives in memory
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl fmt::Display for FastaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Temp(file) => write!(f, "{} (temporary)", file.path().display()),
            Self::Text(text) => write!(f, "<in-memory, {} bytes>", text.len()),
        }
    }
}
