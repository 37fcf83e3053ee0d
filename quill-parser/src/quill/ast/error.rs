//! Error types for inclusion and document loading

use std::fmt;
use std::path::PathBuf;

/// Errors raised while resolving an `<<include>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeError {
    NotFound(PathBuf),
    IsDirectory(PathBuf),
    /// The path is already open further up the include chain.
    Cycle(PathBuf),
    TooDeep { path: PathBuf, limit: usize },
    Io { path: PathBuf, message: String },
}

impl fmt::Display for IncludeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeError::NotFound(path) => write!(f, "included file not found: {}", path.display()),
            IncludeError::IsDirectory(path) => {
                write!(f, "included path is a directory: {}", path.display())
            }
            IncludeError::Cycle(path) => {
                write!(f, "included file not found (include cycle): {}", path.display())
            }
            IncludeError::TooDeep { path, limit } => write!(
                f,
                "include depth limit of {} reached at {}",
                limit,
                path.display()
            ),
            IncludeError::Io { path, message } => {
                write!(f, "failed to read {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for IncludeError {}

/// Errors that can occur when loading a document from disk.
#[derive(Debug)]
pub enum LoaderError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Io { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_reads_as_not_found() {
        let error = IncludeError::Cycle(PathBuf::from("a.qd"));
        assert!(error.to_string().starts_with("included file not found"));
    }
}
